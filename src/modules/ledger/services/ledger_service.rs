use super::super::models::{NewTransaction, RefundAnnotation, Transaction, TransactionStatus};
use super::super::repositories::TransactionRepository;
use super::refund_allocator;
use crate::core::{AppError, Result};
use crate::modules::bookings::BookingDirectory;
use crate::modules::notifications::{
    NotificationDispatcher, NotificationEvent, NotificationKind, RelatedEntity,
};
use crate::modules::partners::repositories::PartnerRepository;
use chrono::Utc;
use std::sync::Arc;

/// Transaction ledger
///
/// Records processor-reported money events against partner accounts. The
/// ledger's own writes commit before any notification attempt; a dispatcher
/// failure is logged and never rolls back a financial state transition.
pub struct LedgerService {
    transaction_repo: TransactionRepository,
    partner_repo: PartnerRepository,
    booking_directory: Arc<BookingDirectory>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl LedgerService {
    pub fn new(
        transaction_repo: TransactionRepository,
        partner_repo: PartnerRepository,
        booking_directory: Arc<BookingDirectory>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            transaction_repo,
            partner_repo,
            booking_directory,
            dispatcher,
        }
    }

    /// Direct insert for trusted internal callers
    ///
    /// The split was computed upstream and is only validated here; a
    /// duplicate payment reference surfaces as `Conflict`.
    pub async fn record_transaction(&self, input: NewTransaction) -> Result<Transaction> {
        let transaction = Transaction::new(input)?;
        self.transaction_repo.insert(&transaction).await?;

        tracing::info!(
            transaction_id = %transaction.id,
            partner_id = %transaction.partner_id,
            payment_reference = %transaction.processor_payment_reference,
            amount = transaction.amount,
            "Transaction recorded"
        );

        Ok(transaction)
    }

    /// Creation path for the payment-capture callback
    ///
    /// The processor delivers at least once; a duplicate payment reference is
    /// a logged no-op returning the existing row. The fee split was computed
    /// at capture time from the partner's rate then and is never recomputed.
    pub async fn create_from_capture(&self, input: NewTransaction) -> Result<Transaction> {
        let payment_reference = input.processor_payment_reference.clone();
        let transaction = Transaction::new(input)?;

        match self.transaction_repo.insert(&transaction).await {
            Ok(()) => {
                tracing::info!(
                    transaction_id = %transaction.id,
                    payment_reference = %payment_reference,
                    "Transaction created from capture"
                );
                Ok(transaction)
            }
            Err(AppError::Conflict(_)) => {
                tracing::info!(
                    payment_reference = %payment_reference,
                    "Duplicate capture delivery, returning existing transaction"
                );
                self.transaction_repo
                    .find_by_payment_reference(&payment_reference)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal(format!(
                            "Transaction for payment reference '{}' vanished after conflict",
                            payment_reference
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Patch status (and transfer reference, if supplied) by payment reference
    ///
    /// The transfer reference is never overwritten with null; absent input
    /// keeps the stored value. The row lock serializes against a concurrent
    /// refund.
    pub async fn update_status_by_payment_reference(
        &self,
        payment_reference: &str,
        status: TransactionStatus,
        transfer_reference: Option<&str>,
    ) -> Result<Transaction> {
        let mut tx = self.transaction_repo.pool().begin().await?;

        let mut transaction =
            TransactionRepository::find_by_payment_reference_for_update(&mut tx, payment_reference)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Transaction with payment reference '{}' not found",
                        payment_reference
                    ))
                })?;

        if transaction.status == TransactionStatus::Refunded && status != TransactionStatus::Refunded
        {
            // `refunded` is a stable end state; a late processor event
            // overwriting it must stay visible in monitoring
            tracing::warn!(
                transaction_id = %transaction.id,
                payment_reference = %payment_reference,
                new_status = %status,
                "Status update overwrites refunded end state"
            );
        }

        TransactionRepository::update_status_with_tx(
            &mut tx,
            &transaction.id,
            status,
            transfer_reference,
        )
        .await?;

        tx.commit().await?;

        transaction.status = status;
        if let Some(transfer_ref) = transfer_reference {
            transaction.processor_transfer_reference = Some(transfer_ref.to_string());
        }

        tracing::info!(
            transaction_id = %transaction.id,
            payment_reference = %payment_reference,
            status = %status,
            "Transaction status updated"
        );

        Ok(transaction)
    }

    /// Mark a transaction failed, merging the failure annotation
    ///
    /// Existing metadata keys survive the merge. Notifies the partner's
    /// owning user after commit.
    pub async fn record_failure(
        &self,
        transaction_id: &str,
        error_message: &str,
    ) -> Result<Transaction> {
        let mut tx = self.transaction_repo.pool().begin().await?;

        let mut transaction =
            TransactionRepository::find_by_id_for_update(&mut tx, transaction_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Transaction with id '{}' not found",
                        transaction_id
                    ))
                })?;

        if transaction.status == TransactionStatus::Refunded {
            tracing::warn!(
                transaction_id = %transaction.id,
                "Failure recorded against refunded end state"
            );
        }

        transaction
            .metadata
            .0
            .record_failure(error_message.to_string(), Utc::now());
        transaction.status = TransactionStatus::Failed;

        TransactionRepository::update_status_and_metadata_with_tx(
            &mut tx,
            &transaction.id,
            transaction.status,
            &transaction.metadata.0,
        )
        .await?;

        tx.commit().await?;

        tracing::warn!(
            transaction_id = %transaction.id,
            error = %error_message,
            "Transaction marked failed"
        );

        self.notify_failure(&transaction, error_message).await;

        Ok(transaction)
    }

    /// Apply a processor refund event
    ///
    /// Unmatched payment references are logged and swallowed (`Ok(None)`):
    /// refunds may legitimately reference payments this ledger never
    /// tracked. On a match, the allocator splits the refund proportionally,
    /// the refund annotation merges into metadata and the status becomes
    /// (or stays) `refunded`.
    pub async fn apply_refund(
        &self,
        payment_reference: &str,
        refund_amount: i64,
        refund_id: &str,
        reason: &str,
    ) -> Result<Option<Transaction>> {
        let mut tx = self.transaction_repo.pool().begin().await?;

        let Some(mut transaction) =
            TransactionRepository::find_by_payment_reference_for_update(&mut tx, payment_reference)
                .await?
        else {
            tracing::warn!(
                payment_reference = %payment_reference,
                refund_id = %refund_id,
                "Refund for untracked payment reference, ignoring"
            );
            return Ok(None);
        };

        let split = refund_allocator::allocate(
            transaction.amount,
            transaction.platform_fee,
            transaction.partner_amount,
            refund_amount,
        )?;

        if let Some(previous_refund_id) = transaction.metadata.0.refund_id.as_deref() {
            // Latest-refund-wins; keep the discarded id visible in logs
            tracing::info!(
                transaction_id = %transaction.id,
                previous_refund_id = %previous_refund_id,
                refund_id = %refund_id,
                "Repeat refund replaces prior refund annotation"
            );
        }

        transaction.metadata.0.record_refund(RefundAnnotation {
            refund_id: refund_id.to_string(),
            refund_amount,
            refund_reason: reason.to_string(),
            refunded_at: Utc::now(),
            platform_fee_refund: split.platform_fee_refund,
            partner_refund: split.partner_refund,
        });
        transaction.status = TransactionStatus::Refunded;

        TransactionRepository::update_status_and_metadata_with_tx(
            &mut tx,
            &transaction.id,
            transaction.status,
            &transaction.metadata.0,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %transaction.id,
            refund_id = %refund_id,
            refund_amount = refund_amount,
            platform_fee_refund = split.platform_fee_refund,
            partner_refund = split.partner_refund,
            "Refund applied"
        );

        self.notify_refund(&transaction, refund_amount).await;

        Ok(Some(transaction))
    }

    /// Notify the partner about a newly recorded transaction
    ///
    /// Booking label and customer name come from the booking verticals; any
    /// lookup miss degrades to generic labels instead of failing the
    /// notification.
    pub async fn notify_new_transaction(&self, transaction_id: &str) -> Result<()> {
        let transaction = self.get_transaction(transaction_id).await?;

        let partner = self
            .partner_repo
            .find_by_id(&transaction.partner_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Partner with id '{}' not found",
                    transaction.partner_id
                ))
            })?;

        let summary = self
            .booking_directory
            .resolve(transaction.booking_kind, &transaction.booking_reference)
            .await;

        let net_amount = transaction.currency.format_minor(transaction.partner_amount);

        self.try_dispatch(NotificationEvent {
            recipient_user_id: partner.user_id,
            kind: NotificationKind::NewTransaction,
            title: "New booking payment".to_string(),
            message: format!(
                "{} - {}: you earned {}",
                summary.label, summary.customer_name, net_amount
            ),
            related_entity: RelatedEntity {
                entity_type: "transaction".to_string(),
                entity_id: transaction.id.clone(),
            },
            data: serde_json::json!({
                "booking_reference": transaction.booking_reference,
                "booking_kind": transaction.booking_kind,
                "partner_amount": transaction.partner_amount,
                "currency": transaction.currency,
            }),
        })
        .await;

        Ok(())
    }

    /// Get transaction by ID
    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repo
            .find_by_id(transaction_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Transaction with id '{}' not found",
                    transaction_id
                ))
            })
    }

    /// Get the unique transaction for a payment reference
    pub async fn get_by_payment_reference(&self, payment_reference: &str) -> Result<Transaction> {
        self.transaction_repo
            .find_by_payment_reference(payment_reference)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Transaction with payment reference '{}' not found",
                    payment_reference
                ))
            })
    }

    /// All transactions for a partner, newest first
    pub async fn list_partner_transactions(&self, partner_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_repo.find_by_partner_id(partner_id).await
    }

    async fn notify_failure(&self, transaction: &Transaction, error_message: &str) {
        let recipient = match self.resolve_owner(transaction).await {
            Some(user_id) => user_id,
            None => return,
        };

        self.try_dispatch(NotificationEvent {
            recipient_user_id: recipient,
            kind: NotificationKind::TransactionFailed,
            title: "Booking payment failed".to_string(),
            message: format!(
                "Payment for booking {} failed: {}",
                transaction.booking_reference, error_message
            ),
            related_entity: RelatedEntity {
                entity_type: "transaction".to_string(),
                entity_id: transaction.id.clone(),
            },
            data: serde_json::json!({
                "booking_reference": transaction.booking_reference,
                "error": error_message,
            }),
        })
        .await;
    }

    async fn notify_refund(&self, transaction: &Transaction, refund_amount: i64) {
        let recipient = match self.resolve_owner(transaction).await {
            Some(user_id) => user_id,
            None => return,
        };

        let formatted = transaction.currency.format_minor(refund_amount);

        self.try_dispatch(NotificationEvent {
            recipient_user_id: recipient,
            kind: NotificationKind::TransactionRefunded,
            title: "Booking payment refunded".to_string(),
            message: format!(
                "Booking {} was refunded {}",
                transaction.booking_reference, formatted
            ),
            related_entity: RelatedEntity {
                entity_type: "transaction".to_string(),
                entity_id: transaction.id.clone(),
            },
            data: serde_json::json!({
                "booking_reference": transaction.booking_reference,
                "refund_amount": refund_amount,
                "currency": transaction.currency,
            }),
        })
        .await;
    }

    /// Owning user for notification addressing; a missing partner is logged
    /// and skipped, the ledger write already committed.
    async fn resolve_owner(&self, transaction: &Transaction) -> Option<String> {
        match self.partner_repo.find_by_id(&transaction.partner_id).await {
            Ok(Some(partner)) => Some(partner.user_id),
            Ok(None) => {
                tracing::warn!(
                    transaction_id = %transaction.id,
                    partner_id = %transaction.partner_id,
                    "Partner not found for notification, skipping dispatch"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    transaction_id = %transaction.id,
                    error = %e,
                    "Partner lookup failed for notification, skipping dispatch"
                );
                None
            }
        }
    }

    async fn try_dispatch(&self, event: NotificationEvent) {
        let kind = event.kind;
        if let Err(e) = self.dispatcher.dispatch(event).await {
            tracing::warn!(
                kind = ?kind,
                error = %e,
                "Notification dispatch failed, ledger state already committed"
            );
        }
    }
}
