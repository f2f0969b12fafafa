use crate::core::{AppError, Currency, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::metadata::TransactionMetadata;

/// Transaction status state machine
///
/// `pending -> completed -> refunded`, with `failed` reachable from either of
/// the first two. A failed transaction is retried by capturing a new payment
/// reference, never by transitioning back. `refunded` is sticky: repeat
/// partial refunds update metadata but the status stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Capture reported, transfer not yet confirmed
    Pending,

    /// Capture and transfer confirmed
    Completed,

    /// Processor failure, dispute or manual reversal
    Failed,

    /// At least one refund applied
    Refunded,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
            TransactionStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "refunded" => Ok(TransactionStatus::Refunded),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

/// Booking vertical the transaction settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Activity,
    Event,
    Vehicle,
    Accommodation,
    Package,
}

impl std::fmt::Display for BookingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingKind::Activity => write!(f, "activity"),
            BookingKind::Event => write!(f, "event"),
            BookingKind::Vehicle => write!(f, "vehicle"),
            BookingKind::Accommodation => write!(f, "accommodation"),
            BookingKind::Package => write!(f, "package"),
        }
    }
}

/// One money event in the partner ledger
///
/// Keyed by `processor_payment_reference` (unique, the idempotency boundary).
/// All monetary fields are integer minor units; the split invariant
/// `amount == platform_fee + partner_amount` holds from creation on and the
/// fee is the partner's rate at capture time, never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    /// Unique transaction ID (UUID)
    #[serde(skip_deserializing)]
    pub id: String,

    /// Owning partner
    pub partner_id: String,

    /// Opaque booking identifier in the owning vertical
    pub booking_reference: String,

    pub booking_kind: BookingKind,

    /// Processor-issued payment reference (unique per real-world payment)
    pub processor_payment_reference: String,

    /// Processor-issued transfer reference, once the payout exists
    pub processor_transfer_reference: Option<String>,

    /// Gross amount in minor units
    pub amount: i64,

    /// Marketplace commission in minor units
    pub platform_fee: i64,

    /// Partner net amount in minor units
    pub partner_amount: i64,

    pub currency: Currency,

    pub status: TransactionStatus,

    /// Typed annotations plus open processor context (JSON column)
    pub metadata: Json<TransactionMetadata>,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Creation payload for a ledger transaction
///
/// The caller has already computed the fee split from the partner's rate at
/// capture time; nothing here recomputes it.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub partner_id: String,
    pub booking_reference: String,
    pub booking_kind: BookingKind,
    pub processor_payment_reference: String,
    pub processor_transfer_reference: Option<String>,
    pub amount: i64,
    pub platform_fee: i64,
    pub partner_amount: i64,
    pub currency: Currency,
    #[serde(default)]
    pub status: TransactionStatus,
    pub metadata: Option<TransactionMetadata>,
}

impl Transaction {
    /// Build a new transaction, enforcing the split invariant
    pub fn new(input: NewTransaction) -> Result<Self> {
        if input.partner_id.trim().is_empty() {
            return Err(AppError::validation("Partner ID cannot be empty"));
        }

        if input.processor_payment_reference.trim().is_empty() {
            return Err(AppError::validation(
                "Processor payment reference cannot be empty",
            ));
        }

        if input.booking_reference.trim().is_empty() {
            return Err(AppError::validation("Booking reference cannot be empty"));
        }

        if input.amount < 0 || input.platform_fee < 0 || input.partner_amount < 0 {
            return Err(AppError::validation(
                "Monetary amounts must be non-negative",
            ));
        }

        if input.amount != input.platform_fee + input.partner_amount {
            return Err(AppError::validation(format!(
                "Split mismatch: amount {} != platform fee {} + partner amount {}",
                input.amount, input.platform_fee, input.partner_amount
            )));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            partner_id: input.partner_id,
            booking_reference: input.booking_reference,
            booking_kind: input.booking_kind,
            processor_payment_reference: input.processor_payment_reference,
            processor_transfer_reference: input.processor_transfer_reference,
            amount: input.amount,
            platform_fee: input.platform_fee,
            partner_amount: input.partner_amount,
            currency: input.currency,
            status: input.status,
            metadata: Json(input.metadata.unwrap_or_default()),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == TransactionStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_input() -> NewTransaction {
        NewTransaction {
            partner_id: "partner-1".to_string(),
            booking_reference: "booking-42".to_string(),
            booking_kind: BookingKind::Accommodation,
            processor_payment_reference: "pay_abc".to_string(),
            processor_transfer_reference: None,
            amount: 10000,
            platform_fee: 1500,
            partner_amount: 8500,
            currency: Currency::EUR,
            status: TransactionStatus::Pending,
            metadata: None,
        }
    }

    #[test]
    fn test_transaction_creation_valid() {
        let tx = Transaction::new(new_input()).unwrap();
        assert!(!tx.id.is_empty());
        assert_eq!(tx.amount, tx.platform_fee + tx.partner_amount);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.metadata.0, TransactionMetadata::default());
    }

    #[test]
    fn test_split_invariant_enforced() {
        let mut input = new_input();
        input.platform_fee = 1600;
        assert!(Transaction::new(input).is_err());

        let mut input = new_input();
        input.partner_amount = 8400;
        assert!(Transaction::new(input).is_err());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut input = new_input();
        input.amount = -100;
        input.platform_fee = -100;
        input.partner_amount = 0;
        assert!(Transaction::new(input).is_err());
    }

    #[test]
    fn test_empty_payment_reference_rejected() {
        let mut input = new_input();
        input.processor_payment_reference = " ".to_string();
        assert!(Transaction::new(input).is_err());
    }

    #[test]
    fn test_zero_fee_split_allowed() {
        let mut input = new_input();
        input.platform_fee = 0;
        input.partner_amount = 10000;
        let tx = Transaction::new(input).unwrap();
        assert_eq!(tx.platform_fee, 0);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Refunded,
        ] {
            assert_eq!(
                TransactionStatus::from_str(&status.to_string()).unwrap(),
                status
            );
        }
        assert!(TransactionStatus::from_str("expired").is_err());
    }
}
