use super::super::models::{Transaction, TransactionMetadata, TransactionStatus};
use crate::core::{AppError, Result};
use sqlx::types::Json;
use sqlx::{MySql, MySqlConnection, MySqlPool};

/// Repository for ledger transaction persistence
///
/// `processor_payment_reference` carries a UNIQUE index; that constraint, not
/// an application-level check, is what makes concurrent duplicate capture
/// deliveries safe.
pub struct TransactionRepository {
    pool: MySqlPool,
}

const SELECT_COLUMNS: &str = r#"
    id, partner_id, booking_reference, booking_kind,
    processor_payment_reference, processor_transfer_reference, amount,
    platform_fee, partner_amount, currency, status, metadata, created_at,
    updated_at
"#;

impl TransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a new transaction
    ///
    /// A duplicate payment reference surfaces as `Conflict`.
    pub async fn insert(&self, transaction: &Transaction) -> Result<()> {
        self.insert_with_tx(transaction, &self.pool).await
    }

    /// Insert within an existing database transaction
    pub async fn insert_with_tx<'a, E>(&self, transaction: &Transaction, executor: E) -> Result<()>
    where
        E: sqlx::Executor<'a, Database = MySql>,
    {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, partner_id, booking_reference, booking_kind,
                processor_payment_reference, processor_transfer_reference,
                amount, platform_fee, partner_amount, currency, status,
                metadata
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.partner_id)
        .bind(&transaction.booking_reference)
        .bind(transaction.booking_kind)
        .bind(&transaction.processor_payment_reference)
        .bind(&transaction.processor_transfer_reference)
        .bind(transaction.amount)
        .bind(transaction.platform_fee)
        .bind(transaction.partner_amount)
        .bind(transaction.currency)
        .bind(transaction.status)
        .bind(&transaction.metadata)
        .execute(executor)
        .await
        .map_err(|e| {
            AppError::from_insert(
                e,
                format!(
                    "Transaction already exists for payment reference '{}'",
                    transaction.processor_payment_reference
                ),
            )
        })?;

        Ok(())
    }

    /// Find transaction by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch transaction: {}", e)))?;

        Ok(transaction)
    }

    /// Find the unique transaction for a payment reference
    pub async fn find_by_payment_reference(
        &self,
        payment_reference: &str,
    ) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions WHERE processor_payment_reference = ?",
            SELECT_COLUMNS
        ))
        .bind(payment_reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to fetch transaction by payment reference: {}",
                e
            ))
        })?;

        Ok(transaction)
    }

    /// Find by payment reference with a row lock (FOR UPDATE)
    ///
    /// A concurrent refund and transfer-completion patch for the same payment
    /// reference serialize on this lock, so neither clobbers the other's
    /// metadata.
    pub async fn find_by_payment_reference_for_update(
        conn: &mut MySqlConnection,
        payment_reference: &str,
    ) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions WHERE processor_payment_reference = ? FOR UPDATE",
            SELECT_COLUMNS
        ))
        .bind(payment_reference)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to lock transaction row: {}", e)))?;

        Ok(transaction)
    }

    /// Find by ID with a row lock (FOR UPDATE)
    pub async fn find_by_id_for_update(
        conn: &mut MySqlConnection,
        id: &str,
    ) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions WHERE id = ? FOR UPDATE",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to lock transaction row: {}", e)))?;

        Ok(transaction)
    }

    /// Patch status and transfer reference within an existing transaction
    ///
    /// COALESCE keeps the stored transfer reference when the caller supplies
    /// none; it is never overwritten with NULL.
    pub async fn update_status_with_tx(
        conn: &mut MySqlConnection,
        id: &str,
        status: TransactionStatus,
        transfer_reference: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET status = ?,
                processor_transfer_reference = COALESCE(?, processor_transfer_reference),
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(transfer_reference)
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update transaction status: {}", e)))?;

        Ok(())
    }

    /// Patch status and metadata together within an existing transaction
    ///
    /// The caller merged `metadata` from the row it holds locked; the write
    /// replaces the column with that merged value.
    pub async fn update_status_and_metadata_with_tx(
        conn: &mut MySqlConnection,
        id: &str,
        status: TransactionStatus,
        metadata: &TransactionMetadata,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET status = ?, metadata = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(Json(metadata))
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update transaction metadata: {}", e)))?;

        Ok(())
    }

    /// All transactions for a partner, newest first
    pub async fn find_by_partner_id(&self, partner_id: &str) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions WHERE partner_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(format!("Failed to fetch transactions for partner: {}", e))
        })?;

        Ok(transactions)
    }
}
