use super::super::models::PartnerAccount;
use crate::core::{AppError, Result};
use sqlx::{MySql, MySqlConnection, MySqlPool};

/// Repository for partner account persistence
///
/// Duplicate prevention relies on the UNIQUE indexes on `user_id` and
/// `processor_account_ref`, not on application-level check-then-insert.
pub struct PartnerRepository {
    pool: MySqlPool,
}

const SELECT_COLUMNS: &str = r#"
    id, user_id, processor_account_ref, country, business_type, business_name,
    onboarding_status, fee_percentage, is_active, charges_enabled,
    transfers_enabled, created_at, updated_at
"#;

impl PartnerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a new partner account within an existing database transaction
    ///
    /// A unique violation on `user_id` (or the processor ref) surfaces as
    /// `Conflict`.
    pub async fn create_with_tx<'a, E>(&self, account: &PartnerAccount, executor: E) -> Result<()>
    where
        E: sqlx::Executor<'a, Database = MySql>,
    {
        sqlx::query(
            r#"
            INSERT INTO partner_accounts (
                id, user_id, processor_account_ref, country, business_type,
                business_name, onboarding_status, fee_percentage, is_active,
                charges_enabled, transfers_enabled
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.user_id)
        .bind(&account.processor_account_ref)
        .bind(&account.country)
        .bind(&account.business_type)
        .bind(&account.business_name)
        .bind(account.onboarding_status)
        .bind(account.fee_percentage)
        .bind(account.is_active)
        .bind(account.charges_enabled)
        .bind(account.transfers_enabled)
        .execute(executor)
        .await
        .map_err(|e| {
            AppError::from_insert(
                e,
                format!(
                    "Partner account already exists for user '{}'",
                    account.user_id
                ),
            )
        })?;

        Ok(())
    }

    /// Find partner by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<PartnerAccount>> {
        let account = sqlx::query_as::<_, PartnerAccount>(&format!(
            "SELECT {} FROM partner_accounts WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch partner: {}", e)))?;

        Ok(account)
    }

    /// Find partner by owning user identity
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<PartnerAccount>> {
        let account = sqlx::query_as::<_, PartnerAccount>(&format!(
            "SELECT {} FROM partner_accounts WHERE user_id = ?",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch partner by user: {}", e)))?;

        Ok(account)
    }

    /// Find partner by processor account reference
    pub async fn find_by_processor_ref(
        &self,
        processor_account_ref: &str,
    ) -> Result<Option<PartnerAccount>> {
        let account = sqlx::query_as::<_, PartnerAccount>(&format!(
            "SELECT {} FROM partner_accounts WHERE processor_account_ref = ?",
            SELECT_COLUMNS
        ))
        .bind(processor_account_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(format!("Failed to fetch partner by processor ref: {}", e))
        })?;

        Ok(account)
    }

    /// Find partner by ID with a row lock (FOR UPDATE)
    ///
    /// Serializes concurrent fee changes for the same partner; the audit
    /// trail then reflects commit order.
    pub async fn find_by_id_for_update(
        conn: &mut MySqlConnection,
        id: &str,
    ) -> Result<Option<PartnerAccount>> {
        let account = sqlx::query_as::<_, PartnerAccount>(&format!(
            "SELECT {} FROM partner_accounts WHERE id = ? FOR UPDATE",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to lock partner row: {}", e)))?;

        Ok(account)
    }

    /// Persist onboarding status, activation flag and capabilities
    pub async fn update_onboarding(&self, account: &PartnerAccount) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE partner_accounts
            SET onboarding_status = ?, is_active = ?, charges_enabled = ?,
                transfers_enabled = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(account.onboarding_status)
        .bind(account.is_active)
        .bind(account.charges_enabled)
        .bind(account.transfers_enabled)
        .bind(&account.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update onboarding status: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Partner with id '{}' not found",
                account.id
            )));
        }

        Ok(())
    }

    /// Patch the denormalized current fee within an existing transaction
    ///
    /// Only valid together with a fee schedule entry append; calling it alone
    /// breaks the audit invariant.
    pub async fn update_fee_with_tx(
        conn: &mut MySqlConnection,
        id: &str,
        fee_percentage: rust_decimal::Decimal,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE partner_accounts
            SET fee_percentage = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(fee_percentage)
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update fee percentage: {}", e)))?;

        Ok(())
    }

    /// Toggle the activation flag (admin override path)
    pub async fn update_active(&self, id: &str, is_active: bool) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE partner_accounts
            SET is_active = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(is_active)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update activation flag: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Partner with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}
