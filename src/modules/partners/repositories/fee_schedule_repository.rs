use super::super::models::FeeScheduleEntry;
use crate::core::{AppError, Result};
use sqlx::{MySql, MySqlPool};

/// Repository for the append-only fee schedule audit trail
///
/// Entries are never updated or deleted. Keeping the partner account's
/// current fee in sync is the caller's job, inside the same transaction as
/// the append.
pub struct FeeScheduleRepository {
    pool: MySqlPool,
}

impl FeeScheduleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Append an entry within an existing database transaction
    pub async fn append_with_tx<'a, E>(&self, entry: &FeeScheduleEntry, executor: E) -> Result<()>
    where
        E: sqlx::Executor<'a, Database = MySql>,
    {
        sqlx::query(
            r#"
            INSERT INTO fee_schedule_entries (
                id, partner_id, fee_percentage, effective_date, created_by,
                reason, previous_fee
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.partner_id)
        .bind(entry.fee_percentage)
        .bind(entry.effective_date)
        .bind(&entry.created_by)
        .bind(&entry.reason)
        .bind(entry.previous_fee)
        .execute(executor)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to append fee schedule entry: {}", e)))?;

        Ok(())
    }

    /// Full rate history for a partner, oldest first
    pub async fn list_for_partner(&self, partner_id: &str) -> Result<Vec<FeeScheduleEntry>> {
        let entries = sqlx::query_as::<_, FeeScheduleEntry>(
            r#"
            SELECT id, partner_id, fee_percentage, effective_date, created_by,
                   reason, previous_fee
            FROM fee_schedule_entries
            WHERE partner_id = ?
            ORDER BY effective_date ASC
            "#,
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch fee schedule: {}", e)))?;

        Ok(entries)
    }
}
