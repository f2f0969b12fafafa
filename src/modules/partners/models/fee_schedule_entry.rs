use crate::core::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Validate a commission rate, in percent
pub fn validate_fee_percentage(fee: Decimal) -> Result<()> {
    if fee < Decimal::ZERO || fee > Decimal::from(100) {
        return Err(AppError::validation(format!(
            "Fee percentage must be between 0 and 100, got {}",
            fee
        )));
    }
    Ok(())
}

/// One immutable record of a partner's commission rate
///
/// Entries are append-only; ordered by `effective_date` they form the audit
/// trail for every rate the partner has ever had. The account's current
/// `fee_percentage` must always equal the latest entry, which is why the
/// append and the account patch share one database transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeeScheduleEntry {
    /// Unique entry ID (UUID)
    #[serde(skip_deserializing)]
    pub id: String,

    /// Owning partner
    pub partner_id: String,

    /// Rate in percent, [0, 100]
    pub fee_percentage: Decimal,

    /// When this rate took effect (entry creation time)
    pub effective_date: Option<DateTime<Utc>>,

    /// Acting user who set the rate
    pub created_by: String,

    /// Free-text justification
    pub reason: String,

    /// Rate in effect before this entry, for audit
    pub previous_fee: Option<Decimal>,
}

impl FeeScheduleEntry {
    pub fn new(
        partner_id: String,
        fee_percentage: Decimal,
        created_by: String,
        reason: String,
        previous_fee: Option<Decimal>,
    ) -> Result<Self> {
        validate_fee_percentage(fee_percentage)?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            partner_id,
            fee_percentage,
            effective_date: Some(Utc::now()),
            created_by,
            reason,
            previous_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_within_range() {
        let entry = FeeScheduleEntry::new(
            "partner-1".to_string(),
            dec!(12),
            "admin-1".to_string(),
            "market adjustment".to_string(),
            Some(dec!(10)),
        )
        .unwrap();

        assert_eq!(entry.fee_percentage, dec!(12));
        assert_eq!(entry.previous_fee, Some(dec!(10)));
        assert!(entry.effective_date.is_some());
    }

    #[test]
    fn test_entry_rejects_out_of_range() {
        for fee in [dec!(-0.01), dec!(100.01), dec!(150)] {
            let result = FeeScheduleEntry::new(
                "partner-1".to_string(),
                fee,
                "admin-1".to_string(),
                "bad".to_string(),
                None,
            );
            assert!(result.is_err(), "fee {} should be rejected", fee);
        }
    }

    #[test]
    fn test_boundary_fees_accepted() {
        assert!(validate_fee_percentage(dec!(0)).is_ok());
        assert!(validate_fee_percentage(dec!(100)).is_ok());
    }
}
