use crate::core::{AppError, Result};

/// Proportional split of a refund across the fee components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundSplit {
    /// Platform-fee share of the refund, in minor units
    pub platform_fee_refund: i64,

    /// Partner share of the refund, in minor units
    pub partner_refund: i64,
}

/// Split a refund proportionally across platform fee and partner amount
///
/// Both components round down, so whenever the original split is consistent
/// (`platform_fee + partner_amount == amount`) the allocation never exceeds
/// `refund_amount`; at most one minor unit is absorbed per refund and not
/// reconciled anywhere else.
///
/// A `refund_amount` above `amount` is accepted without clamping (upstream
/// rounding can over-refund); it only emits a warning so the cases stay
/// visible in monitoring.
pub fn allocate(
    amount: i64,
    platform_fee: i64,
    partner_amount: i64,
    refund_amount: i64,
) -> Result<RefundSplit> {
    if amount <= 0 {
        return Err(AppError::validation(format!(
            "Cannot allocate a refund against amount {}",
            amount
        )));
    }

    if refund_amount < 0 {
        return Err(AppError::validation(format!(
            "Refund amount must be non-negative, got {}",
            refund_amount
        )));
    }

    if refund_amount > amount {
        tracing::warn!(
            amount = amount,
            refund_amount = refund_amount,
            "Refund exceeds original amount; allocating without clamping"
        );
    }

    // i128 intermediates: the products can overflow i64 for large amounts
    let platform_fee_refund = (platform_fee as i128 * refund_amount as i128) / amount as i128;
    let partner_refund = (partner_amount as i128 * refund_amount as i128) / amount as i128;

    Ok(RefundSplit {
        platform_fee_refund: platform_fee_refund as i64,
        partner_refund: partner_refund as i64,
    })
}
