use partner_ledger::modules::ledger::services::refund_allocator::allocate;
use proptest::prelude::*;

/// Property-based tests for proportional refund allocation
///
/// Validates:
/// - floor rounding on both components
/// - the allocation never exceeds the refunded amount when the original
///   split is consistent (platform_fee + partner_amount == amount)
/// - at most one minor unit of drift per refund
/// - over-refunds (refund > amount) are computed, not clamped

#[test]
fn test_reference_split() {
    let split = allocate(10_000, 1_500, 8_500, 5_000).unwrap();
    assert_eq!(split.platform_fee_refund, 750);
    assert_eq!(split.partner_refund, 4_250);
    assert!(split.platform_fee_refund + split.partner_refund <= 5_000);
}

#[test]
fn test_zero_amount_is_rejected() {
    assert!(allocate(0, 0, 0, 1_000).is_err());
}

proptest! {
    #[test]
    fn test_never_over_allocates(
        amount in 1i64..1_000_000_000i64,
        fee_basis_points in 0i64..10_000i64,
        refund_fraction_bp in 0i64..10_000i64,
    ) {
        let platform_fee = amount * fee_basis_points / 10_000;
        let partner_amount = amount - platform_fee;
        let refund_amount = amount * refund_fraction_bp / 10_000;

        let split = allocate(amount, platform_fee, partner_amount, refund_amount).unwrap();

        prop_assert!(split.platform_fee_refund >= 0);
        prop_assert!(split.partner_refund >= 0);
        prop_assert!(
            split.platform_fee_refund + split.partner_refund <= refund_amount,
            "allocated {} + {} > refunded {}",
            split.platform_fee_refund,
            split.partner_refund,
            refund_amount
        );
    }

    #[test]
    fn test_drift_at_most_one_minor_unit(
        amount in 1i64..1_000_000_000i64,
        fee_basis_points in 0i64..10_000i64,
        refund_fraction_bp in 0i64..10_000i64,
    ) {
        let platform_fee = amount * fee_basis_points / 10_000;
        let partner_amount = amount - platform_fee;
        let refund_amount = amount * refund_fraction_bp / 10_000;

        let split = allocate(amount, platform_fee, partner_amount, refund_amount).unwrap();

        // Two floors lose strictly less than 2 whole units combined
        let residual = refund_amount - split.platform_fee_refund - split.partner_refund;
        prop_assert!(residual >= 0 && residual <= 1, "residual {} out of range", residual);
    }

    #[test]
    fn test_full_refund_allocates_exact_components(
        amount in 1i64..1_000_000_000i64,
        fee_basis_points in 0i64..10_000i64,
    ) {
        let platform_fee = amount * fee_basis_points / 10_000;
        let partner_amount = amount - platform_fee;

        let split = allocate(amount, platform_fee, partner_amount, amount).unwrap();

        prop_assert_eq!(split.platform_fee_refund, platform_fee);
        prop_assert_eq!(split.partner_refund, partner_amount);
    }

    #[test]
    fn test_over_refund_scales_components_past_original(
        amount in 1i64..1_000_000i64,
        excess in 1i64..1_000i64,
    ) {
        // The fraction deliberately exceeds 1; components may exceed the
        // original split but the sum still never exceeds the refund.
        let platform_fee = amount / 5;
        let partner_amount = amount - platform_fee;
        let refund_amount = amount + excess;

        let split = allocate(amount, platform_fee, partner_amount, refund_amount).unwrap();

        prop_assert!(split.platform_fee_refund >= platform_fee);
        prop_assert!(split.partner_refund >= partner_amount);
        prop_assert!(split.platform_fee_refund + split.partner_refund <= refund_amount);
    }

    #[test]
    fn test_monotonic_in_refund_amount(
        amount in 1i64..1_000_000i64,
        refund_a in 0i64..1_000_000i64,
        refund_b in 0i64..1_000_000i64,
    ) {
        let platform_fee = amount / 10;
        let partner_amount = amount - platform_fee;

        let (lo, hi) = if refund_a <= refund_b {
            (refund_a, refund_b)
        } else {
            (refund_b, refund_a)
        };

        let split_lo = allocate(amount, platform_fee, partner_amount, lo).unwrap();
        let split_hi = allocate(amount, platform_fee, partner_amount, hi).unwrap();

        prop_assert!(split_lo.platform_fee_refund <= split_hi.platform_fee_refund);
        prop_assert!(split_lo.partner_refund <= split_hi.partner_refund);
    }
}
