use partner_ledger::modules::partners::models::{
    validate_fee_percentage, CapabilityFlags, FeeScheduleEntry, NewPartnerAccount,
    OnboardingStatus, PartnerAccount,
};
use rust_decimal_macros::dec;

fn new_account() -> PartnerAccount {
    PartnerAccount::new(NewPartnerAccount {
        user_id: "user-1".to_string(),
        processor_account_ref: "acct_abc".to_string(),
        country: "ES".to_string(),
        business_type: None,
        business_name: Some("Rutas del Sur".to_string()),
        default_fee_percentage: dec!(10),
    })
    .unwrap()
}

#[test]
fn test_seed_entry_matches_account_rate() {
    let account = new_account();

    // The seed entry created alongside the account carries the default rate
    // and no previous fee
    let seed = FeeScheduleEntry::new(
        account.id.clone(),
        account.fee_percentage,
        "system".to_string(),
        "default rate".to_string(),
        None,
    )
    .unwrap();

    assert_eq!(seed.fee_percentage, account.fee_percentage);
    assert_eq!(seed.previous_fee, None);
    assert_eq!(seed.reason, "default rate");
}

#[test]
fn test_fee_change_snapshots_previous_rate() {
    let account = new_account();

    // change_fee reads the current rate as previous_fee before patching
    let entry = FeeScheduleEntry::new(
        account.id.clone(),
        dec!(12),
        "admin-x".to_string(),
        "market adjustment".to_string(),
        Some(account.fee_percentage),
    )
    .unwrap();

    assert_eq!(entry.previous_fee, Some(dec!(10)));
    assert_eq!(entry.fee_percentage, dec!(12));
    assert_eq!(entry.created_by, "admin-x");
}

#[test]
fn test_fee_range_is_inclusive() {
    assert!(validate_fee_percentage(dec!(0)).is_ok());
    assert!(validate_fee_percentage(dec!(100)).is_ok());
    assert!(validate_fee_percentage(dec!(100.01)).is_err());
    assert!(validate_fee_percentage(dec!(-0.5)).is_err());
}

#[test]
fn test_activation_is_one_way_and_completed_only() {
    let mut account = new_account();
    assert!(!account.is_active);

    for status in [
        OnboardingStatus::Pending,
        OnboardingStatus::InProgress,
        OnboardingStatus::Rejected,
    ] {
        account.apply_onboarding(status, None);
        assert!(!account.is_active, "{} must not activate", status);
    }

    assert!(account.apply_onboarding(OnboardingStatus::Completed, None));
    assert!(account.is_active);

    // A later non-completed status does not deactivate
    account.apply_onboarding(OnboardingStatus::InProgress, None);
    assert!(account.is_active);
}

#[test]
fn test_capabilities_merge_only_reported_flags() {
    let mut account = new_account();

    account.apply_onboarding(
        OnboardingStatus::InProgress,
        Some(CapabilityFlags {
            charges_enabled: Some(true),
            transfers_enabled: None,
        }),
    );
    assert!(account.charges_enabled);
    assert!(!account.transfers_enabled);

    // The flag is not reset when the processor omits it later
    account.apply_onboarding(
        OnboardingStatus::Completed,
        Some(CapabilityFlags {
            charges_enabled: None,
            transfers_enabled: Some(true),
        }),
    );
    assert!(account.charges_enabled);
    assert!(account.transfers_enabled);
}

#[test]
fn test_duplicate_account_guard_is_storage_level() {
    // Two in-memory accounts for the same user build fine; the ConflictError
    // comes from the UNIQUE index on user_id at insert time, by design.
    let a = new_account();
    let b = new_account();
    assert_eq!(a.user_id, b.user_id);
    assert_ne!(a.id, b.id);
}
