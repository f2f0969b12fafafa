pub mod fee_schedule_entry;
pub mod partner_account;

pub use fee_schedule_entry::{validate_fee_percentage, FeeScheduleEntry};
pub use partner_account::{CapabilityFlags, NewPartnerAccount, OnboardingStatus, PartnerAccount};
