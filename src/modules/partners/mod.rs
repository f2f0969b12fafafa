pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    CapabilityFlags, FeeScheduleEntry, NewPartnerAccount, OnboardingStatus, PartnerAccount,
};
