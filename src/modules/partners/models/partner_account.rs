use crate::core::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::fee_schedule_entry::validate_fee_percentage;

/// Partner onboarding status as reported by the payment processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    /// Account created, processor onboarding not started
    Pending,

    /// Processor onboarding underway
    InProgress,

    /// Onboarding finished; the only status that activates the partner
    Completed,

    /// Processor rejected the account
    Rejected,
}

impl OnboardingStatus {
    /// Whether reaching this status flips the partner to active.
    ///
    /// Activation is one-way: no other status value touches `is_active`.
    pub fn activates(&self) -> bool {
        matches!(self, OnboardingStatus::Completed)
    }
}

impl std::fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnboardingStatus::Pending => write!(f, "pending"),
            OnboardingStatus::InProgress => write!(f, "in_progress"),
            OnboardingStatus::Completed => write!(f, "completed"),
            OnboardingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for OnboardingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OnboardingStatus::Pending),
            "in_progress" => Ok(OnboardingStatus::InProgress),
            "completed" => Ok(OnboardingStatus::Completed),
            "rejected" => Ok(OnboardingStatus::Rejected),
            _ => Err(format!("Invalid onboarding status: {}", s)),
        }
    }
}

/// Partial capability update from a processor status callback
///
/// Only the flags the processor reported are applied; absent flags keep
/// their stored value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CapabilityFlags {
    pub charges_enabled: Option<bool>,
    pub transfers_enabled: Option<bool>,
}

/// Marketplace partner account
///
/// One record per owning user identity. Holds the denormalized current fee
/// percentage; the authoritative history lives in `fee_schedule_entries`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartnerAccount {
    /// Unique partner ID (UUID)
    #[serde(skip_deserializing)]
    pub id: String,

    /// Owning user identity (unique, 1:1)
    pub user_id: String,

    /// Processor-issued account reference (unique)
    pub processor_account_ref: String,

    /// ISO country code
    pub country: String,

    /// Legal entity type, if reported
    pub business_type: Option<String>,

    /// Trading name, if reported
    pub business_name: Option<String>,

    /// Onboarding state
    pub onboarding_status: OnboardingStatus,

    /// Current commission rate in percent, [0, 100]
    pub fee_percentage: Decimal,

    /// True only after onboarding completes (or an admin override)
    pub is_active: bool,

    /// Processor capability: can accept card charges
    pub charges_enabled: bool,

    /// Processor capability: can receive transfers
    pub transfers_enabled: bool,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Creation payload for a partner account
#[derive(Debug, Clone, Deserialize)]
pub struct NewPartnerAccount {
    pub user_id: String,
    pub processor_account_ref: String,
    pub country: String,
    pub business_type: Option<String>,
    pub business_name: Option<String>,
    pub default_fee_percentage: Decimal,
}

impl PartnerAccount {
    /// Build a new account in its initial state
    ///
    /// Starts `pending` and inactive, with both capabilities off; activation
    /// happens only through the processor onboarding callback.
    pub fn new(input: NewPartnerAccount) -> Result<Self> {
        if input.user_id.trim().is_empty() {
            return Err(AppError::validation("User ID cannot be empty"));
        }

        if input.processor_account_ref.trim().is_empty() {
            return Err(AppError::validation(
                "Processor account reference cannot be empty",
            ));
        }

        if input.country.trim().is_empty() {
            return Err(AppError::validation("Country cannot be empty"));
        }

        validate_fee_percentage(input.default_fee_percentage)?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: input.user_id,
            processor_account_ref: input.processor_account_ref,
            country: input.country,
            business_type: input.business_type,
            business_name: input.business_name,
            onboarding_status: OnboardingStatus::Pending,
            fee_percentage: input.default_fee_percentage,
            is_active: false,
            charges_enabled: false,
            transfers_enabled: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        })
    }

    /// Apply a processor onboarding callback
    ///
    /// Returns true if the partner became active in this transition.
    pub fn apply_onboarding(
        &mut self,
        status: OnboardingStatus,
        capabilities: Option<CapabilityFlags>,
    ) -> bool {
        self.onboarding_status = status;

        if let Some(flags) = capabilities {
            if let Some(charges) = flags.charges_enabled {
                self.charges_enabled = charges;
            }
            if let Some(transfers) = flags.transfers_enabled {
                self.transfers_enabled = transfers;
            }
        }

        self.updated_at = Some(Utc::now());

        if status.activates() && !self.is_active {
            self.is_active = true;
            return true;
        }
        false
    }
}
