use super::super::models::{
    CapabilityFlags, FeeScheduleEntry, NewPartnerAccount, OnboardingStatus, PartnerAccount,
    validate_fee_percentage,
};
use super::super::repositories::{FeeScheduleRepository, PartnerRepository};
use crate::core::{AccessPolicy, AppError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Partner account registry
///
/// Owns account lifecycle and the fee schedule audit trail. Every fee
/// mutation appends a schedule entry and patches the account snapshot inside
/// one database transaction, so the two can never diverge.
pub struct PartnerService {
    partner_repo: PartnerRepository,
    fee_schedule_repo: FeeScheduleRepository,
    access_policy: Arc<dyn AccessPolicy>,
}

impl PartnerService {
    pub fn new(
        partner_repo: PartnerRepository,
        fee_schedule_repo: FeeScheduleRepository,
        access_policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            partner_repo,
            fee_schedule_repo,
            access_policy,
        }
    }

    /// Create a partner account with its seed fee schedule entry
    ///
    /// Fails with `Conflict` if an account already exists for the user
    /// (unique constraint, closes the duplicate-delivery race). The account
    /// insert and the seed entry commit atomically.
    pub async fn create_account(&self, input: NewPartnerAccount) -> Result<PartnerAccount> {
        let account = PartnerAccount::new(input)?;

        let seed_entry = FeeScheduleEntry::new(
            account.id.clone(),
            account.fee_percentage,
            "system".to_string(),
            "default rate".to_string(),
            None,
        )?;

        let mut tx = self.partner_repo.pool().begin().await?;

        self.partner_repo.create_with_tx(&account, &mut *tx).await?;
        self.fee_schedule_repo
            .append_with_tx(&seed_entry, &mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            partner_id = %account.id,
            user_id = %account.user_id,
            fee_percentage = %account.fee_percentage,
            "Partner account created"
        );

        Ok(account)
    }

    /// Apply a processor onboarding-status callback
    ///
    /// `completed` is the only status that activates the partner; every other
    /// value leaves `is_active` untouched. Capabilities merge field by field.
    pub async fn update_onboarding_status(
        &self,
        processor_account_ref: &str,
        status: OnboardingStatus,
        capabilities: Option<CapabilityFlags>,
    ) -> Result<PartnerAccount> {
        let mut account = self
            .partner_repo
            .find_by_processor_ref(processor_account_ref)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Partner with processor ref '{}' not found",
                    processor_account_ref
                ))
            })?;

        let activated = account.apply_onboarding(status, capabilities);
        self.partner_repo.update_onboarding(&account).await?;

        if activated {
            tracing::info!(partner_id = %account.id, "Partner activated after onboarding");
        } else {
            tracing::debug!(
                partner_id = %account.id,
                status = %status,
                "Partner onboarding status updated"
            );
        }

        Ok(account)
    }

    /// Change a partner's commission rate
    ///
    /// Admin-gated. Appends a fee schedule entry carrying the previous rate
    /// as audit snapshot and patches the account, in one transaction with the
    /// partner row locked FOR UPDATE so concurrent changes serialize in
    /// commit order.
    pub async fn change_fee(
        &self,
        partner_id: &str,
        new_fee_percentage: Decimal,
        actor: &str,
        reason: Option<String>,
    ) -> Result<FeeScheduleEntry> {
        if !self.access_policy.is_platform_admin(actor).await? {
            return Err(AppError::unauthorized(format!(
                "Actor '{}' may not change partner fees",
                actor
            )));
        }

        validate_fee_percentage(new_fee_percentage)?;

        let mut tx = self.partner_repo.pool().begin().await?;

        let account = PartnerRepository::find_by_id_for_update(&mut tx, partner_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Partner with id '{}' not found", partner_id))
            })?;

        let entry = FeeScheduleEntry::new(
            partner_id.to_string(),
            new_fee_percentage,
            actor.to_string(),
            reason.unwrap_or_else(|| "fee change".to_string()),
            Some(account.fee_percentage),
        )?;

        self.fee_schedule_repo
            .append_with_tx(&entry, &mut *tx)
            .await?;
        PartnerRepository::update_fee_with_tx(&mut tx, partner_id, new_fee_percentage).await?;

        tx.commit().await?;

        tracing::info!(
            partner_id = %partner_id,
            previous_fee = %account.fee_percentage,
            new_fee = %new_fee_percentage,
            actor = %actor,
            "Partner fee changed"
        );

        Ok(entry)
    }

    /// Admin override of the activation flag (e.g. suspension)
    ///
    /// Independent of onboarding status; does not touch the fee schedule.
    pub async fn set_active(&self, partner_id: &str, is_active: bool, actor: &str) -> Result<()> {
        if !self.access_policy.is_platform_admin(actor).await? {
            return Err(AppError::unauthorized(format!(
                "Actor '{}' may not change partner activation",
                actor
            )));
        }

        self.partner_repo.update_active(partner_id, is_active).await?;

        tracing::info!(
            partner_id = %partner_id,
            is_active = is_active,
            actor = %actor,
            "Partner activation flag changed"
        );

        Ok(())
    }

    /// Get partner by ID
    pub async fn get_partner(&self, partner_id: &str) -> Result<PartnerAccount> {
        self.partner_repo
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Partner with id '{}' not found", partner_id))
            })
    }

    /// Full fee history for a partner, oldest first
    pub async fn fee_history(&self, partner_id: &str) -> Result<Vec<FeeScheduleEntry>> {
        // Verify the partner exists so an empty history is distinguishable
        // from a bad id
        self.get_partner(partner_id).await?;

        self.fee_schedule_repo.list_for_partner(partner_id).await
    }
}
