use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::partners::models::{CapabilityFlags, NewPartnerAccount, OnboardingStatus};
use crate::modules::partners::services::PartnerService;

/// Create a partner account
/// POST /partners
pub async fn create_partner(
    service: web::Data<Arc<PartnerService>>,
    payload: web::Json<NewPartnerAccount>,
) -> Result<HttpResponse, AppError> {
    let account = service.create_account(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(account))
}

#[derive(Debug, Deserialize)]
pub struct OnboardingCallbackRequest {
    pub processor_account_ref: String,
    pub status: OnboardingStatus,
    pub capabilities: Option<CapabilityFlags>,
}

/// Processor onboarding-status callback
/// POST /partners/onboarding-status
pub async fn onboarding_callback(
    service: web::Data<Arc<PartnerService>>,
    payload: web::Json<OnboardingCallbackRequest>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let account = service
        .update_onboarding_status(&req.processor_account_ref, req.status, req.capabilities)
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

#[derive(Debug, Deserialize)]
pub struct ChangeFeeRequest {
    pub fee_percentage: Decimal,
    pub actor: String,
    pub reason: Option<String>,
}

/// Change a partner's commission rate (admin)
/// PATCH /partners/{id}/fee
pub async fn change_fee(
    service: web::Data<Arc<PartnerService>>,
    path: web::Path<String>,
    payload: web::Json<ChangeFeeRequest>,
) -> Result<HttpResponse, AppError> {
    let partner_id = path.into_inner();
    let req = payload.into_inner();

    let entry = service
        .change_fee(&partner_id, req.fee_percentage, &req.actor, req.reason)
        .await?;
    Ok(HttpResponse::Ok().json(entry))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
    pub actor: String,
}

/// Toggle a partner's activation flag (admin override)
/// PATCH /partners/{id}/active
pub async fn set_active(
    service: web::Data<Arc<PartnerService>>,
    path: web::Path<String>,
    payload: web::Json<SetActiveRequest>,
) -> Result<HttpResponse, AppError> {
    let partner_id = path.into_inner();
    let req = payload.into_inner();

    service
        .set_active(&partner_id, req.is_active, &req.actor)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Get a partner account
/// GET /partners/{id}
pub async fn get_partner(
    service: web::Data<Arc<PartnerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let account = service.get_partner(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Fee schedule history for a partner
/// GET /partners/{id}/fee-history
pub async fn fee_history(
    service: web::Data<Arc<PartnerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let entries = service.fee_history(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Configure partner routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/partners")
            .route("", web::post().to(create_partner))
            .route("/onboarding-status", web::post().to(onboarding_callback))
            .route("/{id}", web::get().to(get_partner))
            .route("/{id}/fee", web::patch().to(change_fee))
            .route("/{id}/active", web::patch().to(set_active))
            .route("/{id}/fee-history", web::get().to(fee_history)),
    );
}
