use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::ledger::models::{NewTransaction, TransactionStatus};
use crate::modules::ledger::services::LedgerService;

/// Payment capture callback
/// POST /payment-events/capture
///
/// Idempotent under duplicate delivery of the same payment reference.
pub async fn capture(
    service: web::Data<Arc<LedgerService>>,
    payload: web::Json<NewTransaction>,
) -> Result<HttpResponse, AppError> {
    let transaction = service.create_from_capture(payload.into_inner()).await?;

    // Display-data lookups must not fail the capture record
    if let Err(e) = service.notify_new_transaction(&transaction.id).await {
        tracing::warn!(
            transaction_id = %transaction.id,
            error = %e,
            "New-transaction notification failed"
        );
    }

    Ok(HttpResponse::Created().json(transaction))
}

/// Trusted internal insert with a precomputed split
/// POST /transactions
pub async fn record(
    service: web::Data<Arc<LedgerService>>,
    payload: web::Json<NewTransaction>,
) -> Result<HttpResponse, AppError> {
    let transaction = service.record_transaction(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(transaction))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub processor_payment_reference: String,
    pub status: TransactionStatus,
    pub processor_transfer_reference: Option<String>,
}

/// Status update from the processor (e.g. transfer completion)
/// POST /payment-events/status
pub async fn update_status(
    service: web::Data<Arc<LedgerService>>,
    payload: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let transaction = service
        .update_status_by_payment_reference(
            &req.processor_payment_reference,
            req.status,
            req.processor_transfer_reference.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[derive(Debug, Deserialize)]
pub struct FailureRequest {
    pub transaction_id: String,
    pub error: String,
}

/// Processor failure callback
/// POST /payment-events/failure
pub async fn failure(
    service: web::Data<Arc<LedgerService>>,
    payload: web::Json<FailureRequest>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let transaction = service.record_failure(&req.transaction_id, &req.error).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub processor_payment_reference: String,
    pub refund_amount: i64,
    pub refund_id: String,
    pub reason: String,
}

/// Processor refund callback
/// POST /payment-events/refund
///
/// A refund for a payment reference outside this ledger is acknowledged and
/// ignored, not an error.
pub async fn refund(
    service: web::Data<Arc<LedgerService>>,
    payload: web::Json<RefundRequest>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let outcome = service
        .apply_refund(
            &req.processor_payment_reference,
            req.refund_amount,
            &req.refund_id,
            &req.reason,
        )
        .await?;

    match outcome {
        Some(transaction) => Ok(HttpResponse::Ok().json(transaction)),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({
            "ignored": true,
            "processor_payment_reference": req.processor_payment_reference,
        }))),
    }
}

/// Get a transaction by ID
/// GET /transactions/{id}
pub async fn get_transaction(
    service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let transaction = service.get_transaction(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

/// Get the transaction for a payment reference
/// GET /transactions/by-reference/{reference}
pub async fn get_by_reference(
    service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let transaction = service.get_by_payment_reference(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

/// List a partner's transactions
/// GET /partners/{id}/transactions
pub async fn list_partner_transactions(
    service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let transactions = service.list_partner_transactions(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transactions))
}

/// Configure ledger routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payment-events")
            .route("/capture", web::post().to(capture))
            .route("/status", web::post().to(update_status))
            .route("/failure", web::post().to(failure))
            .route("/refund", web::post().to(refund)),
    )
    .service(
        web::scope("/transactions")
            .route("", web::post().to(record))
            .route("/by-reference/{reference}", web::get().to(get_by_reference))
            .route("/{id}", web::get().to(get_transaction)),
    )
    // Registered before the partner scope in main so the specific path wins
    .route(
        "/partners/{id}/transactions",
        web::get().to(list_partner_transactions),
    );
}
