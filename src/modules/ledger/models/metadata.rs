use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Typed annotation bag attached to a transaction
///
/// Known annotations (failure and refund) are real fields; anything else the
/// processor sent at capture time lives in the flattened `extra` map.
/// Setters merge: a refund annotation never erases a failure annotation or
/// capture context, and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    /// Failure reason, set by `record_failure`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,

    /// Processor refund identifier, set by `apply_refund`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_id: Option<String>,

    /// Refunded gross amount in minor units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_at: Option<DateTime<Utc>>,

    /// Platform-fee share of the refund, in minor units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fee_refund: Option<i64>,

    /// Partner share of the refund, in minor units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_refund: Option<i64>,

    /// Open processor context captured at creation time
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Refund annotation applied in one merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundAnnotation {
    pub refund_id: String,
    pub refund_amount: i64,
    pub refund_reason: String,
    pub refunded_at: DateTime<Utc>,
    pub platform_fee_refund: i64,
    pub partner_refund: i64,
}

impl TransactionMetadata {
    /// Merge a failure annotation, keeping all other fields
    pub fn record_failure(&mut self, error: String, failed_at: DateTime<Utc>) {
        self.error = Some(error);
        self.failed_at = Some(failed_at);
    }

    /// Merge a refund annotation, keeping all other fields
    ///
    /// A repeat partial refund overwrites the previous refund fields
    /// (latest-refund-wins); prior values are only visible in logs.
    pub fn record_refund(&mut self, refund: RefundAnnotation) {
        self.refund_id = Some(refund.refund_id);
        self.refund_amount = Some(refund.refund_amount);
        self.refund_reason = Some(refund.refund_reason);
        self.refunded_at = Some(refund.refunded_at);
        self.platform_fee_refund = Some(refund.platform_fee_refund);
        self.partner_refund = Some(refund.partner_refund);
    }
}
