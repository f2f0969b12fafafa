use chrono::Utc;
use partner_ledger::modules::ledger::models::{
    BookingKind, NewTransaction, RefundAnnotation, Transaction, TransactionMetadata,
    TransactionStatus,
};
use partner_ledger::core::Currency;

fn capture_metadata() -> TransactionMetadata {
    let mut metadata = TransactionMetadata::default();
    metadata
        .extra
        .insert("processor_event".to_string(), serde_json::json!("evt_001"));
    metadata
        .extra
        .insert("channel".to_string(), serde_json::json!("mobile"));
    metadata
}

fn new_transaction_input() -> NewTransaction {
    NewTransaction {
        partner_id: "partner-1".to_string(),
        booking_reference: "booking-9".to_string(),
        booking_kind: BookingKind::Activity,
        processor_payment_reference: "pay_777".to_string(),
        processor_transfer_reference: None,
        amount: 10_000,
        platform_fee: 1_500,
        partner_amount: 8_500,
        currency: Currency::EUR,
        status: TransactionStatus::Pending,
        metadata: Some(capture_metadata()),
    }
}

#[test]
fn test_failure_merge_preserves_capture_context() {
    let mut tx = Transaction::new(new_transaction_input()).unwrap();

    tx.metadata
        .0
        .record_failure("card declined".to_string(), Utc::now());

    assert_eq!(tx.metadata.0.error.as_deref(), Some("card declined"));
    assert!(tx.metadata.0.failed_at.is_some());
    // Pre-existing keys survive
    assert_eq!(
        tx.metadata.0.extra.get("processor_event"),
        Some(&serde_json::json!("evt_001"))
    );
    assert_eq!(
        tx.metadata.0.extra.get("channel"),
        Some(&serde_json::json!("mobile"))
    );
}

#[test]
fn test_refund_after_failure_keeps_both_annotations() {
    let mut metadata = capture_metadata();
    metadata.record_failure("timeout".to_string(), Utc::now());
    metadata.record_refund(RefundAnnotation {
        refund_id: "re_1".to_string(),
        refund_amount: 5_000,
        refund_reason: "customer request".to_string(),
        refunded_at: Utc::now(),
        platform_fee_refund: 750,
        partner_refund: 4_250,
    });

    assert_eq!(metadata.error.as_deref(), Some("timeout"));
    assert_eq!(metadata.refund_id.as_deref(), Some("re_1"));
    assert_eq!(metadata.refund_amount, Some(5_000));
    assert_eq!(metadata.platform_fee_refund, Some(750));
    assert_eq!(metadata.partner_refund, Some(4_250));
    assert_eq!(
        metadata.extra.get("channel"),
        Some(&serde_json::json!("mobile"))
    );
}

#[test]
fn test_repeat_refund_overwrites_latest_wins() {
    let mut metadata = TransactionMetadata::default();
    let first = RefundAnnotation {
        refund_id: "re_1".to_string(),
        refund_amount: 3_000,
        refund_reason: "partial".to_string(),
        refunded_at: Utc::now(),
        platform_fee_refund: 450,
        partner_refund: 2_550,
    };
    let second = RefundAnnotation {
        refund_id: "re_2".to_string(),
        refund_amount: 2_000,
        refund_reason: "remainder".to_string(),
        refunded_at: Utc::now(),
        platform_fee_refund: 300,
        partner_refund: 1_700,
    };

    metadata.record_refund(first);
    metadata.record_refund(second);

    assert_eq!(metadata.refund_id.as_deref(), Some("re_2"));
    assert_eq!(metadata.refund_amount, Some(2_000));
}

#[test]
fn test_json_round_trip_through_storage_shape() {
    let mut metadata = capture_metadata();
    metadata.record_failure("declined".to_string(), Utc::now());

    // The JSON column stores exactly this serialization
    let stored = serde_json::to_string(&metadata).unwrap();
    let loaded: TransactionMetadata = serde_json::from_str(&stored).unwrap();

    assert_eq!(loaded, metadata);
}

#[test]
fn test_unknown_processor_keys_survive_round_trip() {
    let raw = serde_json::json!({
        "refund_id": "re_9",
        "refund_amount": 100,
        "some_future_field": {"nested": true},
    });

    let metadata: TransactionMetadata = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(metadata.refund_id.as_deref(), Some("re_9"));
    assert_eq!(
        metadata.extra.get("some_future_field"),
        Some(&serde_json::json!({"nested": true}))
    );

    let back = serde_json::to_value(&metadata).unwrap();
    assert_eq!(back["some_future_field"], raw["some_future_field"]);
}
