use async_trait::async_trait;
use partner_ledger::core::{AppError, Result};
use partner_ledger::modules::bookings::{BookingDirectory, BookingLookup, BookingSummary};
use partner_ledger::modules::ledger::models::BookingKind;
use std::sync::Arc;

struct FixedLookup {
    summary: BookingSummary,
}

#[async_trait]
impl BookingLookup for FixedLookup {
    async fn find_summary(&self, _booking_reference: &str) -> Result<Option<BookingSummary>> {
        Ok(Some(self.summary.clone()))
    }
}

struct MissingLookup;

#[async_trait]
impl BookingLookup for MissingLookup {
    async fn find_summary(&self, _booking_reference: &str) -> Result<Option<BookingSummary>> {
        Ok(None)
    }
}

struct FailingLookup;

#[async_trait]
impl BookingLookup for FailingLookup {
    async fn find_summary(&self, _booking_reference: &str) -> Result<Option<BookingSummary>> {
        Err(AppError::internal("booking service unreachable"))
    }
}

#[tokio::test]
async fn test_registered_kind_resolves_real_labels() {
    let directory = BookingDirectory::new().register(
        BookingKind::Accommodation,
        Arc::new(FixedLookup {
            summary: BookingSummary {
                label: "Casa Rural El Olivo".to_string(),
                customer_name: "Ana García".to_string(),
            },
        }),
    );

    let summary = directory
        .resolve(BookingKind::Accommodation, "booking-1")
        .await;
    assert_eq!(summary.label, "Casa Rural El Olivo");
    assert_eq!(summary.customer_name, "Ana García");
}

#[tokio::test]
async fn test_unregistered_kind_falls_back() {
    let directory = BookingDirectory::new();

    let summary = directory.resolve(BookingKind::Vehicle, "booking-2").await;
    assert_eq!(summary.label, "Reserva");
    assert_eq!(summary.customer_name, "Cliente");
}

#[tokio::test]
async fn test_missing_booking_falls_back() {
    let directory =
        BookingDirectory::new().register(BookingKind::Event, Arc::new(MissingLookup));

    let summary = directory.resolve(BookingKind::Event, "booking-3").await;
    assert_eq!(summary.label, "Reserva");
    assert_eq!(summary.customer_name, "Cliente");
}

#[tokio::test]
async fn test_lookup_error_degrades_instead_of_failing() {
    let directory =
        BookingDirectory::new().register(BookingKind::Package, Arc::new(FailingLookup));

    // Does not propagate the error
    let summary = directory.resolve(BookingKind::Package, "booking-4").await;
    assert_eq!(summary.label, "Reserva");
    assert_eq!(summary.customer_name, "Cliente");
}

#[tokio::test]
async fn test_kinds_dispatch_independently() {
    let directory = BookingDirectory::new()
        .register(
            BookingKind::Activity,
            Arc::new(FixedLookup {
                summary: BookingSummary {
                    label: "Kayak Tour".to_string(),
                    customer_name: "Luis".to_string(),
                },
            }),
        )
        .register(BookingKind::Event, Arc::new(MissingLookup));

    let activity = directory.resolve(BookingKind::Activity, "b-1").await;
    assert_eq!(activity.label, "Kayak Tour");

    let event = directory.resolve(BookingKind::Event, "b-2").await;
    assert_eq!(event.label, "Reserva");
}
