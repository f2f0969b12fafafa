use crate::core::Result;
use crate::modules::ledger::models::BookingKind;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Generic labels used when a booking cannot be resolved
pub const FALLBACK_LABEL: &str = "Reserva";
pub const FALLBACK_CUSTOMER: &str = "Cliente";

/// Display data for one booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSummary {
    pub label: String,
    pub customer_name: String,
}

impl BookingSummary {
    fn fallback() -> Self {
        Self {
            label: FALLBACK_LABEL.to_string(),
            customer_name: FALLBACK_CUSTOMER.to_string(),
        }
    }
}

/// Read-side lookup into one booking vertical
///
/// One implementation per `BookingKind`; the booking domains themselves live
/// outside this crate.
#[async_trait]
pub trait BookingLookup: Send + Sync {
    async fn find_summary(&self, booking_reference: &str) -> Result<Option<BookingSummary>>;
}

/// Per-kind dispatch over the registered booking lookups
///
/// Resolution never fails the caller: an unregistered kind, a lookup error
/// or a miss all degrade to the generic labels, because a notification must
/// not be lost over display data.
#[derive(Default)]
pub struct BookingDirectory {
    lookups: HashMap<BookingKind, Arc<dyn BookingLookup>>,
}

impl BookingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, kind: BookingKind, lookup: Arc<dyn BookingLookup>) -> Self {
        self.lookups.insert(kind, lookup);
        self
    }

    /// Resolve display labels for a booking, degrading to generics
    pub async fn resolve(&self, kind: BookingKind, booking_reference: &str) -> BookingSummary {
        let Some(lookup) = self.lookups.get(&kind) else {
            tracing::debug!(kind = %kind, "No booking lookup registered, using fallback labels");
            return BookingSummary::fallback();
        };

        match lookup.find_summary(booking_reference).await {
            Ok(Some(summary)) => summary,
            Ok(None) => {
                tracing::debug!(
                    kind = %kind,
                    booking_reference = %booking_reference,
                    "Booking not found, using fallback labels"
                );
                BookingSummary::fallback()
            }
            Err(e) => {
                tracing::warn!(
                    kind = %kind,
                    booking_reference = %booking_reference,
                    error = %e,
                    "Booking lookup failed, using fallback labels"
                );
                BookingSummary::fallback()
            }
        }
    }
}
