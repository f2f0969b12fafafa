pub mod bookings;
pub mod ledger;
pub mod notifications;
pub mod partners;
