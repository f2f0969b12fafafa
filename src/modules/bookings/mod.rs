pub mod directory;

pub use directory::{BookingDirectory, BookingLookup, BookingSummary};
