//! Partner Revenue Ledger
//!
//! Tracks how money flows from customer payments to marketplace partners:
//! versioned commission rates, a transaction log keyed by processor payment
//! reference, and proportional idempotent refund allocation.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::bookings;
pub use modules::ledger;
pub use modules::notifications;
pub use modules::partners;
