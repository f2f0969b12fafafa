pub mod metadata;
pub mod transaction;

pub use metadata::{RefundAnnotation, TransactionMetadata};
pub use transaction::{BookingKind, NewTransaction, Transaction, TransactionStatus};
