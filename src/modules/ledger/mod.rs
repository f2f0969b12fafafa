pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    BookingKind, NewTransaction, RefundAnnotation, Transaction, TransactionMetadata,
    TransactionStatus,
};
