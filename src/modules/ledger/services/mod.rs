pub mod ledger_service;
pub mod refund_allocator;

pub use ledger_service::LedgerService;
pub use refund_allocator::{allocate, RefundSplit};
