pub mod auth;
pub mod currency;
pub mod error;

pub use auth::{AccessPolicy, StaticAccessPolicy};
pub use currency::Currency;
pub use error::{AppError, Result};
