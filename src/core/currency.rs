use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported settlement currencies
///
/// Amounts are carried everywhere as integer minor units (cents), so the
/// enum's job is validation at the boundary and human-readable formatting
/// for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(3)", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro (2 decimal places)
    EUR,
    /// US Dollar (2 decimal places)
    USD,
    /// Pound Sterling (2 decimal places)
    GBP,
}

impl Currency {
    /// Number of minor-unit digits (cents) for this currency
    pub fn scale(&self) -> u32 {
        match self {
            Currency::EUR | Currency::USD | Currency::GBP => 2,
        }
    }

    /// Formats an amount of minor units for display, e.g. `49.99 EUR`
    pub fn format_minor(&self, amount: i64) -> String {
        // i128 so i64::MIN keeps a representable absolute value
        let divisor = 10i128.pow(self.scale());
        let sign = if amount < 0 { "-" } else { "" };
        let abs = (amount as i128).abs();
        format!(
            "{}{}.{:0width$} {}",
            sign,
            abs / divisor,
            abs % divisor,
            self,
            width = self.scale() as usize
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::EUR => write!(f, "EUR"),
            Currency::USD => write!(f, "USD"),
            Currency::GBP => write!(f, "GBP"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "GBP" => Ok(Currency::GBP),
            _ => Err(format!("Unsupported currency: {}", s)),
        }
    }
}
