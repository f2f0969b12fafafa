use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?,
            pool_size: env::var("DATABASE_POOL_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid DATABASE_POOL_SIZE".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid DATABASE_MAX_CONNECTIONS".to_string())
                })?,
        })
    }

    /// Check pool sizing before any connection attempt
    ///
    /// Every ledger write needs a connection for its row-lock transaction, so
    /// a zero-sized or inverted pool would deadlock the event handlers rather
    /// than fail fast.
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.pool_size > self.max_connections {
            return Err(AppError::Configuration(format!(
                "DATABASE_POOL_SIZE ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                self.pool_size, self.max_connections
            )));
        }

        Ok(())
    }

    /// Create a MySQL connection pool
    pub async fn create_pool(&self) -> Result<MySqlPool> {
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600)) // 10 minutes
            .max_lifetime(Duration::from_secs(1800)) // 30 minutes
            .test_before_acquire(true)
            .connect(&self.url)
            .await
            .map_err(AppError::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pool_size: u32, max_connections: u32) -> DatabaseConfig {
        DatabaseConfig {
            url: "mysql://localhost/ledger".to_string(),
            pool_size,
            max_connections,
        }
    }

    #[test]
    fn test_validate_accepts_sane_pool() {
        assert!(config(10, 20).validate().is_ok());
        assert!(config(20, 20).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        assert!(config(0, 20).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_pool() {
        assert!(config(30, 20).validate().is_err());
    }
}
