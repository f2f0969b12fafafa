use crate::core::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::env;

/// Authorization gate for privileged ledger operations
///
/// Fee changes and activation toggles are admin actions; the decision itself
/// belongs to the surrounding platform, so the ledger only consumes an opaque
/// boolean answer.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Whether the acting user holds the platform-admin privilege
    async fn is_platform_admin(&self, actor_user_id: &str) -> Result<bool>;
}

/// Env-configured policy: a fixed set of admin user ids
///
/// Stands in for the platform's role service in deployments where the ledger
/// runs standalone.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessPolicy {
    admin_user_ids: HashSet<String>,
}

impl StaticAccessPolicy {
    pub fn new(admin_user_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            admin_user_ids: admin_user_ids.into_iter().collect(),
        }
    }

    /// Load from `PLATFORM_ADMIN_IDS` (comma-separated user ids)
    pub fn from_env() -> Self {
        let ids = env::var("PLATFORM_ADMIN_IDS").unwrap_or_default();
        Self::new(
            ids.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        )
    }
}

#[async_trait]
impl AccessPolicy for StaticAccessPolicy {
    async fn is_platform_admin(&self, actor_user_id: &str) -> Result<bool> {
        Ok(self.admin_user_ids.contains(actor_user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_policy_membership() {
        let policy = StaticAccessPolicy::new(vec!["admin-1".to_string()]);
        assert!(policy.is_platform_admin("admin-1").await.unwrap());
        assert!(!policy.is_platform_admin("user-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_policy_denies_everyone() {
        let policy = StaticAccessPolicy::default();
        assert!(!policy.is_platform_admin("admin-1").await.unwrap());
    }
}
