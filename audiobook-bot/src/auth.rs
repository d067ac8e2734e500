//! Admin policy: static allow-list from config ∪ the dynamic admins table, read on every check.

use std::collections::HashSet;
use std::sync::Arc;
use storage::IdentityStore;
use tracing::warn;

#[derive(Clone)]
pub struct AdminPolicy {
    static_admins: HashSet<i64>,
    identity: Arc<dyn IdentityStore>,
}

impl AdminPolicy {
    pub fn new(static_admins: impl IntoIterator<Item = i64>, identity: Arc<dyn IdentityStore>) -> Self {
        Self {
            static_admins: static_admins.into_iter().collect(),
            identity,
        }
    }

    pub fn is_static_admin(&self, user_id: i64) -> bool {
        self.static_admins.contains(&user_id)
    }

    /// True for static admins, otherwise asks the store. A store error counts as "not listed".
    pub async fn is_admin(&self, user_id: i64) -> bool {
        if self.is_static_admin(user_id) {
            return true;
        }
        match self.identity.is_listed_admin(user_id).await {
            Ok(listed) => listed,
            Err(e) => {
                warn!(error = %e, user_id = user_id, "Admin lookup failed; using static list only");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::IdentityRepository;

    #[tokio::test]
    async fn test_static_and_dynamic_admins() {
        let repo = Arc::new(IdentityRepository::new("sqlite::memory:").await.unwrap());
        let policy = AdminPolicy::new([1], repo.clone());

        assert!(policy.is_admin(1).await);
        assert!(!policy.is_admin(2).await);

        repo.add_admin(2, "Vali").await.unwrap();
        assert!(policy.is_admin(2).await);

        repo.remove_admin(2).await.unwrap();
        assert!(!policy.is_admin(2).await);
    }
}
