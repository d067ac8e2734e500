//! Identity repository: registered users, dynamic admins, feedback and view counters on SQLite.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::models::{AdminRecord, BookView, FeedbackRecord, UserRecord};
use crate::repository::IdentityStore;
use crate::schema::init_schema;
use crate::sqlite_pool::{PoolSettings, SqlitePoolManager};

#[derive(Clone)]
pub struct IdentityRepository {
    pool_manager: SqlitePoolManager,
}

impl IdentityRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_settings(database_url, PoolSettings::default()).await
    }

    pub async fn with_settings(database_url: &str, settings: PoolSettings) -> Result<Self> {
        let pool_manager = SqlitePoolManager::with_settings(database_url, settings).await?;
        Self::from_pool(pool_manager).await
    }

    /// Shares an existing pool (and its in-memory database, if any).
    pub async fn from_pool(pool_manager: SqlitePoolManager) -> Result<Self> {
        init_schema(pool_manager.pool()).await?;
        Ok(Self { pool_manager })
    }
}

#[async_trait]
impl IdentityStore for IdentityRepository {
    async fn register_user(&self, id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO users (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(self.pool_manager.pool())
            .await?;
        let created = result.rows_affected() > 0;
        if created {
            info!(user_id = id, "registered new user");
        }
        Ok(created)
    }

    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT id, name FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>("SELECT id, name FROM users ORDER BY id")
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(users)
    }

    async fn count_users(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }

    async fn add_admin(&self, id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO admins (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(self.pool_manager.pool())
            .await?;
        info!(admin_id = id, created = result.rows_affected() > 0, "add_admin");
        Ok(result.rows_affected() > 0)
    }

    async fn remove_admin(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = ?")
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        info!(admin_id = id, removed = result.rows_affected() > 0, "remove_admin");
        Ok(result.rows_affected() > 0)
    }

    async fn list_admins(&self) -> Result<Vec<AdminRecord>> {
        let admins = sqlx::query_as::<_, AdminRecord>("SELECT id, name FROM admins ORDER BY id")
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(admins)
    }

    async fn is_listed_admin(&self, id: i64) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM admins WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(row.is_some())
    }

    async fn record_feedback(
        &self,
        user_id: i64,
        name: &str,
        username: Option<&str>,
        text: &str,
    ) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        sqlx::query(
            "INSERT INTO feedback (user_id, name, username, text, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(username)
        .bind(text)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;
        info!(user_id, "feedback recorded");
        Ok(true)
    }

    async fn list_recent_feedback(&self, limit: i64) -> Result<Vec<FeedbackRecord>> {
        let rows = sqlx::query_as::<_, FeedbackRecord>(
            r#"
            SELECT id, user_id, name, username, text, created_at FROM feedback
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(rows)
    }

    async fn find_feedback(&self, user_id: i64, text: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM feedback WHERE user_id = ? AND TRIM(text) = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(text.trim())
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(row.is_some())
    }

    async fn deduplicate_feedback(&self) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM feedback WHERE id NOT IN (
                SELECT MIN(id) FROM feedback GROUP BY user_id, TRIM(text)
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;
        info!(removed = result.rows_affected(), "deduplicate_feedback");
        Ok(result.rows_affected())
    }

    async fn increment_book_view(&self, title: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO book_views (book_name, count) VALUES (?, 1)
            ON CONFLICT(book_name) DO UPDATE SET count = count + 1
            "#,
        )
        .bind(title)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn add_book_views(&self, title: &str, count: i64) -> Result<bool> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO book_views (book_name, count) VALUES (?, ?)")
                .bind(title)
                .bind(count.max(0))
                .execute(self.pool_manager.pool())
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_book_views(&self) -> Result<Vec<BookView>> {
        let views = sqlx::query_as::<_, BookView>(
            "SELECT book_name, count FROM book_views ORDER BY count DESC, book_name",
        )
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(views)
    }
}
