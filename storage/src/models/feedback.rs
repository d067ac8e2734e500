//! Feedback record model for persistence.
//!
//! Denormalized: sender name and username are copied at submission time, no link to `users`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackRecord {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub username: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
