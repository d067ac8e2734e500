//! Store traits. The bot depends on these, never on the concrete repositories.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AdminRecord, Book, BookView, FeedbackRecord, Genre, Part, UserRecord};

/// Books, parts, genres and the book↔genre association.
///
/// Insert-if-absent operations return `true` when a row was written; a duplicate key is a no-op, not an error.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_book(&self, id: &str, title: &str) -> Result<bool>;
    /// Numeric ids first in numeric order, then the rest lexicographically.
    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn get_book(&self, id: &str) -> Result<Option<Book>>;
    async fn get_book_by_title(&self, title: &str) -> Result<Option<Book>>;
    async fn rename_book(&self, id: &str, title: &str) -> Result<bool>;
    /// Cascades to parts and genre links.
    async fn delete_book(&self, id: &str) -> Result<bool>;
    /// `max(numeric ids) + 1`. Read and insert are separate statements, so two concurrent callers may get the same id.
    async fn next_book_id(&self) -> Result<String>;

    /// Appends a part and returns its row id.
    async fn add_part(&self, book_id: &str, title: &str, audio_url: &str) -> Result<i64>;
    /// Parts in creation order (id ascending).
    async fn list_parts(&self, book_id: &str) -> Result<Vec<Part>>;
    /// Deletes the part at 1-based `ordinal` in creation order.
    async fn delete_part_by_ordinal(&self, book_id: &str, ordinal: usize) -> Result<bool>;

    async fn add_genre(&self, name: &str) -> Result<bool>;
    /// Ordered by name.
    async fn list_genres(&self) -> Result<Vec<Genre>>;
    async fn get_genre(&self, id: i64) -> Result<Option<Genre>>;
    /// Removes the genre and its association rows; books are untouched.
    async fn delete_genre(&self, id: i64) -> Result<bool>;
    /// Replaces the full association set in one transaction. Unknown genre ids are skipped.
    async fn set_book_genres(&self, book_id: &str, genre_ids: &[i64]) -> Result<()>;
    async fn genres_for_book(&self, book_id: &str) -> Result<Vec<Genre>>;
    async fn books_for_genre(&self, genre_id: i64) -> Result<Vec<Book>>;
}

/// Users, dynamic admins, feedback and per-title view counters.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn register_user(&self, id: i64, name: &str) -> Result<bool>;
    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>>;
    async fn list_users(&self) -> Result<Vec<UserRecord>>;
    async fn count_users(&self) -> Result<i64>;

    async fn add_admin(&self, id: i64, name: &str) -> Result<bool>;
    async fn remove_admin(&self, id: i64) -> Result<bool>;
    async fn list_admins(&self) -> Result<Vec<AdminRecord>>;
    /// Membership in the dynamic admin table only.
    async fn is_listed_admin(&self, id: i64) -> Result<bool>;

    /// Stores trimmed text with a server-side timestamp. Empty-after-trim text is dropped and returns `false`.
    async fn record_feedback(
        &self,
        user_id: i64,
        name: &str,
        username: Option<&str>,
        text: &str,
    ) -> Result<bool>;
    /// Newest first by timestamp, then by insertion order.
    async fn list_recent_feedback(&self, limit: i64) -> Result<Vec<FeedbackRecord>>;
    /// Whether a row with this user id and trimmed text exists.
    async fn find_feedback(&self, user_id: i64, text: &str) -> Result<bool>;
    /// Removes duplicate (user id, trimmed text) rows keeping the oldest; returns the removed count.
    async fn deduplicate_feedback(&self) -> Result<u64>;

    async fn increment_book_view(&self, title: &str) -> Result<()>;
    /// Seeds a counter when the title has none yet.
    async fn add_book_views(&self, title: &str, count: i64) -> Result<bool>;
    /// Sorted by count descending, then title.
    async fn list_book_views(&self) -> Result<Vec<BookView>>;
}
