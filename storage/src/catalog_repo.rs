//! Catalog repository: books, parts, genres and book↔genre links on SQLite.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::models::{Book, Genre, Part};
use crate::repository::CatalogStore;
use crate::schema::init_schema;
use crate::sqlite_pool::{PoolSettings, SqlitePoolManager};

/// SQL fragment: `id` is a non-empty string of ASCII digits.
const NUMERIC_ID: &str = "(id <> '' AND id NOT GLOB '*[^0-9]*')";

fn book_order(alias: &str) -> String {
    let numeric = NUMERIC_ID.replace("id", &format!("{}id", alias));
    format!(
        "ORDER BY (NOT {numeric}), CASE WHEN {numeric} THEN CAST({alias}id AS INTEGER) END, {alias}id",
        numeric = numeric,
        alias = alias
    )
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool_manager: SqlitePoolManager,
}

impl CatalogRepository {
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
impl CatalogStore for CatalogRepository {
    async fn create_book(&self, id: &str, title: &str) -> Result<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO books (id, title) VALUES (?, ?)")
            .bind(id)
            .bind(title)
            .execute(self.pool_manager.pool())
            .await?;
        let created = result.rows_affected() > 0;
        info!(book_id = %id, title = %title, created, "create_book");
        Ok(created)
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        let sql = format!("SELECT id, title FROM books {}", book_order(""));
        let books = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(books)
    }

    async fn get_book(&self, id: &str) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(book)
    }

    async fn get_book_by_title(&self, title: &str) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title FROM books WHERE title = ? ORDER BY rowid LIMIT 1",
        )
        .bind(title)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(book)
    }

    async fn rename_book(&self, id: &str, title: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE books SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        info!(book_id = %id, title = %title, "rename_book");
        Ok(result.rows_affected() > 0)
    }

    async fn delete_book(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        info!(book_id = %id, deleted = result.rows_affected(), "delete_book");
        Ok(result.rows_affected() > 0)
    }

    async fn next_book_id(&self) -> Result<String> {
        let sql = format!(
            "SELECT MAX(CASE WHEN {} THEN CAST(id AS INTEGER) END) FROM books",
            NUMERIC_ID
        );
        let (max,): (Option<i64>,) = sqlx::query_as(&sql)
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok((max.unwrap_or(0) + 1).to_string())
    }

    async fn add_part(&self, book_id: &str, title: &str, audio_url: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO parts (book_id, title, audio_url) VALUES (?, ?, ?)")
            .bind(book_id)
            .bind(title)
            .bind(audio_url)
            .execute(self.pool_manager.pool())
            .await?;
        let id = result.last_insert_rowid();
        info!(book_id = %book_id, part_id = id, "add_part");
        Ok(id)
    }

    async fn list_parts(&self, book_id: &str) -> Result<Vec<Part>> {
        let parts = sqlx::query_as::<_, Part>(
            "SELECT id, book_id, title, audio_url FROM parts WHERE book_id = ? ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(parts)
    }

    async fn delete_part_by_ordinal(&self, book_id: &str, ordinal: usize) -> Result<bool> {
        if ordinal == 0 {
            return Ok(false);
        }
        let result = sqlx::query(
            r#"
            DELETE FROM parts WHERE id = (
                SELECT id FROM parts WHERE book_id = ? ORDER BY id LIMIT 1 OFFSET ?
            )
            "#,
        )
        .bind(book_id)
        .bind((ordinal - 1) as i64)
        .execute(self.pool_manager.pool())
        .await?;
        info!(book_id = %book_id, ordinal, deleted = result.rows_affected(), "delete_part_by_ordinal");
        Ok(result.rows_affected() > 0)
    }

    async fn add_genre(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO genres (name) VALUES (?)")
            .bind(name)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name, id")
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(genres)
    }

    async fn get_genre(&self, id: i64) -> Result<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(genre)
    }

    async fn delete_genre(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = ?")
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        info!(genre_id = id, deleted = result.rows_affected(), "delete_genre");
        Ok(result.rows_affected() > 0)
    }

    async fn set_book_genres(&self, book_id: &str, genre_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool_manager.pool().begin().await?;
        sqlx::query("DELETE FROM book_genres WHERE book_id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        for genre_id in genre_ids {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO book_genres (book_id, genre_id)
                SELECT b.id, g.id FROM books b, genres g WHERE b.id = ? AND g.id = ?
                "#,
            )
            .bind(book_id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        info!(book_id = %book_id, genres = genre_ids.len(), "set_book_genres");
        Ok(())
    }

    async fn genres_for_book(&self, book_id: &str) -> Result<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = ?
            ORDER BY g.name, g.id
            "#,
        )
        .bind(book_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(genres)
    }

    async fn books_for_genre(&self, genre_id: i64) -> Result<Vec<Book>> {
        let sql = format!(
            r#"
            SELECT b.id, b.title FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = ?
            {}
            "#,
            book_order("b.")
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(genre_id)
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(books)
    }
}
