//! Table creation. Each statement runs separately; all are idempotent.

use sqlx::SqlitePool;
use tracing::info;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS parts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        audio_url TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_parts_book_id ON parts(book_id)",
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS book_genres (
        book_id TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
        PRIMARY KEY (book_id, genre_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admins (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedback (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        username TEXT,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_feedback_user_text ON feedback(user_id, text)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_created_at ON feedback(created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS book_views (
        book_name TEXT PRIMARY KEY,
        count INTEGER NOT NULL DEFAULT 0
    )
    "#,
];

/// Creates all tables and indexes if they do not exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Creating database tables if not exist");
    for stmt in DDL {
        sqlx::query(stmt).execute(pool).await?;
    }
    info!("Database tables created successfully");
    Ok(())
}
