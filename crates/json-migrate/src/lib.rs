//! # JSON Migrate
//!
//! One-time import of the legacy JSON datastore (`books.json`, `book_views.json`, `users.json`,
//! `admins.json`, `feedback.json`) into the SQLite catalog.
//!
//! Every source file is backed up before it is read. Import is idempotent: rows that already
//! exist are skipped, so the command can be re-run safely.

mod config;
mod converter;

#[cfg(test)]
mod converter_test;

pub use config::{EntityReport, MigrateConfig, MigrateReport};

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use storage::{CatalogRepository, CatalogStore, IdentityRepository, IdentityStore, SqlitePoolManager};
use tracing::{info, warn};

use config::{ADMINS_FILE, BOOKS_FILE, FEEDBACK_FILE, USERS_FILE, VIEWS_FILE};
use converter::{
    backup_file, parse_books, parse_feedback, parse_people, parse_views, read_json, LegacyBook,
    LegacyFeedback, LegacyPerson,
};

/// Runs the full migration against `config.database_url`.
///
/// # Flow
///
/// 1. Open the database (schema is created if missing).
/// 2. For each legacy file: back it up, parse it, insert what is not there yet.
/// 3. Return added/skipped counts per entity.
///
/// Only setup failures (database unreachable, backup directory not writable) are errors;
/// a single entry that fails to insert is logged and counted as skipped.
pub async fn migrate(config: &MigrateConfig) -> Result<MigrateReport> {
    info!(database_url = %config.database_url, data_dir = %config.data_dir.display(), "Starting migration");

    let pool = SqlitePoolManager::with_settings(&config.database_url, config.pool.clone())
        .await
        .context("Failed to open database")?;
    let catalog = CatalogRepository::from_pool(pool.clone())
        .await
        .context("Failed to initialise catalog schema")?;
    let identity = IdentityRepository::from_pool(pool)
        .await
        .context("Failed to initialise identity schema")?;

    let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let report = import_all(&catalog, &identity, &config.data_dir, &config.backup_dir(), &stamp).await?;

    info!(
        books = report.books.added,
        parts = report.parts.added,
        users = report.users.added,
        backups = report.backups.len(),
        "Migration completed"
    );
    Ok(report)
}

/// Imports every legacy file found in `data_dir` into the given stores.
pub async fn import_all(
    catalog: &dyn CatalogStore,
    identity: &dyn IdentityStore,
    data_dir: &Path,
    backup_dir: &Path,
    stamp: &str,
) -> Result<MigrateReport> {
    let mut report = MigrateReport::default();

    let mut load = |file: &str| -> Result<Option<serde_json::Value>> {
        let path = data_dir.join(file);
        if let Some(dest) = backup_file(&path, backup_dir, stamp)? {
            info!(source = %path.display(), backup = %dest.display(), "Backed up legacy file");
            report.backups.push(dest);
        }
        Ok(read_json(&path))
    };

    let books = load(BOOKS_FILE)?;
    let views = load(VIEWS_FILE)?;
    let users = load(USERS_FILE)?;
    let admins = load(ADMINS_FILE)?;
    let feedback = load(FEEDBACK_FILE)?;

    if let Some(value) = books {
        let parsed = parse_books(&value);
        report.books.skip_n(parsed.malformed);
        for book in &parsed.items {
            import_book(catalog, book, &mut report).await;
        }
    }

    if let Some(value) = views {
        let parsed = parse_views(&value);
        report.views.skip_n(parsed.malformed);
        for (title, count) in &parsed.items {
            match identity.add_book_views(title, *count).await {
                Ok(true) => report.views.add(),
                Ok(false) => report.views.skip(),
                Err(e) => {
                    warn!(title = %title, error = %e, "View counter import failed");
                    report.views.skip();
                }
            }
        }
    }

    if let Some(value) = users {
        let parsed = parse_people(&value);
        report.users.skip_n(parsed.malformed);
        for person in &parsed.items {
            let result = identity.register_user(person.id, &person.name).await;
            count_person(result, person, "user", &mut report.users);
        }
    }

    if let Some(value) = admins {
        let parsed = parse_people(&value);
        report.admins.skip_n(parsed.malformed);
        for person in &parsed.items {
            let result = identity.add_admin(person.id, &person.name).await;
            count_person(result, person, "admin", &mut report.admins);
        }
    }

    if let Some(value) = feedback {
        let parsed = parse_feedback(&value);
        report.feedback.skip_n(parsed.malformed);
        for entry in &parsed.items {
            import_feedback(identity, entry, &mut report.feedback).await;
        }
    }

    Ok(report)
}

async fn import_book(catalog: &dyn CatalogStore, book: &LegacyBook, report: &mut MigrateReport) {
    match catalog.create_book(&book.id, &book.title).await {
        Ok(true) => report.books.add(),
        Ok(false) => report.books.skip(),
        Err(e) => {
            warn!(book_id = %book.id, error = %e, "Book import failed");
            report.books.skip();
            report.parts.skip_n(book.parts.len() + book.malformed_parts);
            return;
        }
    }

    report.parts.skip_n(book.malformed_parts);
    let mut existing: HashSet<(String, String)> = match catalog.list_parts(&book.id).await {
        Ok(parts) => parts.into_iter().map(|p| (p.title, p.audio_url)).collect(),
        Err(e) => {
            warn!(book_id = %book.id, error = %e, "Cannot list existing parts");
            report.parts.skip_n(book.parts.len());
            return;
        }
    };

    for part in &book.parts {
        let key = (part.title.clone(), part.audio_url.clone());
        if existing.contains(&key) {
            report.parts.skip();
            continue;
        }
        match catalog.add_part(&book.id, &part.title, &part.audio_url).await {
            Ok(_) => {
                report.parts.add();
                existing.insert(key);
            }
            Err(e) => {
                warn!(book_id = %book.id, part = %part.title, error = %e, "Part import failed");
                report.parts.skip();
            }
        }
    }
}

fn count_person(
    result: storage::Result<bool>,
    person: &LegacyPerson,
    kind: &str,
    counts: &mut EntityReport,
) {
    match result {
        Ok(true) => counts.add(),
        Ok(false) => counts.skip(),
        Err(e) => {
            warn!(id = person.id, kind = kind, error = %e, "Import failed");
            counts.skip();
        }
    }
}

async fn import_feedback(
    identity: &dyn IdentityStore,
    entry: &LegacyFeedback,
    counts: &mut EntityReport,
) {
    match identity.find_feedback(entry.user_id, &entry.text).await {
        Ok(true) => {
            counts.skip();
            return;
        }
        Ok(false) => {}
        Err(e) => {
            warn!(user_id = entry.user_id, error = %e, "Feedback lookup failed");
            counts.skip();
            return;
        }
    }
    let stored = identity
        .record_feedback(
            entry.user_id,
            &entry.name,
            entry.username.as_deref(),
            &entry.text,
        )
        .await;
    match stored {
        Ok(true) => counts.add(),
        Ok(false) => counts.skip(),
        Err(e) => {
            warn!(user_id = entry.user_id, error = %e, "Feedback import failed");
            counts.skip();
        }
    }
}
