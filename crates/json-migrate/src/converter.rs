//! Legacy JSON → import records.
//!
//! The old datastore was hand-edited at times, so parsing is lenient: ids may be numbers or
//! strings, and an entry that cannot be read is counted as malformed instead of failing the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::warn;

/// Longest name the legacy tables accepted.
const NAME_LIMIT: usize = 255;

/// Entries read from one file plus the number that could not be read.
#[derive(Debug, PartialEq, Eq)]
pub struct Parsed<T> {
    pub items: Vec<T>,
    pub malformed: usize,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            malformed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPart {
    pub title: String,
    pub audio_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyBook {
    pub id: String,
    pub title: String,
    pub parts: Vec<LegacyPart>,
    /// Part entries with an empty title or url.
    pub malformed_parts: usize,
}

/// A user or an admin: both files share the `{"<id>": {"id", "name"} | "<name>"}` layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPerson {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFeedback {
    pub user_id: i64,
    pub name: String,
    pub username: Option<String>,
    pub text: String,
}

/// Reads a JSON file. `None` when it is missing or unreadable.
pub fn read_json(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read legacy file");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Legacy file is not valid JSON");
            None
        }
    }
}

/// Copies `path` to `<backup_dir>/<file name>.<stamp>.bak`. Does nothing when `path` is missing.
pub fn backup_file(path: &Path, backup_dir: &Path, stamp: &str) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    fs::create_dir_all(backup_dir)
        .with_context(|| format!("Failed to create {}", backup_dir.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dest = backup_dir.join(format!("{}.{}.bak", file_name, stamp));
    fs::copy(path, &dest)
        .with_context(|| format!("Failed to back up {} to {}", path.display(), dest.display()))?;
    Ok(Some(dest))
}

/// String or number as trimmed text; anything else is empty.
fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn int_of(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn limit_name(name: &str) -> String {
    name.chars().take(NAME_LIMIT).collect()
}

/// `{"kitoblar": [{"id", "nomi", "qismlar": [{"nomi", "audio_url"}]}]}`
pub fn parse_books(value: &Value) -> Parsed<LegacyBook> {
    let mut parsed = Parsed::default();
    let Some(entries) = value.get("kitoblar").and_then(Value::as_array) else {
        return parsed;
    };
    for entry in entries {
        let id = text_of(entry.get("id"));
        let title = text_of(entry.get("nomi"));
        if id.is_empty() || title.is_empty() {
            parsed.malformed += 1;
            continue;
        }
        let mut book = LegacyBook {
            id,
            title,
            parts: Vec::new(),
            malformed_parts: 0,
        };
        for part in entry
            .get("qismlar")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let title = text_of(part.get("nomi"));
            let audio_url = text_of(part.get("audio_url"));
            if title.is_empty() || audio_url.is_empty() {
                book.malformed_parts += 1;
            } else {
                book.parts.push(LegacyPart { title, audio_url });
            }
        }
        parsed.items.push(book);
    }
    parsed
}

/// `{"<title>": <count>}`; counts may be numeric strings.
pub fn parse_views(value: &Value) -> Parsed<(String, i64)> {
    let mut parsed = Parsed::default();
    let Some(map) = value.as_object() else {
        return parsed;
    };
    for (title, count) in map {
        match int_of(Some(count)) {
            Some(count) if !title.trim().is_empty() => {
                parsed.items.push((title.clone(), count));
            }
            _ => parsed.malformed += 1,
        }
    }
    parsed
}

fn person(key: &str, value: &Value) -> Option<LegacyPerson> {
    let (id, name) = match value {
        Value::Object(fields) => {
            let id = int_of(fields.get("id")).or_else(|| key.trim().parse().ok())?;
            (id, text_of(fields.get("name")))
        }
        other => (key.trim().parse().ok()?, text_of(Some(other))),
    };
    (id > 0).then(|| LegacyPerson {
        id,
        name: limit_name(&name),
    })
}

/// `{"<id>": {"id", "name"}}` or `{"<id>": "<name>"}`; used for both users and admins.
pub fn parse_people(value: &Value) -> Parsed<LegacyPerson> {
    let mut parsed = Parsed::default();
    let empty = Map::new();
    for (key, entry) in value.as_object().unwrap_or(&empty) {
        match person(key, entry) {
            Some(p) => parsed.items.push(p),
            None => parsed.malformed += 1,
        }
    }
    parsed
}

/// `[{"id", "name", "username", "text"}]`
pub fn parse_feedback(value: &Value) -> Parsed<LegacyFeedback> {
    let mut parsed = Parsed::default();
    let Some(entries) = value.as_array() else {
        return parsed;
    };
    for entry in entries {
        let user_id = int_of(entry.get("id"));
        let text = text_of(entry.get("text"));
        match user_id {
            Some(user_id) if !text.is_empty() => {
                let username = text_of(entry.get("username"));
                parsed.items.push(LegacyFeedback {
                    user_id,
                    name: limit_name(&text_of(entry.get("name"))),
                    username: (!username.is_empty()).then(|| limit_name(&username)),
                    text,
                });
            }
            _ => parsed.malformed += 1,
        }
    }
    parsed
}
