//! Audio part rows.
//!
//! Parts are ordered by id within a book; the displayed "N-qism" label is derived from that
//! position and never stored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Part {
    pub id: i64,
    pub book_id: String,
    pub title: String,
    pub audio_url: String,
}

/// Display label for the part at 1-based `ordinal`.
pub fn part_label(ordinal: usize) -> String {
    format!("{}-qism", ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_label() {
        assert_eq!(part_label(1), "1-qism");
        assert_eq!(part_label(12), "12-qism");
    }
}
