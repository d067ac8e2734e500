//! Part link validation. Only `https://t.me/<channel>/<post>` references are stored as parts.

use once_cell::sync::Lazy;
use regex::Regex;

static PART_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://t\.me/[A-Za-z0-9_]+/[0-9]+$").expect("part link pattern is valid")
});

/// Example shown in prompts and error messages.
pub const PART_LINK_EXAMPLE: &str = "https://t.me/kanal/123";

/// True when `link` (already trimmed by the caller) is a channel post reference.
pub fn is_valid_part_link(link: &str) -> bool {
    PART_LINK.is_match(link)
}
