//! Menu renderer: pure functions from item lists to button grids.

use abot_core::{Button, Keyboard};

use crate::callback::Callback;

/// Books shown per page in the public book list.
pub const BOOKS_PER_PAGE: usize = 20;

pub fn button(label: impl Into<String>, callback: Callback) -> Button {
    Button::new(label, callback.to_string())
}

/// Two items per row (trailing single allowed), then `nav` as a final row.
pub fn two_column(items: Vec<Button>, nav: Vec<Button>) -> Keyboard {
    let mut keyboard = Keyboard::new();
    let mut items = items.into_iter();
    while let Some(first) = items.next() {
        let mut row = vec![first];
        if let Some(second) = items.next() {
            row.push(second);
        }
        keyboard = keyboard.row(row);
    }
    keyboard.row(nav)
}

/// One item per row, then `nav`.
pub fn single_column(items: Vec<Button>, nav: Vec<Button>) -> Keyboard {
    items
        .into_iter()
        .fold(Keyboard::new(), |kb, b| kb.single(b))
        .row(nav)
}

/// A slice of items for one page.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Zero-based, clamped to the last page.
    pub number: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 0
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

/// Cuts `items` into pages of `per_page`; an out-of-range page shows the last one.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let number = page.min(total_pages - 1);
    let start = (number * per_page).min(items.len());
    let end = (start + per_page).min(items.len());
    Page {
        items: &items[start..end],
        number,
        total_pages,
    }
}

/// Prev/next buttons for a paginated list; empty when everything fits on one page.
pub fn page_row<T>(page: &Page<'_, T>, to_callback: impl Fn(usize) -> Callback) -> Vec<Button> {
    let mut row = Vec::new();
    if page.has_prev() {
        row.push(button("⬅️ Oldingi", to_callback(page.number - 1)));
    }
    if page.has_next() {
        row.push(button("Keyingi ➡️", to_callback(page.number + 1)));
    }
    row
}

/// Multi-select marker: checked items get ✅, the rest ▫️.
pub fn toggle_label(name: &str, selected: bool) -> String {
    if selected {
        format!("✅ {}", name)
    } else {
        format!("▫️ {}", name)
    }
}
