//! Inline keyboards as plain data. Transports translate [`Keyboard`] into their own markup.

use serde::{Deserialize, Serialize};

/// One inline button: a label and the opaque payload sent back when it is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Rows of buttons, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row; empty rows are dropped.
    pub fn row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Appends a single-button row.
    pub fn single(self, button: Button) -> Self {
        self.row(vec![button])
    }

    /// All buttons in reading order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    /// Finds the first button carrying `payload`.
    pub fn find(&self, payload: &str) -> Option<&Button> {
        self.buttons().find(|b| b.payload == payload)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
