//! Row models for the catalog and identity tables.

mod book;
mod feedback;
mod genre;
mod identity;
mod part;

pub use book::{Book, BookView};
pub use feedback::FeedbackRecord;
pub use genre::Genre;
pub use identity::{AdminRecord, UserRecord};
pub use part::{part_label, Part};
