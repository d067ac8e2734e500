//! Button payload codec. Every inline button carries one of these as a short string;
//! parsing is total and never panics, malformed payloads become [`PayloadError`].

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("unknown payload: {0}")]
    Unknown(String),
    #[error("bad id in payload: {0}")]
    BadId(String),
}

/// Decoded button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    // Public menus
    Home,
    Books,
    BooksPage(usize),
    Book(String),
    Part { book_id: String, index: usize },
    Genres,
    Genre(i64),
    Stats,
    StatUsers,
    StatBooks,
    AdminContact,
    Feedback,
    CancelFeedback,

    // Admin panel
    AdminPanel,
    AdminListBooks,
    AdminViewFeedback,
    AdminDedupeFeedback,

    // Add book
    AdminAddBook,
    ToggleGenre(i64),
    GenresDone,
    FinishAddBook,
    CancelAddBook,

    // Add part
    AdminAddPart,
    AddPartBook(String),
    CancelAddPart,

    // Delete part
    AdminDeletePart,
    DelPartBook(String),
    DelPart(usize),
    ConfirmDeletePart,

    // Delete book
    AdminDeleteBook,
    DeleteBook(String),
    ConfirmDeleteBook,

    // Rename book
    AdminRenameBook,
    RenameBook(String),

    // Assign genres
    AdminAssignGenres,
    AssignGenresBook(String),
    ToggleBookGenre(i64),
    SaveBookGenres,

    // Manage genres
    AdminManageGenres,
    AdminAddGenre,
    AdminDeleteGenre,
    DelGenre(i64),
    ConfirmDeleteGenre,

    // Manage admins
    AdminManageAdmins,
    AdminAddAdmin,
    AdminDeleteAdmin,
    RemoveAdmin(i64),
    ConfirmRemoveAdmin,

    // Broadcast
    AdminBroadcast,
    ConfirmBroadcast,
    CancelBroadcast,
}

impl Callback {
    /// Whether pressing this button needs admin rights.
    pub fn requires_admin(&self) -> bool {
        !matches!(
            self,
            Callback::Home
                | Callback::Books
                | Callback::BooksPage(_)
                | Callback::Book(_)
                | Callback::Part { .. }
                | Callback::Genres
                | Callback::Genre(_)
                | Callback::Stats
                | Callback::StatUsers
                | Callback::StatBooks
                | Callback::AdminContact
                | Callback::Feedback
                | Callback::CancelFeedback
        )
    }
}

fn parse_i64(raw: &str, id: &str) -> Result<i64, PayloadError> {
    id.parse().map_err(|_| PayloadError::BadId(raw.to_string()))
}

fn parse_usize(raw: &str, id: &str) -> Result<usize, PayloadError> {
    id.parse().map_err(|_| PayloadError::BadId(raw.to_string()))
}

fn non_empty(raw: &str, id: &str) -> Result<String, PayloadError> {
    if id.is_empty() {
        Err(PayloadError::BadId(raw.to_string()))
    } else {
        Ok(id.to_string())
    }
}

impl FromStr for Callback {
    type Err = PayloadError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let exact = match raw {
            "home" => Some(Callback::Home),
            "books" => Some(Callback::Books),
            "genres" => Some(Callback::Genres),
            "stats" => Some(Callback::Stats),
            "stat_users" => Some(Callback::StatUsers),
            "stat_books" => Some(Callback::StatBooks),
            "admin_contact" => Some(Callback::AdminContact),
            "feedback" => Some(Callback::Feedback),
            "cancel_feedback" => Some(Callback::CancelFeedback),
            "admin_panel" => Some(Callback::AdminPanel),
            "admin_list_books" => Some(Callback::AdminListBooks),
            "admin_view_feedback" => Some(Callback::AdminViewFeedback),
            "admin_dedupe_feedback" => Some(Callback::AdminDedupeFeedback),
            "admin_add_book" => Some(Callback::AdminAddBook),
            "genres_done" => Some(Callback::GenresDone),
            "finish_add_book" => Some(Callback::FinishAddBook),
            "cancel_add_book" => Some(Callback::CancelAddBook),
            "admin_add_part" => Some(Callback::AdminAddPart),
            "cancel_add_part" => Some(Callback::CancelAddPart),
            "admin_delete_part" => Some(Callback::AdminDeletePart),
            "confirm_delete_part" => Some(Callback::ConfirmDeletePart),
            "admin_delete_book" => Some(Callback::AdminDeleteBook),
            "confirm_delete_book" => Some(Callback::ConfirmDeleteBook),
            "admin_rename_book" => Some(Callback::AdminRenameBook),
            "admin_assign_genres" => Some(Callback::AdminAssignGenres),
            "save_book_genres" => Some(Callback::SaveBookGenres),
            "admin_manage_genres" => Some(Callback::AdminManageGenres),
            "admin_add_genre" => Some(Callback::AdminAddGenre),
            "admin_delete_genre" => Some(Callback::AdminDeleteGenre),
            "confirm_delete_genre" => Some(Callback::ConfirmDeleteGenre),
            "admin_manage_admins" => Some(Callback::AdminManageAdmins),
            "admin_add_admin" => Some(Callback::AdminAddAdmin),
            "admin_delete_admin" => Some(Callback::AdminDeleteAdmin),
            "confirm_remove_admin" => Some(Callback::ConfirmRemoveAdmin),
            "admin_broadcast" => Some(Callback::AdminBroadcast),
            "confirm_broadcast" => Some(Callback::ConfirmBroadcast),
            "cancel_broadcast" => Some(Callback::CancelBroadcast),
            _ => None,
        };
        if let Some(cb) = exact {
            return Ok(cb);
        }

        // Longer prefixes before the shorter ones they start with.
        if let Some(id) = raw.strip_prefix("books_page_") {
            return parse_usize(raw, id).map(Callback::BooksPage);
        }
        if let Some(id) = raw.strip_prefix("book_") {
            return non_empty(raw, id).map(Callback::Book);
        }
        if let Some(rest) = raw.strip_prefix("part_") {
            let (book_id, index) = rest
                .rsplit_once('_')
                .ok_or_else(|| PayloadError::BadId(raw.to_string()))?;
            return Ok(Callback::Part {
                book_id: non_empty(raw, book_id)?,
                index: parse_usize(raw, index)?,
            });
        }
        if let Some(id) = raw.strip_prefix("genre_") {
            return parse_i64(raw, id).map(Callback::Genre);
        }
        if let Some(id) = raw.strip_prefix("toggle_book_genre_") {
            return parse_i64(raw, id).map(Callback::ToggleBookGenre);
        }
        if let Some(id) = raw.strip_prefix("toggle_genre_") {
            return parse_i64(raw, id).map(Callback::ToggleGenre);
        }
        if let Some(id) = raw.strip_prefix("addpart_") {
            return non_empty(raw, id).map(Callback::AddPartBook);
        }
        if let Some(id) = raw.strip_prefix("delpartbook_") {
            return non_empty(raw, id).map(Callback::DelPartBook);
        }
        if let Some(id) = raw.strip_prefix("delpart_") {
            return parse_usize(raw, id).map(Callback::DelPart);
        }
        if let Some(id) = raw.strip_prefix("deletebook_") {
            return non_empty(raw, id).map(Callback::DeleteBook);
        }
        if let Some(id) = raw.strip_prefix("renamebook_") {
            return non_empty(raw, id).map(Callback::RenameBook);
        }
        if let Some(id) = raw.strip_prefix("assigngenres_") {
            return non_empty(raw, id).map(Callback::AssignGenresBook);
        }
        if let Some(id) = raw.strip_prefix("delgenre_") {
            return parse_i64(raw, id).map(Callback::DelGenre);
        }
        if let Some(id) = raw.strip_prefix("remove_admin_") {
            return parse_i64(raw, id).map(Callback::RemoveAdmin);
        }

        Err(PayloadError::Unknown(raw.to_string()))
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Home => f.write_str("home"),
            Callback::Books => f.write_str("books"),
            Callback::BooksPage(page) => write!(f, "books_page_{}", page),
            Callback::Book(id) => write!(f, "book_{}", id),
            Callback::Part { book_id, index } => write!(f, "part_{}_{}", book_id, index),
            Callback::Genres => f.write_str("genres"),
            Callback::Genre(id) => write!(f, "genre_{}", id),
            Callback::Stats => f.write_str("stats"),
            Callback::StatUsers => f.write_str("stat_users"),
            Callback::StatBooks => f.write_str("stat_books"),
            Callback::AdminContact => f.write_str("admin_contact"),
            Callback::Feedback => f.write_str("feedback"),
            Callback::CancelFeedback => f.write_str("cancel_feedback"),
            Callback::AdminPanel => f.write_str("admin_panel"),
            Callback::AdminListBooks => f.write_str("admin_list_books"),
            Callback::AdminViewFeedback => f.write_str("admin_view_feedback"),
            Callback::AdminDedupeFeedback => f.write_str("admin_dedupe_feedback"),
            Callback::AdminAddBook => f.write_str("admin_add_book"),
            Callback::ToggleGenre(id) => write!(f, "toggle_genre_{}", id),
            Callback::GenresDone => f.write_str("genres_done"),
            Callback::FinishAddBook => f.write_str("finish_add_book"),
            Callback::CancelAddBook => f.write_str("cancel_add_book"),
            Callback::AdminAddPart => f.write_str("admin_add_part"),
            Callback::AddPartBook(id) => write!(f, "addpart_{}", id),
            Callback::CancelAddPart => f.write_str("cancel_add_part"),
            Callback::AdminDeletePart => f.write_str("admin_delete_part"),
            Callback::DelPartBook(id) => write!(f, "delpartbook_{}", id),
            Callback::DelPart(index) => write!(f, "delpart_{}", index),
            Callback::ConfirmDeletePart => f.write_str("confirm_delete_part"),
            Callback::AdminDeleteBook => f.write_str("admin_delete_book"),
            Callback::DeleteBook(id) => write!(f, "deletebook_{}", id),
            Callback::ConfirmDeleteBook => f.write_str("confirm_delete_book"),
            Callback::AdminRenameBook => f.write_str("admin_rename_book"),
            Callback::RenameBook(id) => write!(f, "renamebook_{}", id),
            Callback::AdminAssignGenres => f.write_str("admin_assign_genres"),
            Callback::AssignGenresBook(id) => write!(f, "assigngenres_{}", id),
            Callback::ToggleBookGenre(id) => write!(f, "toggle_book_genre_{}", id),
            Callback::SaveBookGenres => f.write_str("save_book_genres"),
            Callback::AdminManageGenres => f.write_str("admin_manage_genres"),
            Callback::AdminAddGenre => f.write_str("admin_add_genre"),
            Callback::AdminDeleteGenre => f.write_str("admin_delete_genre"),
            Callback::DelGenre(id) => write!(f, "delgenre_{}", id),
            Callback::ConfirmDeleteGenre => f.write_str("confirm_delete_genre"),
            Callback::AdminManageAdmins => f.write_str("admin_manage_admins"),
            Callback::AdminAddAdmin => f.write_str("admin_add_admin"),
            Callback::AdminDeleteAdmin => f.write_str("admin_delete_admin"),
            Callback::RemoveAdmin(id) => write!(f, "remove_admin_{}", id),
            Callback::ConfirmRemoveAdmin => f.write_str("confirm_remove_admin"),
            Callback::AdminBroadcast => f.write_str("admin_broadcast"),
            Callback::ConfirmBroadcast => f.write_str("confirm_broadcast"),
            Callback::CancelBroadcast => f.write_str("cancel_broadcast"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Callback, PayloadError> {
        s.parse()
    }

    #[test]
    fn test_parse_prefixed_payloads() {
        assert_eq!(parse("book_12"), Ok(Callback::Book("12".into())));
        assert_eq!(parse("books_page_2"), Ok(Callback::BooksPage(2)));
        assert_eq!(
            parse("part_12_0"),
            Ok(Callback::Part {
                book_id: "12".into(),
                index: 0
            })
        );
        assert_eq!(
            parse("part_old_id_3"),
            Ok(Callback::Part {
                book_id: "old_id".into(),
                index: 3
            })
        );
        assert_eq!(parse("toggle_genre_4"), Ok(Callback::ToggleGenre(4)));
        assert_eq!(parse("toggle_book_genre_4"), Ok(Callback::ToggleBookGenre(4)));
        assert_eq!(parse("delpartbook_9"), Ok(Callback::DelPartBook("9".into())));
        assert_eq!(parse("delpart_1"), Ok(Callback::DelPart(1)));
        assert_eq!(parse("remove_admin_555"), Ok(Callback::RemoveAdmin(555)));
    }

    #[test]
    fn test_malformed_payloads_are_errors() {
        assert!(matches!(parse("book_"), Err(PayloadError::BadId(_))));
        assert!(matches!(parse("genre_x"), Err(PayloadError::BadId(_))));
        assert!(matches!(parse("part_12"), Err(PayloadError::BadId(_))));
        assert!(matches!(parse("part_12_x"), Err(PayloadError::BadId(_))));
        assert!(matches!(parse("delpart_-1"), Err(PayloadError::BadId(_))));
        assert!(matches!(parse("nonsense"), Err(PayloadError::Unknown(_))));
        assert!(matches!(parse(""), Err(PayloadError::Unknown(_))));
    }

    #[test]
    fn test_display_matches_parse() {
        for cb in [
            Callback::Home,
            Callback::BooksPage(3),
            Callback::Part {
                book_id: "7".into(),
                index: 2,
            },
            Callback::ToggleBookGenre(1),
            Callback::ConfirmRemoveAdmin,
        ] {
            assert_eq!(parse(&cb.to_string()), Ok(cb));
        }
    }

    #[test]
    fn test_requires_admin() {
        assert!(!Callback::Books.requires_admin());
        assert!(!Callback::AdminContact.requires_admin());
        assert!(!Callback::CancelFeedback.requires_admin());
        assert!(Callback::AdminPanel.requires_admin());
        assert!(Callback::ToggleGenre(1).requires_admin());
        assert!(Callback::ConfirmBroadcast.requires_admin());
    }
}
