//! Screens shared by the router and the flows: text plus keyboard, no I/O.

use abot_core::Keyboard;
use storage::{part_label, Book, BookView, FeedbackRecord, Genre, Part};
use teloxide::utils::html::escape;

use crate::callback::Callback;
use crate::menus::{button, page_row, paginate, single_column, two_column, BOOKS_PER_PAGE};

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Screen {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// Text with a single button back to `parent`.
    pub fn with_back(text: impl Into<String>, label: &str, parent: Callback) -> Self {
        Self::new(text, Keyboard::new().single(button(label, parent)))
    }
}

pub fn home_button() -> abot_core::Button {
    button("🏠 Asosiy menyu", Callback::Home)
}

pub fn admin_home_button() -> abot_core::Button {
    button("🏠 Asosiy menyu", Callback::AdminPanel)
}

/// Label of the button returning to `parent`.
fn parent_label(parent: &Callback) -> &'static str {
    match parent {
        Callback::Home => "🏠 Asosiy menyu",
        Callback::AdminPanel => "🛠️ Admin panel",
        _ => "🔙 Ortga",
    }
}

pub fn home(first_name: &str, is_admin: bool, channel: Option<&str>) -> Screen {
    let mut text = format!(
        "<b>🖐Assalomu alaykum, {}</b>!\n\n📖 Bu bot orqali audiokitoblarimizni qulay tarzda tinglashingiz mumkin.\n\n",
        escape(first_name)
    );
    if let Some(channel) = channel {
        text.push_str(&format!("🔈<b>Sahifamiz:</b> @{}\n\n\n", escape(channel)));
    }
    text.push_str("👇🏻 Quyidagi menyulardan birini tanlang:");

    let mut keyboard = Keyboard::new()
        .single(button("📚 Kitoblar", Callback::Books))
        .single(button("🏷 Janrlar", Callback::Genres))
        .single(button("📊 Statistika", Callback::Stats))
        .single(button("💬 Fikr bildirish", Callback::Feedback))
        .single(button("👤 Admin bilan bog‘lanish", Callback::AdminContact));
    if is_admin {
        keyboard = keyboard.single(button("🛠️ Admin panel", Callback::AdminPanel));
    }
    Screen::new(text, keyboard)
}

pub fn admin_panel() -> Screen {
    let keyboard = Keyboard::new()
        .single(button("📥 Yangi kitob qo‘shish", Callback::AdminAddBook))
        .single(button("➕ Yangi qism qo‘shish", Callback::AdminAddPart))
        .single(button("🗑️ Kitobni o‘chirish", Callback::AdminDeleteBook))
        .single(button("🗑 Kitobni qismini o‘chirish", Callback::AdminDeletePart))
        .single(button("✏️ Kitob nomini tahrirlash", Callback::AdminRenameBook))
        .single(button("🏷 Janr belgilash", Callback::AdminAssignGenres))
        .single(button("🏷 Janrlarni boshqarish", Callback::AdminManageGenres))
        .single(button("📬 Xabar yuborish", Callback::AdminBroadcast))
        .single(button("💬 Oxirgi 10 ta fikr", Callback::AdminViewFeedback))
        .single(button("🧹 Fikrlarni tozalash", Callback::AdminDedupeFeedback))
        .single(button("👤 Adminlarni boshqarish", Callback::AdminManageAdmins))
        .single(home_button());
    Screen::new(
        "🛠️ <b>Admin panel</b>\n\nQuyidagi bo‘limlardan birini tanlang:",
        keyboard,
    )
}

pub fn no_access() -> Screen {
    Screen::with_back(
        "⛔ Sizda bu bo‘limga kirish huquqi yo‘q.",
        parent_label(&Callback::Home),
        Callback::Home,
    )
}

pub fn not_found(parent: Callback) -> Screen {
    Screen::with_back("❌ Topilmadi.", parent_label(&parent), parent)
}

pub fn failure(parent: Callback) -> Screen {
    Screen::with_back(
        "⚠️ Xatolik yuz berdi. Keyinroq qayta urinib ko‘ring.",
        parent_label(&parent),
        parent,
    )
}

/// A flow button pressed after its flow already ended.
pub fn stale(parent: Callback) -> Screen {
    Screen::with_back(
        "⌛ Bu amal eskirgan. Qaytadan boshlang.",
        parent_label(&parent),
        parent,
    )
}

pub fn command_hint() -> Screen {
    Screen::new("ℹ️ Botdan foydalanish uchun /start buyrug‘ini yuboring.", Keyboard::new())
}

/// Re-prompt for a state that waits for a button press.
pub fn use_buttons() -> Screen {
    Screen::new("👆 Iltimos, tugmalardan birini tanlang.", Keyboard::new())
}

pub fn contact(admin_username: Option<&str>) -> Screen {
    let text = match admin_username {
        Some(name) => format!("👤 Murojaat uchun: @{}\n", escape(name)),
        None => "👤 Murojaat uchun admin hali ko‘rsatilmagan.\n".to_string(),
    };
    Screen::new(text, Keyboard::new().single(home_button()))
}

pub fn books_page(books: &[Book], page: usize) -> Screen {
    if books.is_empty() {
        return Screen::with_back(
            "📚 Hozircha kitoblar mavjud emas.",
            "🏠 Asosiy sahifa",
            Callback::Home,
        );
    }
    let page = paginate(books, page, BOOKS_PER_PAGE);
    let items = page
        .items
        .iter()
        .map(|b| button(b.title.clone(), Callback::Book(b.id.clone())))
        .collect();
    let mut keyboard = two_column(items, page_row(&page, Callback::BooksPage));
    keyboard = keyboard.row(vec![
        button("🔙 Ortga", Callback::Home),
        button("🏠 Asosiy sahifa", Callback::Home),
    ]);
    Screen::new("📚 Mavjud kitoblar ro'yxati:", keyboard)
}

pub fn book_parts(book: &Book, parts: &[Part]) -> Screen {
    let nav = vec![
        button("🔙 Ortga", Callback::Books),
        button("🏠 Asosiy sahifa", Callback::Home),
    ];
    if parts.is_empty() {
        return Screen::new(
            "ℹ️ Bu kitob uchun hozircha qismlar yuklanmagan.\nYaqinda qo‘shiladi.",
            Keyboard::new().row(nav),
        );
    }
    let items = (0..parts.len())
        .map(|i| {
            button(
                part_label(i + 1),
                Callback::Part {
                    book_id: book.id.clone(),
                    index: i,
                },
            )
        })
        .collect();
    Screen::new(
        format!("📖 <b>{}</b>\n\n🎧 Qismlar ro‘yxati:", escape(&book.title)),
        two_column(items, nav),
    )
}

pub fn part_missing(book_id: &str) -> Screen {
    Screen::with_back(
        "❌ Qism topilmadi yoki hali qo‘shilmagan.",
        "🔙 Ortga",
        Callback::Book(book_id.to_string()),
    )
}

/// Sent when the audio itself could not be delivered.
pub fn part_link(label: &str, url: &str) -> String {
    format!("🎧 {}\n{}", escape(label), escape(url))
}

pub fn part_followup(book_id: &str) -> Screen {
    Screen::new(
        "⬆️ Yana boshqa qismlarni tanlashingiz mumkin:",
        Keyboard::new().row(vec![
            button("🔙 Qismlar", Callback::Book(book_id.to_string())),
            button("🏠 Asosiy sahifa", Callback::Home),
        ]),
    )
}

pub fn genres(genres: &[Genre]) -> Screen {
    let nav = vec![button("🏠 Asosiy sahifa", Callback::Home)];
    if genres.is_empty() {
        return Screen::new("🏷 Hali janrlar qo‘shilmagan.", Keyboard::new().row(nav));
    }
    let items = genres
        .iter()
        .map(|g| button(g.name.clone(), Callback::Genre(g.id)))
        .collect();
    Screen::new("🏷 Janrlar ro‘yxati:", two_column(items, nav))
}

pub fn genre_books(books: &[Book]) -> Screen {
    let nav = vec![
        button("🔙 Ortga (janrlar)", Callback::Genres),
        button("🏠 Asosiy sahifa", Callback::Home),
    ];
    if books.is_empty() {
        return Screen::new(
            "ℹ️ Bu janrda hozircha kitob yo‘q.",
            Keyboard::new().row(nav),
        );
    }
    let items = books
        .iter()
        .map(|b| button(b.title.clone(), Callback::Book(b.id.clone())))
        .collect();
    Screen::new("📚 Tanlangan janrdagi kitoblar:", two_column(items, nav))
}

pub fn stats_menu() -> Screen {
    Screen::new(
        "📊 Statistika menyusi:",
        Keyboard::new()
            .single(button("👥 Foydalanuvchilar soni", Callback::StatUsers))
            .single(button("📖 Kitoblar statistikasi", Callback::StatBooks))
            .single(home_button()),
    )
}

pub fn user_count(count: i64) -> Screen {
    Screen::with_back(
        format!("👥 Botdan foydalanuvchilar soni: <b>{}</b> ta", count),
        "🔙 Ortga",
        Callback::Stats,
    )
}

/// Counters whose title matches a current book, in the order given (count descending).
pub fn book_stats(views: &[BookView], books: &[Book]) -> Screen {
    let rows: Vec<&BookView> = views
        .iter()
        .filter(|v| books.iter().any(|b| b.title == v.book_name))
        .collect();
    let text = if rows.is_empty() {
        "📚 Hali statistik ma’lumot yo‘q yoki mavjud kitoblarga tegishli emas.\n\nℹ️ Statistika kitob qismlar ro‘yxatini ochganingizda yangilanadi.".to_string()
    } else {
        let mut text = "📖 Kitoblar bo‘yicha statistika:\n\n".to_string();
        for v in rows {
            text.push_str(&format!(
                "• <b>{}</b>: {} marta ochilgan\n",
                escape(&v.book_name),
                v.count
            ));
        }
        text
    };
    Screen::with_back(text, "🔙 Ortga", Callback::Stats)
}

pub fn recent_feedback(entries: &[FeedbackRecord]) -> Screen {
    let text = if entries.is_empty() {
        "ℹ️ Hozircha hech qanday fikr bildirilmagan.".to_string()
    } else {
        let mut text = "💬 So‘nggi 10 ta foydalanuvchi fikri:\n\n".to_string();
        for f in entries {
            let username = match f.username.as_deref() {
                Some(u) if !u.is_empty() => format!("@{}", escape(u)),
                _ => "username: yo‘q".to_string(),
            };
            text.push_str(&format!(
                "<b>{}</b> ({}):\n{}\n\n",
                escape(&f.name),
                username,
                escape(&f.text)
            ));
        }
        text
    };
    Screen::with_back(text, "🔙 Ortga", Callback::AdminPanel)
}

pub fn dedupe_done(removed: u64) -> Screen {
    Screen::with_back(
        format!("🧹 Takroriy fikrlar tozalandi. O‘chirildi: <b>{}</b> ta", removed),
        "🔙 Ortga",
        Callback::AdminPanel,
    )
}

pub fn genre_menu() -> Screen {
    Screen::new(
        "🏷 <b>Janrlarni boshqarish</b>",
        Keyboard::new()
            .single(button("➕ Janr qo‘shish", Callback::AdminAddGenre))
            .single(button("🗑 Janrni o‘chirish", Callback::AdminDeleteGenre))
            .single(button("🔙 Ortga", Callback::AdminPanel)),
    )
}

pub fn admins_menu() -> Screen {
    Screen::new(
        "👤 Adminlarni boshqarish menyusi:",
        Keyboard::new()
            .single(button("➕ Admin qo‘shish", Callback::AdminAddAdmin))
            .single(button("➖ Adminni o‘chirish", Callback::AdminDeleteAdmin))
            .single(button("🔙 Ortga", Callback::AdminPanel)),
    )
}

/// Book picker used by the admin flows: one book per row, back to the admin panel.
pub fn book_picker(text: &str, books: &[Book], to_callback: impl Fn(String) -> Callback) -> Screen {
    let items = books
        .iter()
        .map(|b| button(b.title.clone(), to_callback(b.id.clone())))
        .collect();
    Screen::new(
        text,
        single_column(items, vec![button("🔙 Ortga", Callback::AdminPanel)]),
    )
}

pub fn no_books_admin() -> Screen {
    Screen::new(
        "📚 Hech qanday kitob mavjud emas.",
        Keyboard::new().single(admin_home_button()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_home_admin_button_only_for_admins() {
        let user = home("Ali", false, None);
        assert!(user.keyboard.find("admin_panel").is_none());
        assert!(!user.text.contains("Sahifamiz"));
        let admin = home("Ali", true, Some("kanal"));
        assert!(admin.keyboard.find("admin_panel").is_some());
        assert!(admin.text.contains("@kanal"));
    }

    #[test]
    fn test_home_escapes_name() {
        let screen = home("<Ali>", false, None);
        assert!(screen.text.contains("&lt;Ali&gt;"));
    }

    #[test]
    fn test_book_parts_labels() {
        let b = book("1", "Test");
        let parts = vec![
            Part {
                id: 10,
                book_id: "1".into(),
                title: "1-qism".into(),
                audio_url: "https://t.me/k/1".into(),
            },
            Part {
                id: 12,
                book_id: "1".into(),
                title: "2-qism".into(),
                audio_url: "https://t.me/k/2".into(),
            },
        ];
        let screen = book_parts(&b, &parts);
        assert_eq!(screen.keyboard.find("part_1_0").unwrap().label, "1-qism");
        assert_eq!(screen.keyboard.find("part_1_1").unwrap().label, "2-qism");
        assert!(screen.keyboard.find("books").is_some());
    }

    #[test]
    fn test_book_stats_only_existing_titles() {
        let views = vec![
            BookView {
                book_name: "Old".into(),
                count: 9,
            },
            BookView {
                book_name: "Test".into(),
                count: 3,
            },
        ];
        let screen = book_stats(&views, &[book("1", "Test")]);
        assert!(screen.text.contains("<b>Test</b>: 3 marta"));
        assert!(!screen.text.contains("Old"));

        let empty = book_stats(&views, &[]);
        assert!(empty.text.starts_with("📚 Hali statistik"));
    }

    #[test]
    fn test_books_page_has_pagination() {
        let books: Vec<Book> = (1..=25).map(|i| book(&i.to_string(), "B")).collect();
        let first = books_page(&books, 0);
        assert!(first.keyboard.find("books_page_1").is_some());
        assert!(first.keyboard.find("book_21").is_none());
        let second = books_page(&books, 1);
        assert!(second.keyboard.find("book_21").is_some());
        assert!(second.keyboard.find("books_page_0").is_some());
    }
}
