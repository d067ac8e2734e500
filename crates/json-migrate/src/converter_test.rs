//! Legacy JSON parsing and end-to-end import tests.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use serde_json::json;
    use storage::{CatalogRepository, CatalogStore, IdentityRepository, IdentityStore};

    use crate::converter::{
        backup_file, parse_books, parse_feedback, parse_people, parse_views, read_json,
        LegacyBook, LegacyFeedback, LegacyPart, LegacyPerson, Parsed,
    };
    use crate::{migrate, MigrateConfig};

    #[test]
    fn test_parse_books_accepts_numeric_ids_and_counts_bad_entries() {
        let value = json!({
            "kitoblar": [
                {
                    "id": 1,
                    "nomi": " Kitob ",
                    "qismlar": [
                        {"nomi": "1-qism", "audio_url": "https://t.me/kanal/1"},
                        {"nomi": "", "audio_url": "https://t.me/kanal/2"}
                    ]
                },
                {"id": "2", "nomi": ""},
                {"nomi": "No id"}
            ]
        });

        let parsed = parse_books(&value);

        assert_eq!(parsed.malformed, 2);
        assert_eq!(parsed.items.len(), 1);
        let book = &parsed.items[0];
        assert_eq!(book.id, "1");
        assert_eq!(book.title, "Kitob");
        assert_eq!(book.malformed_parts, 1);
        assert_eq!(
            book.parts,
            vec![LegacyPart {
                title: "1-qism".to_string(),
                audio_url: "https://t.me/kanal/1".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_books_without_list() {
        assert!(parse_books(&json!({})).items.is_empty());
        assert!(parse_books(&json!({"kitoblar": "x"})).items.is_empty());
    }

    #[test]
    fn test_parsed_default_for_records_without_default() {
        let books: Parsed<LegacyBook> = Parsed::default();
        assert!(books.items.is_empty());
        assert_eq!(books.malformed, 0);
        assert_eq!(parse_feedback(&json!({})), Parsed::<LegacyFeedback>::default());
        assert_eq!(parse_people(&json!([])), Parsed::<LegacyPerson>::default());
    }

    #[test]
    fn test_parse_views() {
        let parsed = parse_views(&json!({"Kitob": 12, "Boshqa": "3", "Yomon": "ko'p", "": 1}));
        assert_eq!(parsed.malformed, 2);
        let mut items = parsed.items;
        items.sort();
        assert_eq!(
            items,
            vec![("Boshqa".to_string(), 3), ("Kitob".to_string(), 12)]
        );
    }

    #[test]
    fn test_parse_people_both_layouts() {
        let parsed = parse_people(&json!({
            "8027031316": {"id": 8027031316_i64, "name": "Behruz"},
            "42": "Ali",
            "7": {"name": "Vali"},
            "abc": "bad",
            "-5": "negative"
        }));

        assert_eq!(parsed.malformed, 2);
        let mut items = parsed.items;
        items.sort_by_key(|p| p.id);
        assert_eq!(
            items,
            vec![
                LegacyPerson {
                    id: 7,
                    name: "Vali".to_string()
                },
                LegacyPerson {
                    id: 42,
                    name: "Ali".to_string()
                },
                LegacyPerson {
                    id: 8027031316,
                    name: "Behruz".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_people_truncates_long_names() {
        let long = "a".repeat(300);
        let parsed = parse_people(&json!({ "1": long }));
        assert_eq!(parsed.items[0].name.chars().count(), 255);
    }

    #[test]
    fn test_parse_feedback() {
        let parsed = parse_feedback(&json!([
            {"id": 5, "name": "Ali", "username": "ali", "text": " Zo'r "},
            {"id": "6", "name": "Vali", "username": "", "text": "Yaxshi"},
            {"id": 7, "text": "   "},
            {"text": "no id"}
        ]));

        assert_eq!(parsed.malformed, 2);
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].text, "Zo'r");
        assert_eq!(parsed.items[0].username.as_deref(), Some("ali"));
        assert_eq!(parsed.items[1].user_id, 6);
        assert_eq!(parsed.items[1].username, None);
    }

    #[test]
    fn test_read_json_missing_or_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_json(&dir.path().join("missing.json")).is_none());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert!(read_json(&bad).is_none());
    }

    #[test]
    fn test_backup_file_copies_with_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("users.json");
        fs::write(&source, "{}").unwrap();
        let backups = dir.path().join("backups");

        let dest = backup_file(&source, &backups, "20240101-120000")
            .unwrap()
            .unwrap();

        assert_eq!(dest, backups.join("users.json.20240101-120000.bak"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
        assert!(backup_file(&dir.path().join("none.json"), &backups, "x")
            .unwrap()
            .is_none());
    }

    fn write_fixture(data_dir: &Path) {
        let files = [
            (
                "books.json",
                json!({
                    "kitoblar": [
                        {
                            "id": "1",
                            "nomi": "O'tkan kunlar",
                            "qismlar": [
                                {"nomi": "1-qism", "audio_url": "https://t.me/kanal/1"},
                                {"nomi": "2-qism", "audio_url": "https://t.me/kanal/2"},
                                {"nomi": "2-qism", "audio_url": "https://t.me/kanal/2"}
                            ]
                        },
                        {"id": "2", "nomi": "Mehrobdan chayon", "qismlar": []}
                    ]
                }),
            ),
            ("book_views.json", json!({"O'tkan kunlar": 12})),
            ("users.json", json!({"10": {"id": 10, "name": "Ali"}, "11": "Vali"})),
            ("admins.json", json!({"10": {"id": 10, "name": "Ali"}})),
            (
                "feedback.json",
                json!([
                    {"id": 10, "name": "Ali", "username": "ali", "text": "Rahmat"},
                    {"id": 10, "name": "Ali", "username": "ali", "text": "Rahmat "}
                ]),
            ),
        ];
        for (name, value) in files {
            fs::write(data_dir.join(name), value.to_string()).unwrap();
        }
    }

    fn config(dir: &Path) -> MigrateConfig {
        MigrateConfig {
            database_url: dir.join("app.db").display().to_string(),
            data_dir: dir.to_path_buf(),
            pool: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_migrate_imports_then_skips_on_rerun() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let config = config(dir.path());

        let first = migrate(&config).await.unwrap();
        assert_eq!((first.books.added, first.books.skipped), (2, 0));
        assert_eq!((first.parts.added, first.parts.skipped), (2, 1));
        assert_eq!((first.views.added, first.views.skipped), (1, 0));
        assert_eq!((first.users.added, first.users.skipped), (2, 0));
        assert_eq!((first.admins.added, first.admins.skipped), (1, 0));
        assert_eq!((first.feedback.added, first.feedback.skipped), (1, 1));
        assert_eq!(first.backups.len(), 5);
        assert!(first.backups.iter().all(|p| p.exists()));

        let second = migrate(&config).await.unwrap();
        for (label, counts) in second.entities() {
            assert_eq!(counts.added, 0, "{} imported twice", label);
        }
        assert_eq!(second.books.skipped, 2);
        assert_eq!(second.parts.skipped, 3);

        let catalog = CatalogRepository::new(&config.database_url).await.unwrap();
        let parts = catalog.list_parts("1").await.unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(catalog.list_books().await.unwrap().len(), 2);

        let identity = IdentityRepository::new(&config.database_url).await.unwrap();
        assert_eq!(identity.count_users().await.unwrap(), 2);
        assert!(identity.is_listed_admin(10).await.unwrap());
        let views = identity.list_book_views().await.unwrap();
        assert_eq!(views[0].count, 12);
        assert_eq!(identity.list_recent_feedback(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_migrate_with_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let report = migrate(&config(dir.path())).await.unwrap();
        assert_eq!(report, Default::default());
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn test_report_display() {
        let mut report = crate::MigrateReport::default();
        report.books.add();
        report.books.skip();
        let text = report.to_string();
        assert!(text.contains("books: added 1, skipped 1"));
        assert!(text.contains("feedback: added 0, skipped 0"));
    }
}
