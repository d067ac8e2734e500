//! Unit tests for CatalogRepository.
//!
//! Covers book ordering, next_book_id, genre lookups and title lookups.

use crate::catalog_repo::CatalogRepository;
use crate::repository::CatalogStore;

async fn repo() -> CatalogRepository {
    CatalogRepository::new("sqlite::memory:")
        .await
        .expect("Failed to create repository")
}

#[tokio::test]
async fn test_list_books_numeric_then_lexicographic() {
    let repo = repo().await;
    for (id, title) in [("10", "Ten"), ("2", "Two"), ("b", "Bee"), ("1", "One"), ("a7", "A7")] {
        repo.create_book(id, title).await.expect("create");
    }

    let ids: Vec<String> = repo
        .list_books()
        .await
        .expect("list")
        .into_iter()
        .map(|b| b.id)
        .collect();

    assert_eq!(ids, vec!["1", "2", "10", "a7", "b"]);
}

#[tokio::test]
async fn test_next_book_id_ignores_non_numeric() {
    let repo = repo().await;
    assert_eq!(repo.next_book_id().await.unwrap(), "1");

    repo.create_book("9", "Nine").await.unwrap();
    repo.create_book("x100", "Not numeric").await.unwrap();
    repo.create_book("3", "Three").await.unwrap();

    assert_eq!(repo.next_book_id().await.unwrap(), "10");
}

#[tokio::test]
async fn test_get_book_by_title() {
    let repo = repo().await;
    repo.create_book("1", "Alpomish").await.unwrap();

    let found = repo.get_book_by_title("Alpomish").await.unwrap();
    assert_eq!(found.map(|b| b.id), Some("1".to_string()));
    assert!(repo.get_book_by_title("Missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rename_book() {
    let repo = repo().await;
    repo.create_book("1", "Old").await.unwrap();

    assert!(repo.rename_book("1", "New").await.unwrap());
    assert_eq!(repo.get_book("1").await.unwrap().unwrap().title, "New");
    assert!(!repo.rename_book("404", "Nobody").await.unwrap());
}

#[tokio::test]
async fn test_genres_sorted_and_books_for_genre() {
    let repo = repo().await;
    repo.add_genre("Roman").await.unwrap();
    repo.add_genre("Detektiv").await.unwrap();
    let names: Vec<String> = repo
        .list_genres()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Detektiv", "Roman"]);

    let roman = repo.list_genres().await.unwrap()[1].id;
    repo.create_book("12", "Twelve").await.unwrap();
    repo.create_book("3", "Three").await.unwrap();
    repo.create_book("5", "Five").await.unwrap();
    repo.set_book_genres("12", &[roman]).await.unwrap();
    repo.set_book_genres("3", &[roman]).await.unwrap();

    let ids: Vec<String> = repo
        .books_for_genre(roman)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec!["3", "12"]);
}

#[tokio::test]
async fn test_set_book_genres_skips_unknown_ids() {
    let repo = repo().await;
    repo.create_book("1", "Book").await.unwrap();
    repo.add_genre("Roman").await.unwrap();
    let roman = repo.list_genres().await.unwrap()[0].id;

    repo.set_book_genres("1", &[roman, 9999])
        .await
        .expect("unknown genre id must not fail");

    let genres = repo.genres_for_book("1").await.unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].id, roman);
}

#[tokio::test]
async fn test_delete_part_by_ordinal_out_of_range() {
    let repo = repo().await;
    repo.create_book("1", "Book").await.unwrap();
    repo.add_part("1", "1-qism", "https://t.me/ch/1").await.unwrap();

    assert!(!repo.delete_part_by_ordinal("1", 0).await.unwrap());
    assert!(!repo.delete_part_by_ordinal("1", 2).await.unwrap());
    assert_eq!(repo.list_parts("1").await.unwrap().len(), 1);
}
