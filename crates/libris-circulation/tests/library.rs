//! Catalogue and membership administration through the facade.

mod common;

use libris_circulation::{ErrorBody, LibraryConfig};
use libris_core::{BookUpdate, CoreError, ErrorKind, MemberUpdate, NewBook, NewMember};

use common::{library, library_with};

#[tokio::test]
async fn test_create_book_starts_fully_available() {
    let t = library().await;

    let book = t
        .library
        .create_book(&NewBook::new("  The Master and Margarita ", "Mikhail Bulgakov", 4))
        .await
        .unwrap();

    assert_eq!(book.title, "The Master and Margarita");
    assert_eq!(book.copies, 4);
    assert_eq!(book.available, 4);
}

#[tokio::test]
async fn test_create_book_rejects_blank_title() {
    let t = library().await;

    let err = t
        .library
        .create_book(&NewBook::new("", "Nobody", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(t.library.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_book_without_copies_gets_one() {
    let t = library().await;

    for copies in [0, -4] {
        let book = t
            .library
            .create_book(&NewBook::new("Blank Pages", "Nobody", copies))
            .await
            .unwrap();
        assert_eq!(book.copies, 1);
        assert_eq!(book.available, 1);
    }

    assert_eq!(t.library.list_books().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_matches_title_or_author() {
    let t = library().await;
    t.library
        .create_book(&NewBook::new("Pedro Páramo", "Juan Rulfo", 1))
        .await
        .unwrap();
    t.library
        .create_book(&NewBook::new("Ficciones", "Jorge Luis Borges", 2))
        .await
        .unwrap();
    t.library
        .create_book(&NewBook::new("El Aleph", "Jorge Luis Borges", 1))
        .await
        .unwrap();

    let borges = t.library.search_books("borges").await.unwrap();
    assert_eq!(borges.len(), 2);

    let aleph = t.library.search_books("  Aleph ").await.unwrap();
    assert_eq!(aleph.len(), 1);

    assert_eq!(t.library.search_books("").await.unwrap().len(), 3);
    assert!(t.library.search_books("100%").await.unwrap().is_empty());

    let err = t.library.search_books(&"x".repeat(101)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_book_clamps_availability() {
    let t = library().await;
    let book = t.book("Kokoro", 3).await;
    let a = t.member("Sensei").await;
    t.library.issue_book(book.id, a.id, 7).await.unwrap();

    let update = BookUpdate {
        title: "Kokoro".into(),
        author: "Natsume Sōseki".into(),
        copies: 2,
        available: 5,
    };
    let updated = t.library.update_book(book.id, &update).await.unwrap();

    assert_eq!(updated.author, "Natsume Sōseki");
    assert_eq!(updated.copies, 2);
    assert_eq!(updated.available, 2);

    let err = t.library.update_book(777, &update).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(CoreError::BookNotFound(777))));
}

#[tokio::test]
async fn test_book_on_loan_cannot_be_deleted() {
    let t = library().await;
    let book = t.book("Chronicle of a Death Foretold", 1).await;
    let member = t.member("Santiago").await;

    let issue_id = t.library.issue_book(book.id, member.id, 7).await.unwrap();

    let err = t.library.delete_book(book.id).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(CoreError::BookHasActiveIssues { .. })));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    t.library.return_book(issue_id).await.unwrap();
    t.library.delete_book(book.id).await.unwrap();

    let err = t.library.get_book(book.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = t.library.delete_book(book.id).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(CoreError::BookNotFound(_))));

    // Returned history went with the book.
    assert!(t.library.issues_by_member(member.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_member_lifecycle() {
    let t = library().await;

    let member = t
        .library
        .create_member(
            &NewMember::new("Aureliano Buendía")
                .with_email("aureliano@macondo.example")
                .with_roll_no("M-100"),
        )
        .await
        .unwrap();
    assert_eq!(member.email.as_deref(), Some("aureliano@macondo.example"));

    let fetched = t.library.get_member(member.id).await.unwrap();
    assert_eq!(fetched, member);

    let update: MemberUpdate =
        NewMember::new("Colonel Aureliano Buendía").with_email("colonel@macondo.example");
    let renamed = t.library.update_member(member.id, &update).await.unwrap();
    assert_eq!(renamed.name, "Colonel Aureliano Buendía");
    assert_eq!(renamed.roll_no, None);

    assert_eq!(t.library.list_members().await.unwrap().len(), 1);

    t.library.delete_member(member.id).await.unwrap();
    let err = t.library.get_member(member.id).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(CoreError::MemberNotFound(_))));
}

#[tokio::test]
async fn test_member_rejects_malformed_email() {
    let t = library().await;

    let err = t
        .library
        .create_member(&NewMember::new("Remedios").with_email("not-an-address"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_member_holding_a_book_cannot_be_deleted() {
    let t = library().await;
    let book = t.book("One Hundred Years of Solitude", 2).await;
    let member = t.member("Úrsula").await;

    let issue_id = t.library.issue_book(book.id, member.id, 7).await.unwrap();

    let err = t.library.delete_member(member.id).await.unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(CoreError::MemberHasActiveIssues { member_id }) if *member_id == member.id
    ));
    assert_eq!(t.available(book.id).await, 1);

    t.library.return_book(issue_id).await.unwrap();
    t.library.delete_member(member.id).await.unwrap();
    assert_eq!(t.available(book.id).await, 2);

    let err = t.library.delete_member(member.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_error_body_for_transport() {
    let t = library().await;

    let err = t.library.get_book(12).await.unwrap_err();
    let body: ErrorBody = err.to_body();
    let json = serde_json::to_value(&body).unwrap();

    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Book not found: 12");
}

#[tokio::test]
async fn test_invalid_config_is_refused_before_opening() {
    let mut config = LibraryConfig::in_memory();
    config.database.max_connections = 0;

    let result = libris_circulation::Library::open(&config).await;
    assert!(result.is_err());

    let mut config = LibraryConfig::in_memory();
    config.circulation.fine_per_day_cents = 0;
    let t = library_with(config).await;
    assert!(t.library.engine().settings().fine_per_day.is_zero());
}
