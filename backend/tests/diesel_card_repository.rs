//! Integration tests for `DieselCardRepository` against a SQLite file.

use ticket_validator::domain::CardId;
use ticket_validator::domain::ports::{CardInsertOutcome, CardRepository};

mod support;

use support::TestDatabase;

fn card_id(raw: &str) -> CardId {
    CardId::new(raw).expect("fixture card id")
}

fn ids(cards: &[ticket_validator::domain::Card]) -> Vec<String> {
    cards.iter().map(|card| card.id().to_string()).collect()
}

#[tokio::test]
async fn insert_reports_duplicates_without_failing() {
    let db = TestDatabase::new().await;
    let repo = db.cards();

    let first = repo.insert(&card_id("ABCD1234")).await.expect("first insert");
    let second = repo.insert(&card_id("ABCD1234")).await.expect("second insert");

    assert_eq!(first, CardInsertOutcome::Inserted);
    assert_eq!(second, CardInsertOutcome::AlreadyExists);
    assert_eq!(ids(&repo.list().await.expect("list")), ["ABCD1234"]);
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let db = TestDatabase::new().await;
    let repo = db.cards();
    for raw in ["CCCC0003", "AAAA0001", "BBBB0002"] {
        repo.insert(&card_id(raw)).await.expect("insert");
    }

    assert_eq!(
        ids(&repo.list().await.expect("list")),
        ["AAAA0001", "BBBB0002", "CCCC0003"]
    );
}

#[tokio::test]
async fn remove_reports_whether_a_row_went_away() {
    let db = TestDatabase::new().await;
    let repo = db.cards();
    repo.insert(&card_id("ABCD1234")).await.expect("insert");

    assert!(repo.remove(&card_id("ABCD1234")).await.expect("remove"));
    assert!(!repo.remove(&card_id("ABCD1234")).await.expect("remove again"));
    assert!(repo.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn rerunning_migrations_keeps_cards() {
    let db = TestDatabase::new().await;
    db.cards().insert(&card_id("ABCD1234")).await.expect("insert");

    let again = db.pool.run_migrations().await.expect("rerun migrations");
    assert!(again.is_empty());
    assert_eq!(ids(&db.cards().list().await.expect("list")), ["ABCD1234"]);
}
