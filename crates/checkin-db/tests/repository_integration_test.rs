//! Live-database integration tests for the repository layer.
//!
//! These require a running PostgreSQL instance (see
//! `test_fixtures::DEFAULT_TEST_DATABASE_URL`) and are ignored by default.
//! Run with `cargo test -- --ignored` once the test database is up.

use chrono::NaiveDate;
use checkin_db::test_fixtures::TestDatabase;
use checkin_db::{
    CheckinRepository, CheckinSource, CreateCheckinRequest, ImportStore, ImportTransaction,
    ListCheckinsRequest, TagRepository,
};
use uuid::Uuid;

fn sample_request(user_id: Uuid) -> CreateCheckinRequest {
    CreateCheckinRequest {
        user_id,
        checked_in_at: NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap(),
        note: "morning run".to_string(),
        link: String::new(),
        source: CheckinSource::Web,
        tags: Some(vec!["running".to_string(), "health".to_string()]),
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn insert_and_fetch_round_trip() {
    let test_db = TestDatabase::new().await;
    let user_id = Uuid::new_v4();

    let id = test_db
        .db
        .checkins
        .insert(sample_request(user_id))
        .await
        .unwrap();
    let fetched = test_db.db.checkins.fetch(id).await.unwrap();

    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.note, "morning run");
    assert_eq!(fetched.source, CheckinSource::Web);
    assert_eq!(fetched.tags, vec!["health", "running"]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn list_is_newest_first_and_counts_total() {
    let test_db = TestDatabase::new().await;
    let user_id = Uuid::new_v4();

    for day in 1..=3 {
        let mut req = sample_request(user_id);
        req.checked_in_at = NaiveDate::from_ymd_opt(2024, 2, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        req.tags = None;
        test_db.db.checkins.insert(req).await.unwrap();
    }

    let page = test_db
        .db
        .checkins
        .list(ListCheckinsRequest {
            user_id,
            limit: Some(2),
            offset: None,
        })
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.checkins.len(), 2);
    assert!(page.checkins[0].checked_in_at > page.checkins[1].checked_in_at);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn tag_ensure_is_idempotent() {
    let test_db = TestDatabase::new().await;

    test_db.db.tags.ensure("repeat").await.unwrap();
    test_db.db.tags.ensure("repeat").await.unwrap();

    let tags = test_db.db.tags.list().await.unwrap();
    let count = tags.iter().filter(|t| t.name == "repeat").count();
    assert_eq!(count, 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn import_transaction_rollback_discards_rows() {
    let test_db = TestDatabase::new().await;
    let user_id = Uuid::new_v4();

    let mut tx = test_db.db.import.begin().await.unwrap();
    let mut req = sample_request(user_id);
    req.tags = None;
    let id = tx.insert_checkin(req).await.unwrap();
    tx.ensure_tag("rolled-back").await.unwrap();
    tx.set_checkin_tags(id, &["rolled-back".to_string()])
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert!(test_db.db.checkins.fetch(id).await.is_err());
    let tags = test_db.db.tags.list().await.unwrap();
    assert!(tags.iter().all(|t| t.name != "rolled-back"));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn import_transaction_commit_persists_rows() {
    let test_db = TestDatabase::new().await;
    let user_id = Uuid::new_v4();

    let mut tx = test_db.db.import.begin().await.unwrap();
    let mut req = sample_request(user_id);
    req.tags = None;
    req.source = CheckinSource::Csv;
    let id = tx.insert_checkin(req).await.unwrap();
    tx.ensure_tag("committed").await.unwrap();
    tx.set_checkin_tags(id, &["committed".to_string()])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let fetched = test_db.db.checkins.fetch(id).await.unwrap();
    assert_eq!(fetched.source, CheckinSource::Csv);
    assert_eq!(fetched.tags, vec!["committed"]);

    test_db.cleanup().await;
}
