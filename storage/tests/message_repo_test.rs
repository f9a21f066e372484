//! Integration tests for [`storage::MessageRepo`]: recording both
//! directions and reading the recent log back newest-first.

use chrono::{Duration, Utc};
use kasibot_core::{Direction, MessageLog, MessageRecord};
use storage::Database;
use tempfile::TempDir;

async fn test_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("test.db");
    let db = Database::connect(path.to_str().expect("non-utf8 temp path"))
        .await
        .expect("Failed to open database");
    (dir, db)
}

fn record(id: &str, direction: Direction, body: &str, age_secs: i64) -> MessageRecord {
    MessageRecord {
        id: id.to_string(),
        business_id: 1,
        customer_id: 100,
        direction,
        body: body.to_string(),
        created_at: Utc::now() - Duration::seconds(age_secs),
    }
}

/// **Test: recent returns the newest messages first, up to the limit.**
///
/// **Setup:** Three messages for business 1 at distinct timestamps, one for
/// business 2.
/// **Action:** `record` each, then `recent(1, 2)`.
/// **Expected:** The two newest business-1 messages, newest first, with
/// direction and body intact.
#[tokio::test]
async fn test_record_and_recent_newest_first() {
    let (_dir, db) = test_db().await;
    let repo = db.messages();

    repo.record(&record("m1", Direction::Incoming, "hi", 30))
        .await
        .unwrap();
    repo.record(&record("m2", Direction::Outgoing, "Hello! Welcome.", 20))
        .await
        .unwrap();
    repo.record(&record("m3", Direction::Incoming, "services", 10))
        .await
        .unwrap();
    let mut other = record("m4", Direction::Incoming, "menu", 5);
    other.business_id = 2;
    repo.record(&other).await.unwrap();

    let recent = repo.recent(1, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, "m3");
    assert_eq!(recent[0].direction, Direction::Incoming);
    assert_eq!(recent[1].id, "m2");
    assert_eq!(recent[1].body, "Hello! Welcome.");
}
