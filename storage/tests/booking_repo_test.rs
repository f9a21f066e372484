//! Integration tests for [`storage::BookingRepo`].
//!
//! Covers atomic slot reservation (including the concurrent race), status
//! updates freeing slots, and filtered listing, against a temp-file SQLite
//! database.

use chrono::{NaiveDate, NaiveTime};
use kasibot_core::{
    BookingFilters, BookingStatus, BookingStore, ReserveError, SlotRequest,
};
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

fn request(customer_id: i64, time: NaiveTime) -> SlotRequest {
    SlotRequest {
        business_id: 1,
        customer_id,
        service_id: 10,
        date: NaiveDate::from_ymd_opt(2026, 9, 7).unwrap(),
        time,
    }
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// **Test: reserving a free slot creates a pending booking.**
///
/// **Setup:** Empty database.
/// **Action:** `reserve_slot` for 10:00.
/// **Expected:** Booking returned with a generated id and pending status.
#[tokio::test]
async fn test_reserve_free_slot() {
    let (_dir, db) = test_db().await;
    let repo = db.bookings();

    let booking = repo.reserve_slot(&request(100, hm(10, 0))).await.unwrap();

    assert!(booking.id > 0);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.time, hm(10, 0));
}

/// **Test: a second reservation of the same slot is a slot-taken error.**
#[tokio::test]
async fn test_reserve_taken_slot_conflicts() {
    let (_dir, db) = test_db().await;
    let repo = db.bookings();

    repo.reserve_slot(&request(100, hm(10, 0))).await.unwrap();
    let second = repo.reserve_slot(&request(200, hm(10, 0))).await;

    assert!(matches!(second, Err(ReserveError::SlotTaken)));
}

/// **Test: two concurrent reservations of one slot yield exactly one booking.**
///
/// **Setup:** Empty database; two reservation futures for the same slot.
/// **Action:** Run them concurrently.
/// **Expected:** One `Ok`, one `SlotTaken`; a single row exists afterwards.
#[tokio::test]
async fn test_concurrent_reserve_single_winner() {
    let (_dir, db) = test_db().await;
    let repo = db.bookings();

    let req_a = request(100, hm(11, 0));
    let req_b = request(200, hm(11, 0));
    let (a, b) = tokio::join!(repo.reserve_slot(&req_a), repo.reserve_slot(&req_b));

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(
        matches!(a, Err(ReserveError::SlotTaken)) || matches!(b, Err(ReserveError::SlotTaken))
    );

    let rows = repo
        .list_bookings(&BookingFilters {
            business_id: Some(1),
            active_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

/// **Test: cancelling a booking frees its slot for re-reservation.**
#[tokio::test]
async fn test_cancelled_slot_can_be_reclaimed() {
    let (_dir, db) = test_db().await;
    let repo = db.bookings();

    let booking = repo.reserve_slot(&request(100, hm(12, 0))).await.unwrap();
    repo.update_status(booking.id, BookingStatus::Cancelled)
        .await
        .unwrap();

    let reclaimed = repo.reserve_slot(&request(200, hm(12, 0))).await.unwrap();
    assert_ne!(reclaimed.id, booking.id);
}

/// **Test: listing filters by customer and by active-only.**
#[tokio::test]
async fn test_list_bookings_filters() {
    let (_dir, db) = test_db().await;
    let repo = db.bookings();

    repo.reserve_slot(&request(100, hm(9, 0))).await.unwrap();
    let cancelled = repo.reserve_slot(&request(100, hm(9, 30))).await.unwrap();
    repo.update_status(cancelled.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    repo.reserve_slot(&request(200, hm(10, 0))).await.unwrap();

    let all_for_100 = repo
        .list_bookings(&BookingFilters {
            business_id: Some(1),
            customer_id: Some(100),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all_for_100.len(), 2);

    let active_for_100 = repo
        .list_bookings(&BookingFilters {
            business_id: Some(1),
            customer_id: Some(100),
            active_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(active_for_100.len(), 1);
    assert_eq!(active_for_100[0].time, hm(9, 0));
}

/// **Test: updating an unknown booking id reports not-found.**
#[tokio::test]
async fn test_update_status_unknown_id() {
    let (_dir, db) = test_db().await;
    let repo = db.bookings();

    let result = repo.update_status(999, BookingStatus::Confirmed).await;
    assert!(result.is_err());
}
