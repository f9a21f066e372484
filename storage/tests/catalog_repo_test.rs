//! Integration tests for [`storage::CatalogRepo`] service rows: insertion
//! and the price-ascending listing order.

use kasibot_core::{Catalog, Service};
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

fn service(business_id: i64, name: &str, price: f64, duration_min: Option<i64>) -> Service {
    Service {
        id: 0,
        business_id,
        name: name.to_string(),
        description: None,
        price,
        duration_min,
    }
}

/// **Test: services list back cheapest-first, scoped to their business.**
///
/// **Setup:** Two services for business 1 inserted dearest-first, one for
/// business 2.
/// **Action:** `add_service` for each, then `list_services(1)`.
/// **Expected:** Business 1's services in price-ascending order with their
/// stored durations; business 2's service absent.
#[tokio::test]
async fn test_add_and_list_services_price_ascending() {
    let (_dir, db) = test_db().await;
    let repo = db.catalog();

    repo.add_service(&service(1, "Fade", 80.0, Some(45)))
        .await
        .unwrap();
    repo.add_service(&service(1, "Chiskop", 50.0, Some(20)))
        .await
        .unwrap();
    repo.add_service(&service(2, "Deluxe Wash", 120.0, None))
        .await
        .unwrap();

    let services = repo.list_services(1).await.unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0].name, "Chiskop");
    assert_eq!(services[0].duration_min, Some(20));
    assert_eq!(services[1].name, "Fade");
    assert_eq!(services[1].price, 80.0);
}
