//! Integration tests for [`storage::OrderRepo`] and [`storage::CustomerRepo`].

use kasibot_core::{
    Catalog, CustomerDirectory, DeliveryType, OrderError, OrderLineRequest, OrderStore, Product,
    ProductFilters,
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

fn product(business_id: i64, name: &str, price: f64, stock: i64) -> Product {
    Product {
        id: 0,
        business_id,
        name: name.to_string(),
        category: None,
        price,
        stock,
    }
}

/// **Test: creating an order prices its lines and decrements stock.**
///
/// **Setup:** Bread (stock 10, R18) and eggs (stock 4, R24).
/// **Action:** Order 2 bread + 1 eggs.
/// **Expected:** Total R60; remaining stock 8 and 3.
#[tokio::test]
async fn test_create_order_decrements_stock() {
    let (_dir, db) = test_db().await;
    let catalog = db.catalog();
    let bread = catalog.add_product(&product(3, "Brown Bread", 18.0, 10)).await.unwrap();
    let eggs = catalog.add_product(&product(3, "Eggs (6 pack)", 24.0, 4)).await.unwrap();

    let order = db
        .orders()
        .create_order(
            3,
            7,
            &[
                OrderLineRequest { product_id: bread, quantity: 2 },
                OrderLineRequest { product_id: eggs, quantity: 1 },
            ],
            DeliveryType::Pickup,
            None,
        )
        .await
        .unwrap();

    assert_eq!(order.total, 60.0);
    assert_eq!(order.lines.len(), 2);

    let products = catalog.list_products(3, &ProductFilters::default()).await.unwrap();
    let stock_of = |name: &str| products.iter().find(|p| p.name == name).unwrap().stock;
    assert_eq!(stock_of("Brown Bread"), 8);
    assert_eq!(stock_of("Eggs (6 pack)"), 3);
}

/// **Test: an out-of-stock line fails the whole order and rolls back.**
///
/// **Setup:** Bread (stock 10) and milk (stock 0).
/// **Action:** Order 1 bread + 1 milk in one request.
/// **Expected:** OutOfStock error naming milk; bread stock still 10; no
/// order rows exist.
#[tokio::test]
async fn test_out_of_stock_rolls_back_order() {
    let (_dir, db) = test_db().await;
    let catalog = db.catalog();
    let bread = catalog.add_product(&product(3, "Brown Bread", 18.0, 10)).await.unwrap();
    let milk = catalog.add_product(&product(3, "Milk 1L", 22.0, 0)).await.unwrap();

    let result = db
        .orders()
        .create_order(
            3,
            7,
            &[
                OrderLineRequest { product_id: bread, quantity: 1 },
                OrderLineRequest { product_id: milk, quantity: 1 },
            ],
            DeliveryType::Delivery,
            Some("12 Vilakazi St"),
        )
        .await;

    match result {
        Err(OrderError::OutOfStock { product, available }) => {
            assert_eq!(product, "Milk 1L");
            assert_eq!(available, 0);
        }
        other => panic!("expected OutOfStock, got {other:?}"),
    }

    let products = catalog.list_products(3, &ProductFilters::default()).await.unwrap();
    assert_eq!(products.iter().find(|p| p.name == "Brown Bread").unwrap().stock, 10);
    assert!(db.orders().list_orders(3, 7).await.unwrap().is_empty());
}

/// **Test: get_or_create returns the same customer on repeat contact.**
#[tokio::test]
async fn test_customer_created_once() {
    let (_dir, db) = test_db().await;
    let customers = db.customers();

    let first = customers.get_or_create("27829990001", 3).await.unwrap();
    let second = customers.get_or_create("27829990001", 3).await.unwrap();
    let other_shop = customers.get_or_create("27829990001", 4).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_ne!(first.id, other_shop.id);
    assert_eq!(customers.list_customers(3).await.unwrap().len(), 1);
}

/// **Test: a stored language preference survives and is updatable.**
#[tokio::test]
async fn test_customer_language_update() {
    let (_dir, db) = test_db().await;
    let customers = db.customers();

    let customer = customers.get_or_create("27829990002", 3).await.unwrap();
    customers.set_language(customer.id, "xh").await.unwrap();

    let reloaded = customers.get_or_create("27829990002", 3).await.unwrap();
    assert_eq!(reloaded.language, "xh");
}
