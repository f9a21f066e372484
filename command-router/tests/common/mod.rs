//! In-memory collaborators and a wired-up router harness for the dispatch
//! tests.

use async_trait::async_trait;
use business_modules::standard_registry;
use chrono::Utc;
use command_router::{CommandRouter, FallbackMatcher};
use kasibot_core::{
    Booking, BookingFilters, BookingStatus, BookingStore, Business, BusinessDirectory,
    BusinessType, Button, Catalog, Customer, CustomerDirectory, DeliveryError, DeliveryType,
    FaqRule, FaqStore, MessageLog, MessageRecord, MessageSender, OperatingHours, Order,
    OrderError, OrderLine, OrderLineRequest, OrderStore, Product, ProductFilters, ReserveError,
    Service, SlotRequest, StoreError,
};
use session_store::SessionStore;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const BARBER_ADDR: &str = "27815550001";
pub const CARWASH_ADDR: &str = "27815550002";
pub const SPAZA_ADDR: &str = "27815550003";

pub struct MockBusinessDirectory {
    businesses: Vec<Business>,
}

#[async_trait]
impl BusinessDirectory for MockBusinessDirectory {
    async fn find_by_channel_address(
        &self,
        address: &str,
    ) -> Result<Option<Business>, StoreError> {
        Ok(self
            .businesses
            .iter()
            .find(|b| b.channel_address == address)
            .cloned())
    }
}

pub struct MockCustomerDirectory {
    customers: Mutex<Vec<Customer>>,
    next_id: AtomicI64,
}

impl MockCustomerDirectory {
    fn new() -> Self {
        Self {
            customers: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Pre-registers a customer, typically to pin a preferred language.
    pub async fn seed(&self, address: &str, business_id: i64, language: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.customers.lock().await.push(Customer {
            id,
            channel_address: address.to_string(),
            name: "Seeded".to_string(),
            language: language.to_string(),
            business_id,
        });
    }
}

#[async_trait]
impl CustomerDirectory for MockCustomerDirectory {
    async fn get_or_create(
        &self,
        address: &str,
        business_id: i64,
    ) -> Result<Customer, StoreError> {
        let mut customers = self.customers.lock().await;
        if let Some(c) = customers
            .iter()
            .find(|c| c.channel_address == address && c.business_id == business_id)
        {
            return Ok(c.clone());
        }
        let customer = Customer {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            channel_address: address.to_string(),
            name: "Customer".to_string(),
            language: "en".to_string(),
            business_id,
        };
        customers.push(customer.clone());
        Ok(customer)
    }

    async fn list_customers(&self, business_id: i64) -> Result<Vec<Customer>, StoreError> {
        Ok(self
            .customers
            .lock()
            .await
            .iter()
            .filter(|c| c.business_id == business_id)
            .cloned()
            .collect())
    }
}

pub struct MemoryCatalog {
    services: Vec<Service>,
    pub products: Arc<Mutex<Vec<Product>>>,
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_services(&self, business_id: i64) -> Result<Vec<Service>, StoreError> {
        let mut services: Vec<Service> = self
            .services
            .iter()
            .filter(|s| s.business_id == business_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(services)
    }

    async fn list_products(
        &self,
        business_id: i64,
        filters: &ProductFilters,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .filter(|p| p.business_id == business_id)
            .filter(|p| filters.in_stock.map_or(true, |want| p.in_stock() == want))
            .cloned()
            .collect())
    }
}

pub struct MemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn reserve_slot(&self, request: &SlotRequest) -> Result<Booking, ReserveError> {
        let mut bookings = self.bookings.lock().await;
        let taken = bookings.iter().any(|b| {
            b.business_id == request.business_id
                && b.date == request.date
                && b.time == request.time
                && b.status.holds_slot()
        });
        if taken {
            return Err(ReserveError::SlotTaken);
        }
        let booking = Booking {
            id: bookings.len() as i64 + 1,
            business_id: request.business_id,
            customer_id: request.customer_id,
            service_id: request.service_id,
            date: request.date,
            time: request.time,
            status: BookingStatus::Pending,
        };
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn list_bookings(&self, filters: &BookingFilters) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.lock().await;
        Ok(bookings
            .iter()
            .filter(|b| filters.business_id.map_or(true, |id| b.business_id == id))
            .filter(|b| filters.customer_id.map_or(true, |id| b.customer_id == id))
            .filter(|b| filters.date.map_or(true, |d| b.date == d))
            .filter(|b| !filters.active_only || b.status.holds_slot())
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<(), StoreError> {
        let mut bookings = self.bookings.lock().await;
        match bookings.iter_mut().find(|b| b.id == booking_id) {
            Some(b) => {
                b.status = status;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("booking {booking_id}"))),
        }
    }
}

pub struct MemoryOrderStore {
    products: Arc<Mutex<Vec<Product>>>,
    orders: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create_order(
        &self,
        business_id: i64,
        customer_id: i64,
        lines: &[OrderLineRequest],
        delivery: DeliveryType,
        address: Option<&str>,
    ) -> Result<Order, OrderError> {
        let mut products = self.products.lock().await;
        let mut priced = Vec::new();
        for line in lines {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or(OrderError::UnknownProduct(line.product_id))?;
            if product.stock < line.quantity {
                return Err(OrderError::OutOfStock {
                    product: product.name.clone(),
                    available: product.stock,
                });
            }
            priced.push(OrderLine {
                product_id: product.id,
                name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.price,
                line_total: product.price * line.quantity as f64,
            });
        }
        for line in lines {
            if let Some(p) = products.iter_mut().find(|p| p.id == line.product_id) {
                p.stock -= line.quantity;
            }
        }
        let mut orders = self.orders.lock().await;
        let order = Order {
            id: orders.len() as i64 + 1,
            business_id,
            customer_id,
            total: priced.iter().map(|l| l.line_total).sum(),
            lines: priced,
            delivery,
            address: address.map(str::to_string),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        orders.push(order.clone());
        Ok(order)
    }

    async fn list_orders(
        &self,
        business_id: i64,
        customer_id: i64,
    ) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .lock()
            .await
            .iter()
            .filter(|o| o.business_id == business_id && o.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

pub struct MemoryFaqStore {
    pub rules: Vec<FaqRule>,
}

#[async_trait]
impl FaqStore for MemoryFaqStore {
    async fn list_rules(
        &self,
        business_id: i64,
        language: &str,
    ) -> Result<Vec<FaqRule>, StoreError> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.business_id == business_id)
            .filter(|r| r.language == language || r.language == "en")
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryMessageLog {
    pub records: Mutex<Vec<MessageRecord>>,
}

#[async_trait]
impl MessageLog for MemoryMessageLog {
    async fn record(&self, record: &MessageRecord) -> Result<(), StoreError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// One captured outbound message.
#[derive(Debug, Clone)]
pub struct Sent {
    pub to: String,
    pub text: String,
    pub buttons: Vec<Button>,
}

#[derive(Default)]
pub struct CaptureSender {
    pub sent: Mutex<Vec<Sent>>,
    pub fail: AtomicBool,
}

impl CaptureSender {
    pub async fn last(&self) -> Sent {
        self.sent
            .lock()
            .await
            .last()
            .cloned()
            .expect("no message was sent")
    }

    pub async fn texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|s| s.text.clone()).collect()
    }
}

#[async_trait]
impl MessageSender for CaptureSender {
    async fn send_text(&self, to: &str, text: &str) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Failed("simulated outage".to_string()));
        }
        self.sent.lock().await.push(Sent {
            to: to.to_string(),
            text: text.to_string(),
            buttons: Vec::new(),
        });
        Ok(())
    }

    async fn send_buttons(
        &self,
        to: &str,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Failed("simulated outage".to_string()));
        }
        self.sent.lock().await.push(Sent {
            to: to.to_string(),
            text: text.to_string(),
            buttons: buttons.to_vec(),
        });
        Ok(())
    }
}

fn business(id: i64, name: &str, address: &str, business_type: BusinessType) -> Business {
    Business {
        id,
        name: name.to_string(),
        channel_address: address.to_string(),
        business_type,
        language: "en".to_string(),
        operating_hours: OperatingHours::default(),
        ai_enabled: true,
    }
}

fn service(id: i64, business_id: i64, name: &str, price: f64, duration_min: i64) -> Service {
    Service {
        id,
        business_id,
        name: name.to_string(),
        description: None,
        price,
        duration_min: Some(duration_min),
    }
}

fn product(id: i64, business_id: i64, name: &str, price: f64, stock: i64) -> Product {
    Product {
        id,
        business_id,
        name: name.to_string(),
        category: None,
        price,
        stock,
    }
}

pub struct Harness {
    pub router: CommandRouter,
    pub sessions: Arc<SessionStore>,
    pub sender: Arc<CaptureSender>,
    pub customers: Arc<MockCustomerDirectory>,
    pub log: Arc<MemoryMessageLog>,
}

/// Wires the router against in-memory collaborators: one barber, one car
/// wash, and one spaza shop, each with a small catalog.
pub fn harness() -> Harness {
    harness_with_rules(Vec::new())
}

pub fn harness_with_rules(rules: Vec<FaqRule>) -> Harness {
    let businesses = Arc::new(MockBusinessDirectory {
        businesses: vec![
            business(1, "Kasi Cuts", BARBER_ADDR, BusinessType::Barber),
            business(2, "Shine Bros", CARWASH_ADDR, BusinessType::Carwash),
            business(3, "Mama J's Spaza", SPAZA_ADDR, BusinessType::Spaza),
        ],
    });
    let customers = Arc::new(MockCustomerDirectory::new());
    let products = Arc::new(Mutex::new(vec![
        product(1, 3, "Brown Bread", 18.0, 10),
        product(2, 3, "Milk 1L", 22.0, 0),
        product(3, 3, "Eggs (6 pack)", 24.0, 4),
    ]));
    let catalog = Arc::new(MemoryCatalog {
        services: vec![
            service(1, 1, "Fade", 80.0, 30),
            service(2, 1, "Chiskop", 50.0, 20),
            service(3, 2, "Basic Wash", 90.0, 30),
            service(4, 2, "Deluxe Wash", 150.0, 45),
        ],
        products: products.clone(),
    });
    let bookings = Arc::new(MemoryBookingStore {
        bookings: Mutex::new(Vec::new()),
    });
    let orders = Arc::new(MemoryOrderStore {
        products,
        orders: Mutex::new(Vec::new()),
    });
    let faq = Arc::new(MemoryFaqStore { rules });
    let log = Arc::new(MemoryMessageLog::default());
    let sender = Arc::new(CaptureSender::default());
    let sessions = Arc::new(SessionStore::with_default_ttl());

    let registry = Arc::new(standard_registry(catalog, bookings, orders));
    let router = CommandRouter::new(
        businesses,
        customers.clone(),
        sessions.clone(),
        registry,
        FallbackMatcher::new(faq),
        log.clone(),
        sender.clone(),
    );

    Harness {
        router,
        sessions,
        sender,
        customers,
        log,
    }
}
