//! Storage crate: SQLite-backed implementations of the collaborator traits.
//!
//! ## Modules
//!
//! - [`sqlite_pool`] – SqlitePoolManager
//! - [`schema`] – table creation
//! - [`business_repo`] / [`customer_repo`] / [`catalog_repo`] – directories
//!   and catalog
//! - [`booking_repo`] – atomic slot reservation
//! - [`order_repo`] – transactional order creation
//! - [`faq_repo`] / [`message_repo`] – fallback rules and the message log

mod booking_repo;
mod business_repo;
mod catalog_repo;
mod convert;
mod customer_repo;
mod faq_repo;
mod message_repo;
mod order_repo;
mod schema;
mod sqlite_pool;

pub use booking_repo::BookingRepo;
pub use business_repo::BusinessRepo;
pub use catalog_repo::CatalogRepo;
pub use customer_repo::CustomerRepo;
pub use faq_repo::FaqRepo;
pub use message_repo::MessageRepo;
pub use order_repo::OrderRepo;
pub use schema::init_schema;
pub use sqlite_pool::SqlitePoolManager;

/// One open database with every repository hanging off the shared pool.
#[derive(Clone)]
pub struct Database {
    pool_manager: SqlitePoolManager,
}

impl Database {
    /// Opens (creating if missing) the database and runs schema init.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        schema::init_schema(pool_manager.pool()).await?;
        Ok(Self { pool_manager })
    }

    pub fn businesses(&self) -> BusinessRepo {
        BusinessRepo::new(self.pool_manager.clone())
    }

    pub fn customers(&self) -> CustomerRepo {
        CustomerRepo::new(self.pool_manager.clone())
    }

    pub fn catalog(&self) -> CatalogRepo {
        CatalogRepo::new(self.pool_manager.clone())
    }

    pub fn bookings(&self) -> BookingRepo {
        BookingRepo::new(self.pool_manager.clone())
    }

    pub fn orders(&self) -> OrderRepo {
        OrderRepo::new(self.pool_manager.clone())
    }

    pub fn faq(&self) -> FaqRepo {
        FaqRepo::new(self.pool_manager.clone())
    }

    pub fn messages(&self) -> MessageRepo {
        MessageRepo::new(self.pool_manager.clone())
    }
}
