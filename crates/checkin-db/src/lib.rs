//! # checkin-db
//!
//! PostgreSQL database layer for checkinlog.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for check-ins and tags
//! - The transactional import store used by the CSV bulk-import pipeline
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkin_db::Database;
//! use checkin_core::ListCheckinsRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/checkinlog").await?;
//!
//!     let page = db.checkins.list(ListCheckinsRequest {
//!         user_id: uuid::Uuid::new_v4(),
//!         limit: Some(20),
//!         offset: None,
//!     }).await?;
//!
//!     println!("{} check-ins", page.total);
//!     Ok(())
//! }
//! ```

pub mod checkins;
pub mod import_store;
pub mod pool;
pub mod tags;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use checkin_core::*;

// Re-export repository implementations
pub use checkins::PgCheckinRepository;
pub use import_store::{PgImportStore, PgImportTx};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, run_migrations, PoolConfig};
pub use tags::{validate_tag_name, PgTagRepository};

use sqlx::PgPool;

/// Bundle of repositories over one shared connection pool.
pub struct Database {
    pub pool: PgPool,
    pub checkins: PgCheckinRepository,
    pub tags: PgTagRepository,
    pub import: PgImportStore,
}

impl Database {
    /// Connect to PostgreSQL with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Build a Database over an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            checkins: PgCheckinRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            import: PgImportStore::new(pool.clone()),
            pool,
        }
    }
}
