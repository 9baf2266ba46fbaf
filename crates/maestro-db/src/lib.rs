//! # maestro-db: Database Layer for Maestro
//!
//! This crate provides database access for the Maestro back-office.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Maestro Data Flow                                │
//! │                                                                         │
//! │  Admin handler (store / update / list ...)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     maestro-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (repository/) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Warehouse     │    │ 001_initial  │  │   │
//! │  │   │ WAL, timeouts │    │ Product       │    │  _schema.sql │  │   │
//! │  │   │               │    │ Seller        │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ query.rs: LIKE predicates,    │   │
//! │  │                                │ cursors, offsets              │   │
//! │  │   memory.rs: Vec-backed repositories for tests                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/maestro.db  (or MAESTRO_DB_PATH)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use maestro_db::{Database, DbConfig, ProductRepository};
//! use maestro_core::ListFilters;
//!
//! let db = Database::new(DbConfig::new("maestro.db")).await?;
//! let page = db.products().list(&ListFilters::search("azul"), None).await?;
//! println!("{} of {}", page.paginator.data.len(), page.total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use memory::{MemoryProductRepository, MemorySellerRepository, MemoryWarehouseRepository};
pub use repository::product::SqliteProductRepository;
pub use repository::seller::SqliteSellerRepository;
pub use repository::warehouse::SqliteWarehouseRepository;
pub use repository::{ProductRepository, SellerRepository, WarehouseRepository};
