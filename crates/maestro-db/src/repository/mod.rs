//! # Repository Module
//!
//! One trait per entity, one SQLite implementation of each.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Admin handler                                                         │
//! │       │                                                                 │
//! │       │  state.products.list(&filters, cursor)                         │
//! │       ▼                                                                 │
//! │  dyn ProductRepository                                                 │
//! │  ├── SqliteProductRepository   (server, this module)                   │
//! │  └── MemoryProductRepository   (tests, crate::memory)                  │
//! │       │                                                                 │
//! │       │  query::SearchPredicate → QueryBuilder → SQL                   │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Three list shapes, kept independent:                                  │
//! │  • warehouses  full collection, no server-side filter                  │
//! │  • products    cursor page of 15 + total from a count query            │
//! │  • sellers     offset page of 10 with page numbers                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All traits are object-safe so the server can hold `Arc<dyn ...>`.

use async_trait::async_trait;

use maestro_core::{
    Counted, CursorPage, ListFilters, OffsetPage, Product, ProductFields, Seller, SellerFields,
    Warehouse, WarehouseFields,
};

use crate::error::DbResult;

pub mod product;
pub mod query;
pub mod seller;
pub mod warehouse;

/// Storage for warehouses (bodegas).
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    /// Every warehouse, ordered by id. The search filter is applied by the
    /// client page, not here.
    async fn list(&self, filters: &ListFilters) -> DbResult<Vec<Warehouse>>;

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Warehouse>>;

    /// True if another warehouse already uses `code`.
    async fn code_taken(&self, code: &str, except_id: Option<i64>) -> DbResult<bool>;

    async fn create(&self, fields: &WarehouseFields) -> DbResult<Warehouse>;

    /// `None` when no warehouse has this id.
    async fn update(&self, id: i64, fields: &WarehouseFields) -> DbResult<Option<Warehouse>>;

    /// True if a row was removed.
    async fn delete(&self, id: i64) -> DbResult<bool>;

    async fn count(&self) -> DbResult<i64>;
}

/// Storage for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Newest-first cursor page matching `filters`, with the overall match count.
    ///
    /// An unreadable cursor yields the first page.
    async fn list(
        &self,
        filters: &ListFilters,
        cursor: Option<&str>,
    ) -> DbResult<Counted<CursorPage<Product>>>;

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>>;

    /// True if another product already uses `code`.
    async fn code_taken(&self, code: &str, except_id: Option<i64>) -> DbResult<bool>;

    async fn create(&self, fields: &ProductFields) -> DbResult<Product>;

    /// `None` when no product has this id.
    async fn update(&self, id: i64, fields: &ProductFields) -> DbResult<Option<Product>>;

    /// True if a row was removed.
    async fn delete(&self, id: i64) -> DbResult<bool>;

    async fn count(&self) -> DbResult<i64>;
}

/// Storage for sellers (vendedores).
#[async_trait]
pub trait SellerRepository: Send + Sync {
    /// Newest-first offset page (`page` is 1-based; 0 is read as 1).
    async fn list(&self, filters: &ListFilters, page: u32) -> DbResult<OffsetPage<Seller>>;

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Seller>>;

    async fn create(&self, fields: &SellerFields) -> DbResult<Seller>;

    /// `None` when no seller has this id.
    async fn update(&self, id: i64, fields: &SellerFields) -> DbResult<Option<Seller>>;

    /// True if a row was removed.
    async fn delete(&self, id: i64) -> DbResult<bool>;

    async fn count(&self) -> DbResult<i64>;
}
