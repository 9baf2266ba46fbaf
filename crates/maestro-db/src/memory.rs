//! # In-Memory Repositories
//!
//! Vec-backed implementations of the repository traits for handler tests
//! that do not need SQL. They follow the SQLite implementations' observable
//! behaviour: ids are never reused, codes are unique, lists are ordered and
//! paged the same way, and the text search is ASCII-case-insensitive.

use async_trait::async_trait;
use tokio::sync::RwLock;

use maestro_core::{
    Counted, CursorPage, ListFilters, OffsetPage, Product, ProductFields, Seller, SellerFields,
    Warehouse, WarehouseFields, PRODUCT_PAGE_SIZE, SELLER_PAGE_SIZE,
};

use crate::error::{DbError, DbResult};
use crate::repository::query::{assemble_cursor_page, page_offset, Cursor, Direction};
use crate::repository::{product, seller, ProductRepository, SellerRepository, WarehouseRepository};

/// Rows plus the id sequence of one table.
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

// =============================================================================
// Warehouses
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryWarehouseRepository {
    table: RwLock<Table<Warehouse>>,
}

impl MemoryWarehouseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WarehouseRepository for MemoryWarehouseRepository {
    async fn list(&self, _filters: &ListFilters) -> DbResult<Vec<Warehouse>> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Warehouse>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|w| w.id == id).cloned())
    }

    async fn code_taken(&self, code: &str, except_id: Option<i64>) -> DbResult<bool> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .any(|w| w.code == code && Some(w.id) != except_id))
    }

    async fn create(&self, fields: &WarehouseFields) -> DbResult<Warehouse> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|w| w.code == fields.code) {
            return Err(DbError::duplicate("warehouses", "code"));
        }

        let warehouse = Warehouse {
            id: table.next_id(),
            code: fields.code.clone(),
            description: fields.description.clone(),
            address: fields.address.clone(),
            ecommerce: fields.ecommerce,
        };
        table.rows.push(warehouse.clone());
        Ok(warehouse)
    }

    async fn update(&self, id: i64, fields: &WarehouseFields) -> DbResult<Option<Warehouse>> {
        let mut table = self.table.write().await;
        // `UPDATE ... WHERE id = ?` touches nothing, so no constraint can fire.
        if !table.rows.iter().any(|w| w.id == id) {
            return Ok(None);
        }
        if table.rows.iter().any(|w| w.code == fields.code && w.id != id) {
            return Err(DbError::duplicate("warehouses", "code"));
        }

        Ok(table.rows.iter_mut().find(|w| w.id == id).map(|w| {
            w.code = fields.code.clone();
            w.description = fields.description.clone();
            w.address = fields.address.clone();
            w.ecommerce = fields.ecommerce;
            w.clone()
        }))
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|w| w.id != id);
        Ok(table.rows.len() < before)
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    table: RwLock<Table<Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(
        &self,
        filters: &ListFilters,
        cursor: Option<&str>,
    ) -> DbResult<Counted<CursorPage<Product>>> {
        let cursor = cursor.and_then(Cursor::decode);
        let predicate = product::predicate(filters);
        let table = self.table.read().await;

        let mut matching: Vec<Product> = table
            .rows
            .iter()
            .filter(|p| predicate.matches_text(&[p.description.as_str(), p.code.as_str()]))
            .filter(|p| predicate.matches_active(p.active))
            .cloned()
            .collect();
        let total = matching.len() as u64;

        // Rows are stored oldest first; pages are newest first.
        let window: Vec<Product> = match cursor {
            Some(Cursor { id, dir: Direction::Prev }) => {
                matching.retain(|p| p.id > id);
                matching.into_iter().take(PRODUCT_PAGE_SIZE as usize + 1).collect()
            }
            other => {
                if let Some(Cursor { id, .. }) = other {
                    matching.retain(|p| p.id < id);
                }
                matching
                    .into_iter()
                    .rev()
                    .take(PRODUCT_PAGE_SIZE as usize + 1)
                    .collect()
            }
        };

        Ok(Counted {
            paginator: assemble_cursor_page(window, PRODUCT_PAGE_SIZE, cursor, |p| p.id),
            total,
        })
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn code_taken(&self, code: &str, except_id: Option<i64>) -> DbResult<bool> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .any(|p| p.code == code && Some(p.id) != except_id))
    }

    async fn create(&self, fields: &ProductFields) -> DbResult<Product> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|p| p.code == fields.code) {
            return Err(DbError::duplicate("products", "code"));
        }

        let product = Product {
            id: table.next_id(),
            code: fields.code.clone(),
            description: fields.description.clone(),
            net_price: fields.net_price,
            gross_price: fields.gross_price,
            active: fields.active,
        };
        table.rows.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, fields: &ProductFields) -> DbResult<Option<Product>> {
        let mut table = self.table.write().await;
        // `UPDATE ... WHERE id = ?` touches nothing, so no constraint can fire.
        if !table.rows.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        if table.rows.iter().any(|p| p.code == fields.code && p.id != id) {
            return Err(DbError::duplicate("products", "code"));
        }

        Ok(table.rows.iter_mut().find(|p| p.id == id).map(|p| {
            p.code = fields.code.clone();
            p.description = fields.description.clone();
            p.net_price = fields.net_price;
            p.gross_price = fields.gross_price;
            p.active = fields.active;
            p.clone()
        }))
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        Ok(table.rows.len() < before)
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}

// =============================================================================
// Sellers
// =============================================================================

#[derive(Debug, Default)]
pub struct MemorySellerRepository {
    table: RwLock<Table<Seller>>,
}

impl MemorySellerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SellerRepository for MemorySellerRepository {
    async fn list(&self, filters: &ListFilters, page: u32) -> DbResult<OffsetPage<Seller>> {
        let (page, offset) = page_offset(page, SELLER_PAGE_SIZE);
        let predicate = seller::predicate(filters);
        let table = self.table.read().await;

        let matching: Vec<&Seller> = table
            .rows
            .iter()
            .rev()
            .filter(|s| {
                predicate.matches_text(&[
                    s.description.as_str(),
                    s.username.as_str(),
                    s.branch.as_str(),
                ])
            })
            .collect();
        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(offset as usize)
            .take(SELLER_PAGE_SIZE as usize)
            .cloned()
            .collect();

        Ok(OffsetPage::new(data, page, SELLER_PAGE_SIZE, total))
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Seller>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|s| s.id == id).cloned())
    }

    async fn create(&self, fields: &SellerFields) -> DbResult<Seller> {
        let mut table = self.table.write().await;
        let seller = Seller {
            id: table.next_id(),
            description: fields.description.clone(),
            username: fields.username.clone(),
            branch: fields.branch.clone(),
        };
        table.rows.push(seller.clone());
        Ok(seller)
    }

    async fn update(&self, id: i64, fields: &SellerFields) -> DbResult<Option<Seller>> {
        let mut table = self.table.write().await;
        Ok(table.rows.iter_mut().find(|s| s.id == id).map(|s| {
            s.description = fields.description.clone();
            s.username = fields.username.clone();
            s.branch = fields.branch.clone();
            s.clone()
        }))
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|s| s.id != id);
        Ok(table.rows.len() < before)
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
