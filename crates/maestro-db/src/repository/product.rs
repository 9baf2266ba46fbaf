//! # Product Repository
//!
//! Database operations for products.
//!
//! ## List Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /productos?search=azul&status=1&cursor=...                         │
//! │       │                                                                 │
//! │       ├──► SELECT COUNT(*) FROM products <predicate>        → total     │
//! │       │                                                                 │
//! │       └──► SELECT ... FROM products <predicate>                         │
//! │              AND id < :boundary       (next / first page)              │
//! │              ORDER BY id DESC LIMIT 16                                 │
//! │            or                                                           │
//! │              AND id > :boundary       (prev)                           │
//! │              ORDER BY id ASC  LIMIT 16, then reversed                  │
//! │                                                                         │
//! │  The 16th row only tells whether another page exists.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use maestro_core::{
    Counted, CursorPage, ListFilters, Money, Product, ProductFields, PRODUCT_PAGE_SIZE,
};

use super::query::{assemble_cursor_page, Cursor, Direction, SearchPredicate};
use super::ProductRepository;
use crate::error::DbResult;

const COLUMNS: &str = "id, code, description, net_price_cents, gross_price_cents, active";

/// Columns searched by the list filter.
pub const SEARCH_COLUMNS: &[&str] = &["description", "code"];

/// A `products` row as stored: prices in integer hundredths.
#[derive(Debug, Clone, FromRow)]
struct ProductRow {
    id: i64,
    code: String,
    description: String,
    net_price_cents: i64,
    gross_price_cents: i64,
    active: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            code: row.code,
            description: row.description,
            net_price: Money::from_cents(row.net_price_cents),
            gross_price: Money::from_cents(row.gross_price_cents),
            active: row.active,
        }
    }
}

/// Builds the predicate for a product list request.
pub fn predicate(filters: &ListFilters) -> SearchPredicate {
    SearchPredicate::new(SEARCH_COLUMNS)
        .search(filters.search.as_deref())
        .active(filters.status.map(|s| s.is_active()))
}

/// SQLite-backed [`ProductRepository`].
#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteProductRepository { pool }
    }

    async fn count_matching(&self, predicate: &SearchPredicate) -> DbResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        predicate.push_to(&mut qb);

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn fetch_window(
        &self,
        predicate: &SearchPredicate,
        cursor: Option<Cursor>,
        limit: i64,
    ) -> DbResult<Vec<Product>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM products"));
        let mut conditions = predicate.push_to(&mut qb);

        let ascending = match cursor {
            Some(Cursor { id, dir: Direction::Next }) => {
                conditions.and(&mut qb);
                qb.push("id < ").push_bind(id);
                false
            }
            Some(Cursor { id, dir: Direction::Prev }) => {
                conditions.and(&mut qb);
                qb.push("id > ").push_bind(id);
                true
            }
            None => false,
        };

        qb.push(if ascending {
            " ORDER BY id ASC"
        } else {
            " ORDER BY id DESC"
        });
        qb.push(" LIMIT ").push_bind(limit);

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn list(
        &self,
        filters: &ListFilters,
        cursor: Option<&str>,
    ) -> DbResult<Counted<CursorPage<Product>>> {
        let cursor = cursor.and_then(|raw| {
            let decoded = Cursor::decode(raw);
            if decoded.is_none() {
                debug!(cursor = %raw, "Ignoring unreadable cursor");
            }
            decoded
        });

        debug!(
            search = ?filters.search,
            status = ?filters.status,
            cursor = ?cursor,
            "Listing products"
        );

        let predicate = predicate(filters);
        let total = self.count_matching(&predicate).await?;
        let rows = self
            .fetch_window(&predicate, cursor, i64::from(PRODUCT_PAGE_SIZE) + 1)
            .await?;

        let paginator = assemble_cursor_page(rows, PRODUCT_PAGE_SIZE, cursor, |p| p.id);
        debug!(total, returned = paginator.data.len(), "Listed products");

        Ok(Counted {
            paginator,
            total: total.max(0) as u64,
        })
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn code_taken(&self, code: &str, except_id: Option<i64>) -> DbResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM products WHERE code = ?1 AND (?2 IS NULL OR id <> ?2))",
        )
        .bind(code)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn create(&self, fields: &ProductFields) -> DbResult<Product> {
        debug!(code = %fields.code, "Inserting product");

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (code, description, net_price_cents, gross_price_cents, active) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {COLUMNS}"
        ))
        .bind(&fields.code)
        .bind(&fields.description)
        .bind(fields.net_price.cents())
        .bind(fields.gross_price.cents())
        .bind(fields.active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, fields: &ProductFields) -> DbResult<Option<Product>> {
        debug!(id, code = %fields.code, "Updating product");

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET code = ?2, description = ?3, net_price_cents = ?4, \
             gross_price_cents = ?5, active = ?6 WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.code)
        .bind(&fields.description)
        .bind(fields.net_price.cents())
        .bind(fields.gross_price.cents())
        .bind(fields.active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all products (for diagnostics).
    async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use maestro_core::StatusFilter;

    async fn repo() -> SqliteProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    fn fields(code: &str, description: &str, active: bool) -> ProductFields {
        ProductFields {
            code: code.to_string(),
            description: description.to_string(),
            net_price: Money::from_units(1000),
            gross_price: Money::from_units(1190),
            active,
        }
    }

    #[tokio::test]
    async fn test_create_round_trips_prices() {
        let repo = repo().await;
        let created = repo.create(&fields("SKU1", "Widget Azul", true)).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.gross_price.cents(), 119_000);
        assert_eq!(fetched.net_price.to_string(), "1000.00");
        assert!(fetched.active);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let repo = repo().await;
        repo.create(&fields("SKU1", "Widget Azul", true)).await.unwrap();
        repo.create(&fields("SKU2", "Tornillo", true)).await.unwrap();

        for term in ["widget", "AZUL", "sku1"] {
            let page = repo.list(&ListFilters::search(term), None).await.unwrap();
            assert_eq!(page.total, 1, "term {term}");
            assert_eq!(page.paginator.data[0].code, "SKU1");
        }
    }

    #[tokio::test]
    async fn test_like_wildcards_match_literally() {
        let repo = repo().await;
        repo.create(&fields("P1", "50% off", true)).await.unwrap();
        repo.create(&fields("P2", "500 units", true)).await.unwrap();
        repo.create(&fields("A_B", "guion", true)).await.unwrap();
        repo.create(&fields("AXB", "equis", true)).await.unwrap();

        let percent = repo.list(&ListFilters::search("0%"), None).await.unwrap();
        assert_eq!(percent.total, 1);
        let underscore = repo.list(&ListFilters::search("a_b"), None).await.unwrap();
        assert_eq!(underscore.total, 1);
        assert_eq!(underscore.paginator.data[0].code, "A_B");
    }

    #[tokio::test]
    async fn test_status_filter_scenario() {
        let repo = repo().await;
        repo.create(&fields("SKU1", "Widget", true)).await.unwrap();

        let inactive = ListFilters::from_query(None, Some("0"));
        assert_eq!(repo.list(&inactive, None).await.unwrap().total, 0);

        let active = ListFilters::from_query(None, Some("1"));
        let page = repo.list(&active, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.paginator.data[0].code, "SKU1");
        assert_eq!(active.status, Some(StatusFilter::Active));
    }

    #[tokio::test]
    async fn test_total_independent_of_page_size() {
        let repo = repo().await;
        for i in 0..20 {
            let description = if i % 2 == 0 { "Widget par" } else { "Tuerca" };
            repo.create(&fields(&format!("SKU{i:02}"), description, true))
                .await
                .unwrap();
        }

        let all = repo.list(&ListFilters::default(), None).await.unwrap();
        assert_eq!(all.total, 20);
        assert_eq!(all.paginator.data.len(), PRODUCT_PAGE_SIZE as usize);
        assert_eq!(all.paginator.per_page, 15);

        let widgets = repo.list(&ListFilters::search("widget"), None).await.unwrap();
        assert_eq!(widgets.total, 10);
        assert_eq!(widgets.paginator.data.len(), 10);
        assert!(widgets.paginator.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_cursor_walks_forward_and_back() {
        let repo = repo().await;
        let mut ids = Vec::new();
        for i in 0..20 {
            ids.push(repo.create(&fields(&format!("SKU{i:02}"), "Item", true)).await.unwrap().id);
        }
        ids.reverse(); // newest first

        let first = repo.list(&ListFilters::default(), None).await.unwrap().paginator;
        assert_eq!(first.data.iter().map(|p| p.id).collect::<Vec<_>>(), ids[..15]);
        assert!(first.prev_cursor.is_none());

        let second = repo
            .list(&ListFilters::default(), first.next_cursor.as_deref())
            .await
            .unwrap()
            .paginator;
        assert_eq!(second.data.iter().map(|p| p.id).collect::<Vec<_>>(), ids[15..]);
        assert!(second.next_cursor.is_none());

        let back = repo
            .list(&ListFilters::default(), second.prev_cursor.as_deref())
            .await
            .unwrap()
            .paginator;
        assert_eq!(back.data.iter().map(|p| p.id).collect::<Vec<_>>(), ids[..15]);
        assert!(back.prev_cursor.is_none());
        assert!(back.next_cursor.is_some());
    }

    #[tokio::test]
    async fn test_garbage_cursor_gives_first_page() {
        let repo = repo().await;
        repo.create(&fields("SKU1", "Item", true)).await.unwrap();

        let page = repo
            .list(&ListFilters::default(), Some("%%%"))
            .await
            .unwrap();
        assert_eq!(page.paginator.data.len(), 1);
    }

    #[tokio::test]
    async fn test_update_with_own_code_and_missing_id() {
        let repo = repo().await;
        let p = repo.create(&fields("SKU1", "Widget", true)).await.unwrap();

        assert!(!repo.code_taken("SKU1", Some(p.id)).await.unwrap());
        let updated = repo
            .update(p.id, &fields("SKU1", "Widget v2", false))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.description, "Widget v2");
        assert!(!updated.active);

        assert!(repo.update(p.id + 100, &fields("X", "Y", true)).await.unwrap().is_none());
        assert!(repo.delete(p.id).await.unwrap());
        assert!(!repo.delete(p.id).await.unwrap());
    }
}
