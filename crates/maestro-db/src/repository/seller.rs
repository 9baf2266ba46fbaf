//! # Seller Repository
//!
//! Database operations for sellers (vendedores). The list is offset
//! paginated, ten per page, newest first.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use maestro_core::{ListFilters, OffsetPage, Seller, SellerFields, SELLER_PAGE_SIZE};

use super::query::{page_offset, SearchPredicate};
use super::SellerRepository;
use crate::error::DbResult;

const COLUMNS: &str = "id, description, username, branch";

/// Columns searched by the list filter.
pub const SEARCH_COLUMNS: &[&str] = &["description", "username", "branch"];

/// Builds the predicate for a seller list request. Sellers have no status.
pub fn predicate(filters: &ListFilters) -> SearchPredicate {
    SearchPredicate::new(SEARCH_COLUMNS).search(filters.search.as_deref())
}

/// SQLite-backed [`SellerRepository`].
#[derive(Debug, Clone)]
pub struct SqliteSellerRepository {
    pool: SqlitePool,
}

impl SqliteSellerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSellerRepository { pool }
    }
}

#[async_trait]
impl SellerRepository for SqliteSellerRepository {
    async fn list(&self, filters: &ListFilters, page: u32) -> DbResult<OffsetPage<Seller>> {
        let (page, offset) = page_offset(page, SELLER_PAGE_SIZE);
        debug!(search = ?filters.search, page, "Listing sellers");

        let predicate = predicate(filters);

        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM sellers");
        predicate.push_to(&mut count_qb);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM sellers"));
        predicate.push_to(&mut qb);
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(i64::from(SELLER_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(offset);
        let sellers: Vec<Seller> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(OffsetPage::new(
            sellers,
            page,
            SELLER_PAGE_SIZE,
            total.max(0) as u64,
        ))
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Seller>> {
        let seller = sqlx::query_as::<_, Seller>(&format!(
            "SELECT {COLUMNS} FROM sellers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seller)
    }

    async fn create(&self, fields: &SellerFields) -> DbResult<Seller> {
        debug!(username = %fields.username, "Inserting seller");

        let seller = sqlx::query_as::<_, Seller>(&format!(
            "INSERT INTO sellers (description, username, branch) VALUES (?1, ?2, ?3) \
             RETURNING {COLUMNS}"
        ))
        .bind(&fields.description)
        .bind(&fields.username)
        .bind(&fields.branch)
        .fetch_one(&self.pool)
        .await?;

        Ok(seller)
    }

    async fn update(&self, id: i64, fields: &SellerFields) -> DbResult<Option<Seller>> {
        debug!(id, "Updating seller");

        let seller = sqlx::query_as::<_, Seller>(&format!(
            "UPDATE sellers SET description = ?2, username = ?3, branch = ?4 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.description)
        .bind(&fields.username)
        .bind(&fields.branch)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seller)
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting seller");

        let result = sqlx::query("DELETE FROM sellers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sellers")
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

    async fn repo() -> SqliteSellerRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().sellers()
    }

    fn fields(username: &str, branch: &str) -> SellerFields {
        SellerFields {
            description: format!("Vendedor {username}"),
            username: username.to_string(),
            branch: branch.to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_twice_scenario() {
        let repo = repo().await;
        let s = repo.create(&fields("jperez", "Centro")).await.unwrap();

        assert!(repo.delete(s.id).await.unwrap());
        assert!(!repo.delete(s.id).await.unwrap());
        assert_eq!(repo.get_by_id(s.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_offset_pages_newest_first() {
        let repo = repo().await;
        for i in 0..23 {
            repo.create(&fields(&format!("user{i:02}"), "Centro")).await.unwrap();
        }

        let first = repo.list(&ListFilters::default(), 1).await.unwrap();
        assert_eq!(first.total, 23);
        assert_eq!(first.last_page, 3);
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.data[0].username, "user22");
        assert_eq!(first.prev_page(), None);
        assert_eq!(first.next_page(), Some(2));

        let last = repo.list(&ListFilters::default(), 3).await.unwrap();
        assert_eq!(last.data.len(), 3);
        assert_eq!(last.from, Some(21));
        assert_eq!(last.to, Some(23));
        assert_eq!(last.data[2].username, "user00");

        let beyond = repo.list(&ListFilters::default(), 9).await.unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total, 23);
    }

    #[tokio::test]
    async fn test_search_across_three_columns() {
        let repo = repo().await;
        repo.create(&fields("jperez", "Centro")).await.unwrap();
        repo.create(&fields("mlopez", "Mall Plaza")).await.unwrap();

        let by_branch = repo.list(&ListFilters::search("plaza"), 1).await.unwrap();
        assert_eq!(by_branch.total, 1);
        assert_eq!(by_branch.data[0].username, "mlopez");

        let by_description = repo.list(&ListFilters::search("VENDEDOR"), 1).await.unwrap();
        assert_eq!(by_description.total, 2);

        let page_zero = repo.list(&ListFilters::search("jperez"), 0).await.unwrap();
        assert_eq!(page_zero.current_page, 1);
        assert_eq!(page_zero.total, 1);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = repo().await;
        let s = repo.create(&fields("jperez", "Centro")).await.unwrap();

        let updated = repo
            .update(s.id, &fields("jperez2", "Norte"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.branch, "Norte");
        assert!(repo.update(s.id + 1, &fields("x", "y")).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
