//! # Warehouse Repository
//!
//! Database operations for warehouses (bodegas).
//!
//! The warehouse list is small and unpaginated: the page loads every row and
//! filters on the client.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use maestro_core::{ListFilters, Warehouse, WarehouseFields};

use super::WarehouseRepository;
use crate::error::DbResult;

const COLUMNS: &str = "id, code, description, address, ecommerce";

/// SQLite-backed [`WarehouseRepository`].
#[derive(Debug, Clone)]
pub struct SqliteWarehouseRepository {
    pool: SqlitePool,
}

impl SqliteWarehouseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteWarehouseRepository { pool }
    }
}

#[async_trait]
impl WarehouseRepository for SqliteWarehouseRepository {
    async fn list(&self, filters: &ListFilters) -> DbResult<Vec<Warehouse>> {
        debug!(search = ?filters.search, "Listing warehouses (unfiltered)");

        let warehouses = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {COLUMNS} FROM warehouses ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = warehouses.len(), "Listed warehouses");
        Ok(warehouses)
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Warehouse>> {
        let warehouse = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {COLUMNS} FROM warehouses WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(warehouse)
    }

    async fn code_taken(&self, code: &str, except_id: Option<i64>) -> DbResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE code = ?1 AND (?2 IS NULL OR id <> ?2))",
        )
        .bind(code)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn create(&self, fields: &WarehouseFields) -> DbResult<Warehouse> {
        debug!(code = %fields.code, "Inserting warehouse");

        let warehouse = sqlx::query_as::<_, Warehouse>(&format!(
            "INSERT INTO warehouses (code, description, address, ecommerce) \
             VALUES (?1, ?2, ?3, ?4) RETURNING {COLUMNS}"
        ))
        .bind(&fields.code)
        .bind(&fields.description)
        .bind(&fields.address)
        .bind(fields.ecommerce)
        .fetch_one(&self.pool)
        .await?;

        Ok(warehouse)
    }

    async fn update(&self, id: i64, fields: &WarehouseFields) -> DbResult<Option<Warehouse>> {
        debug!(id, code = %fields.code, "Updating warehouse");

        let warehouse = sqlx::query_as::<_, Warehouse>(&format!(
            "UPDATE warehouses SET code = ?2, description = ?3, address = ?4, ecommerce = ?5 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.code)
        .bind(&fields.description)
        .bind(&fields.address)
        .bind(fields.ecommerce)
        .fetch_optional(&self.pool)
        .await?;

        Ok(warehouse)
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting warehouse");

        let result = sqlx::query("DELETE FROM warehouses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM warehouses")
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
    use crate::{Database, DbConfig, DbError};

    async fn repo() -> SqliteWarehouseRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().warehouses()
    }

    fn fields(code: &str, ecommerce: bool) -> WarehouseFields {
        WarehouseFields {
            code: code.to_string(),
            description: "Bodega Principal".to_string(),
            address: None,
            ecommerce,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let repo = repo().await;
        let a = repo.create(&fields("BP1", false)).await.unwrap();
        let b = repo.create(&fields("BP2", false)).await.unwrap();
        assert_ne!(a.id, b.id);

        // Ids are not reused after a delete.
        assert!(repo.delete(b.id).await.unwrap());
        let c = repo.create(&fields("BP3", false)).await.unwrap();
        assert!(c.id > b.id);
    }

    #[tokio::test]
    async fn test_ecommerce_flag_scenario() {
        let repo = repo().await;
        let created = repo.create(&fields("BP1", false)).await.unwrap();
        assert_eq!(created.ecommerce_label(), "No");

        let listed = repo.list(&ListFilters::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].code, "BP1");
        assert!(!listed[0].ecommerce);

        let updated = repo
            .update(created.id, &fields("BP1", true))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.ecommerce_label(), "Sí");
    }

    #[tokio::test]
    async fn test_code_taken_excludes_own_id() {
        let repo = repo().await;
        let w = repo.create(&fields("BP1", false)).await.unwrap();

        assert!(repo.code_taken("BP1", None).await.unwrap());
        assert!(!repo.code_taken("BP1", Some(w.id)).await.unwrap());
        assert!(!repo.code_taken("BP9", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_code_hits_unique_constraint() {
        let repo = repo().await;
        repo.create(&fields("BP1", false)).await.unwrap();

        let err = repo.create(&fields("BP1", true)).await.unwrap_err();
        assert!(err.is_unique_violation_on("code"), "got {err:?}");
        assert!(matches!(err, DbError::UniqueViolation { ref table, .. } if table == "warehouses"));
    }

    #[tokio::test]
    async fn test_list_ignores_search_and_orders_by_id() {
        let repo = repo().await;
        repo.create(&fields("B", false)).await.unwrap();
        repo.create(&fields("A", false)).await.unwrap();

        let listed = repo.list(&ListFilters::search("zzz")).await.unwrap();
        let codes: Vec<_> = listed.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, ["B", "A"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let repo = repo().await;
        assert_eq!(repo.update(999, &fields("X", false)).await.unwrap(), None);
        assert!(!repo.delete(999).await.unwrap());
        assert_eq!(repo.get_by_id(999).await.unwrap(), None);
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&fields("BP1", false)).await.unwrap();
        assert_eq!(repo.update(999, &fields("BP1", true)).await.unwrap(), None);
    }
}
