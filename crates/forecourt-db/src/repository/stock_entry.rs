//! # Stock Entry Repository
//!
//! Persistence for opening-stock/receipt facts. One entry per tank per
//! shift; reconciliation anchors on the latest entry by shift date.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use forecourt_core::{validation, StockEntry};

/// Repository for stock-entry facts.
#[derive(Debug, Clone)]
pub struct StockEntryRepository {
    pool: SqlitePool,
}

impl StockEntryRepository {
    /// Creates a new StockEntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockEntryRepository { pool }
    }

    /// Inserts a stock entry after validating it.
    ///
    /// ## Errors
    /// - `Core(Validation)` when a required ID is blank or a volume/amount
    ///   is negative
    /// - `ForeignKeyViolation` when the tank or outlet does not exist
    pub async fn insert(&self, entry: &StockEntry) -> DbResult<()> {
        validation::validate_stock_entry(entry)?;

        debug!(
            id = %entry.id,
            tank_id = %entry.tank_id,
            shift_date = %entry.shift_date,
            "Inserting stock entry"
        );

        sqlx::query(
            r#"
            INSERT INTO stock_entries (
                id, tank_id, outlet_id, manager_id,
                shift_type, shift_date,
                opening_stock_ml, receipt_ml, invoice_value_paise,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.tank_id)
        .bind(&entry.outlet_id)
        .bind(&entry.manager_id)
        .bind(entry.shift_type)
        .bind(entry.shift_date)
        .bind(entry.opening_stock_ml)
        .bind(entry.receipt_ml)
        .bind(entry.invoice_value_paise)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists every stock entry for a tank, newest shift first.
    ///
    /// The `shift_date DESC, created_at DESC` order means the first row is
    /// the reconciliation anchor, but callers that want the anchor should
    /// still go through the pure selection so in-memory and database paths
    /// agree on the tie-break.
    pub async fn list_by_tank(&self, tank_id: &str) -> DbResult<Vec<StockEntry>> {
        let entries = sqlx::query_as::<_, StockEntry>(
            r#"
            SELECT
                id, tank_id, outlet_id, manager_id,
                shift_type, shift_date,
                opening_stock_ml, receipt_ml, invoice_value_paise,
                created_at
            FROM stock_entries
            WHERE tank_id = ?1
            ORDER BY shift_date DESC, created_at DESC
            "#,
        )
        .bind(tank_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::pool::{Database, DbConfig};
    use crate::repository::outlet::OutletRepository;
    use forecourt_core::{ShiftType, StockEntry};

    struct Fixture {
        db: Database,
        outlet_id: String,
        manager_id: String,
        tank_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let outlets = OutletRepository::new(db.pool().clone());
        let outlet_id = outlets.create_outlet("Test Outlet").await.unwrap();
        let product_id = outlets.create_product(&outlet_id, "Diesel").await.unwrap();
        let manager_id = outlets
            .create_staff(&outlet_id, "Manager", None)
            .await
            .unwrap();
        let tank = db
            .tanks()
            .create(&outlet_id, &product_id, "T1", 20_000_000, 0, 0)
            .await
            .unwrap();
        Fixture {
            db,
            outlet_id,
            manager_id,
            tank_id: tank.id,
        }
    }

    fn entry(f: &Fixture, shift_date: &str, opening_ml: i64) -> StockEntry {
        StockEntry {
            id: Uuid::new_v4().to_string(),
            tank_id: f.tank_id.clone(),
            outlet_id: f.outlet_id.clone(),
            manager_id: f.manager_id.clone(),
            shift_type: ShiftType::Morning,
            shift_date: shift_date.parse().unwrap(),
            opening_stock_ml: opening_ml,
            receipt_ml: 0,
            invoice_value_paise: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_newest_first() {
        let f = fixture().await;
        let repo = f.db.stock_entries();

        repo.insert(&entry(&f, "2024-01-01", 1_000_000)).await.unwrap();
        repo.insert(&entry(&f, "2024-01-03", 3_000_000)).await.unwrap();
        repo.insert(&entry(&f, "2024-01-02", 2_000_000)).await.unwrap();

        let entries = repo.list_by_tank(&f.tank_id).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].shift_date.to_string(), "2024-01-03");
        assert_eq!(entries[0].opening_stock_ml, 3_000_000);
        assert_eq!(entries[2].shift_date.to_string(), "2024-01-01");
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_opening_stock() {
        let f = fixture().await;
        let mut bad = entry(&f, "2024-01-01", -1);
        bad.opening_stock_ml = -1;

        assert!(f.db.stock_entries().insert(&bad).await.is_err());
        assert!(f
            .db
            .stock_entries()
            .list_by_tank(&f.tank_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_tank() {
        let f = fixture().await;
        let mut orphan = entry(&f, "2024-01-01", 1_000_000);
        orphan.tank_id = Uuid::new_v4().to_string();

        assert!(f.db.stock_entries().insert(&orphan).await.is_err());
    }
}
