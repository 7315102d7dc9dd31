//! # Stock Reconciliation Engine
//!
//! Derives a tank's current stock from its stock entries and nozzle
//! readings on every call.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  current_stock(tank_id)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. get_active(tank_id)            → TankNotFound if absent/inactive    │
//! │  2. list_by_tank(tank_id)          → all stock entries                  │
//! │  3. select_latest_entry            → anchor (None is a valid            │
//! │                                      zero-state)                        │
//! │  4. list_for_tank_since(cutoff)    → readings, INCLUSIVE boundary       │
//! │  5. reconcile                      → max(0, opening+receipt−dispensed)  │
//! │                                                                         │
//! │  The entry lookup bounds the reading query, so the two fetches are      │
//! │  sequential. Different tanks reconcile concurrently on separate pool    │
//! │  connections.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::reading::ReadingRepository;
use crate::repository::stock_entry::StockEntryRepository;
use crate::repository::tank::TankRepository;
use forecourt_core::stock;
use forecourt_core::TankStock;

/// Service deriving current tank stock from stored facts.
#[derive(Debug, Clone)]
pub struct StockEngine {
    tanks: TankRepository,
    entries: StockEntryRepository,
    readings: ReadingRepository,
}

impl StockEngine {
    /// Creates a new StockEngine over a pool.
    pub fn new(pool: SqlitePool) -> Self {
        StockEngine {
            tanks: TankRepository::new(pool.clone()),
            entries: StockEntryRepository::new(pool.clone()),
            readings: ReadingRepository::new(pool),
        }
    }

    /// Computes the current stock of one tank.
    ///
    /// `as_of` defaults to today; it only matters for a tank with no stock
    /// entry, where it bounds the reading query instead of the anchor date.
    ///
    /// ## Errors
    /// `TankNotFound` when the tank is unknown or soft-deleted. A tank
    /// with no entries and no readings returns zero stock, not an error.
    pub async fn current_stock(
        &self,
        tank_id: &str,
        as_of: Option<NaiveDate>,
    ) -> DbResult<TankStock> {
        let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());

        let tank = self.tanks.get_active(tank_id).await?;

        let entries = self.entries.list_by_tank(tank_id).await?;
        let anchor = stock::select_latest_entry(&entries);
        let cutoff = stock::cutoff_date(anchor, as_of);

        let readings = self.readings.list_for_tank_since(tank_id, cutoff).await?;
        let current = stock::reconcile(anchor, &readings);

        debug!(
            tank_id = %tank_id,
            cutoff = %cutoff,
            entries = entries.len(),
            readings = readings.len(),
            current_stock_ml = current.millilitres(),
            "Reconciled tank stock"
        );

        Ok(TankStock {
            tank,
            current_stock_ml: current.millilitres(),
            as_of,
        })
    }

    /// Computes current stock for every active tank of an outlet.
    ///
    /// A tank whose reconciliation inputs are empty still appears, at
    /// zero — the dashboard shows every tank, not just the busy ones.
    pub async fn tanks_with_stock(&self, outlet_id: &str) -> DbResult<Vec<TankStock>> {
        let tanks = self.tanks.list_active_by_outlet(outlet_id).await?;

        let mut out = Vec::with_capacity(tanks.len());
        for tank in tanks {
            let stock = self.current_stock(&tank.id, None).await?;
            out.push(stock);
        }

        Ok(out)
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
    use forecourt_core::{NozzleReading, ShiftType, StockEntry};

    struct Fixture {
        db: Database,
        outlet_id: String,
        manager_id: String,
        tank_id: String,
        nozzle_id: String,
        attendant_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let outlets = OutletRepository::new(db.pool().clone());
        let outlet_id = outlets.create_outlet("Test Outlet").await.unwrap();
        let product_id = outlets.create_product(&outlet_id, "Diesel").await.unwrap();
        let du_id = outlets
            .create_dispensing_unit(&outlet_id, "Pump A")
            .await
            .unwrap();
        let manager_id = outlets
            .create_staff(&outlet_id, "Manager", None)
            .await
            .unwrap();
        let attendant_id = outlets
            .create_staff(&outlet_id, "Asha", None)
            .await
            .unwrap();
        let tank = db
            .tanks()
            .create(&outlet_id, &product_id, "T1", 20_000_000, 0, 0)
            .await
            .unwrap();
        let nozzle = db
            .tanks()
            .create_nozzle(&du_id, &tank.id, 1, Utc::now())
            .await
            .unwrap();
        Fixture {
            db,
            outlet_id,
            manager_id,
            tank_id: tank.id,
            nozzle_id: nozzle.id,
            attendant_id,
        }
    }

    async fn insert_entry(f: &Fixture, shift_date: &str, opening_l: i64, receipt_l: i64) {
        let entry = StockEntry {
            id: Uuid::new_v4().to_string(),
            tank_id: f.tank_id.clone(),
            outlet_id: f.outlet_id.clone(),
            manager_id: f.manager_id.clone(),
            shift_type: ShiftType::Morning,
            shift_date: shift_date.parse().unwrap(),
            opening_stock_ml: opening_l * 1000,
            receipt_ml: receipt_l * 1000,
            invoice_value_paise: 0,
            created_at: Utc::now(),
        };
        f.db.stock_entries().insert(&entry).await.unwrap();
    }

    async fn insert_reading(f: &Fixture, shift_date: &str, dispensed_l: i64) {
        let reading = NozzleReading {
            id: Uuid::new_v4().to_string(),
            outlet_id: f.outlet_id.clone(),
            nozzle_id: f.nozzle_id.clone(),
            attendant_id: f.attendant_id.clone(),
            shift_type: ShiftType::Morning,
            shift_date: shift_date.parse().unwrap(),
            previous_reading_ml: 0,
            current_reading_ml: dispensed_l * 1000,
            testing_ml: None,
            cash_paise: 0,
            credit_paise: 0,
            upi_paise: 0,
            card_paise: 0,
            total_paise: 0,
            created_at: Utc::now(),
        };
        f.db.readings().insert(&reading).await.unwrap();
    }

    #[tokio::test]
    async fn test_end_to_end_reconciliation() {
        let f = fixture().await;

        // Old entry that must NOT anchor, then the real anchor.
        insert_entry(&f, "2023-12-28", 900, 0).await;
        insert_entry(&f, "2024-01-01", 1000, 500).await;

        // Before the anchor date: excluded. On and after: deducted.
        insert_reading(&f, "2023-12-30", 400).await;
        insert_reading(&f, "2024-01-01", 200).await;
        insert_reading(&f, "2024-01-02", 100).await;

        let stock = f
            .db
            .stock_engine()
            .current_stock(&f.tank_id, Some("2024-01-05".parse().unwrap()))
            .await
            .unwrap();

        assert_eq!(stock.current_stock_ml, 1_200_000);
        assert_eq!(stock.tank.id, f.tank_id);
    }

    #[tokio::test]
    async fn test_fresh_tank_reports_zero() {
        let f = fixture().await;

        let stock = f
            .db
            .stock_engine()
            .current_stock(&f.tank_id, None)
            .await
            .unwrap();

        assert_eq!(stock.current_stock_ml, 0);
    }

    #[tokio::test]
    async fn test_overdraw_floors_at_zero() {
        let f = fixture().await;
        insert_entry(&f, "2024-01-01", 100, 0).await;
        insert_reading(&f, "2024-01-01", 250).await;

        let stock = f
            .db
            .stock_engine()
            .current_stock(&f.tank_id, Some("2024-01-02".parse().unwrap()))
            .await
            .unwrap();

        assert_eq!(stock.current_stock_ml, 0);
    }

    #[tokio::test]
    async fn test_inactive_tank_is_not_found() {
        let f = fixture().await;
        f.db.tanks().soft_delete(&f.tank_id).await.unwrap();

        assert!(f
            .db
            .stock_engine()
            .current_stock(&f.tank_id, None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_outlet_listing_includes_idle_tanks() {
        let f = fixture().await;
        insert_entry(&f, "2024-01-01", 1000, 0).await;

        // Second tank with no facts at all.
        let outlets = OutletRepository::new(f.db.pool().clone());
        let product_id = outlets.create_product(&f.outlet_id, "Petrol").await.unwrap();
        f.db.tanks()
            .create(&f.outlet_id, &product_id, "T2", 15_000_000, 0, 0)
            .await
            .unwrap();

        let stocks = f
            .db
            .stock_engine()
            .tanks_with_stock(&f.outlet_id)
            .await
            .unwrap();

        assert_eq!(stocks.len(), 2);
        let t2 = stocks.iter().find(|s| s.tank.name == "T2").unwrap();
        assert_eq!(t2.current_stock_ml, 0);
    }
}
