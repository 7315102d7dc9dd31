//! # Sales Aggregation Engine
//!
//! Synthesizes shift-sales summaries and trailing statistics from nozzle
//! readings, and resolves product rates for shift entry.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  shift_sales(outlet_id, limit)                                          │
//! │    readings ──► group by (date, type, attendant) ──► truncate           │
//! │                          │                                              │
//! │                          ▼                                              │
//! │    ONE batch name query decorates however many groups came back —       │
//! │    never a staff lookup per summary row.                                │
//! │                                                                         │
//! │  sales_stats(outlet_id)                                                 │
//! │    readings since monthly cutoff ──► group ──► trailing windows         │
//! │                                                                         │
//! │  product_rates(manager_id, date?, type?)                                │
//! │    manager's shifts (updated_at DESC) ──► three-tier fallback           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::reading::ReadingRepository;
use crate::repository::shift::ShiftRepository;
use forecourt_core::sales;
use forecourt_core::{ProductRate, SalesStats, ShiftSalesSummary, ShiftType};

/// Service synthesizing sales views from stored facts.
#[derive(Debug, Clone)]
pub struct SalesEngine {
    readings: ReadingRepository,
    shifts: ShiftRepository,
}

impl SalesEngine {
    /// Creates a new SalesEngine over a pool.
    pub fn new(pool: SqlitePool) -> Self {
        SalesEngine {
            readings: ReadingRepository::new(pool.clone()),
            shifts: ShiftRepository::new(pool),
        }
    }

    /// Lists shift-sales summaries for an outlet, newest shift first.
    ///
    /// `limit` bounds the number of groups returned (default 10). Name
    /// resolution is one batch query over the distinct attendants in the
    /// result; an attendant with no staff row keeps `attendant_name: None`.
    pub async fn shift_sales(
        &self,
        outlet_id: &str,
        limit: Option<usize>,
    ) -> DbResult<Vec<ShiftSalesSummary>> {
        let limit = limit.unwrap_or(sales::DEFAULT_SUMMARY_LIMIT);
        let readings = self.readings.list_by_outlet(outlet_id).await?;

        let summaries = sales::summarize_shift_sales(&readings, limit);

        debug!(
            outlet_id = %outlet_id,
            readings = readings.len(),
            groups = summaries.len(),
            "Summarized shift sales"
        );

        self.decorate_attendants(summaries).await
    }

    /// Like [`shift_sales`](Self::shift_sales) but bounded to readings
    /// with `shift_date >= since`, without a group limit.
    pub async fn shift_sales_since(
        &self,
        outlet_id: &str,
        since: NaiveDate,
    ) -> DbResult<Vec<ShiftSalesSummary>> {
        let readings = self.readings.list_by_outlet_since(outlet_id, since).await?;
        let summaries = sales::group_shift_sales(&readings);
        self.decorate_attendants(summaries).await
    }

    /// Computes trailing weekly/monthly sales statistics for an outlet,
    /// evaluated against today's date.
    pub async fn sales_stats(&self, outlet_id: &str) -> DbResult<SalesStats> {
        self.sales_stats_as_of(outlet_id, Utc::now().date_naive())
            .await
    }

    /// Statistics evaluated against an explicit date. The fetch is bounded
    /// by the monthly cutoff — the widest window the figures need.
    pub async fn sales_stats_as_of(
        &self,
        outlet_id: &str,
        today: NaiveDate,
    ) -> DbResult<SalesStats> {
        let since = sales::monthly_cutoff(today);
        let readings = self.readings.list_by_outlet_since(outlet_id, since).await?;
        let summaries = sales::group_shift_sales(&readings);

        Ok(sales::compute_sales_stats(&summaries, today))
    }

    /// Resolves the product rates a manager should see when opening a
    /// shift, via the three-tier fallback over their shift history.
    pub async fn product_rates(
        &self,
        manager_id: &str,
        target_date: Option<NaiveDate>,
        target_shift_type: Option<ShiftType>,
    ) -> DbResult<Vec<ProductRate>> {
        let shifts = self.shifts.list_by_manager(manager_id).await?;
        Ok(sales::resolve_product_rates(
            &shifts,
            target_date,
            target_shift_type,
        ))
    }

    /// Fills in attendant display names with one batch lookup.
    async fn decorate_attendants(
        &self,
        mut summaries: Vec<ShiftSalesSummary>,
    ) -> DbResult<Vec<ShiftSalesSummary>> {
        let mut ids: Vec<String> = summaries.iter().map(|s| s.attendant_id.clone()).collect();
        ids.sort();
        ids.dedup();

        let names = self.readings.attendant_names(&ids).await?;

        for summary in &mut summaries {
            summary.attendant_name = names.get(&summary.attendant_id).cloned();
        }

        Ok(summaries)
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
    use forecourt_core::{NozzleReading, ProductRate, ShiftType};

    struct Fixture {
        db: Database,
        outlet_id: String,
        nozzle_id: String,
        attendants: Vec<String>,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let outlets = OutletRepository::new(db.pool().clone());
        let outlet_id = outlets.create_outlet("Test Outlet").await.unwrap();
        let product_id = outlets.create_product(&outlet_id, "Petrol").await.unwrap();
        let du_id = outlets
            .create_dispensing_unit(&outlet_id, "Pump A")
            .await
            .unwrap();
        let a1 = outlets.create_staff(&outlet_id, "Asha", None).await.unwrap();
        let a2 = outlets.create_staff(&outlet_id, "Bilal", None).await.unwrap();
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
            nozzle_id: nozzle.id,
            attendants: vec![a1, a2],
        }
    }

    async fn insert_reading(
        f: &Fixture,
        shift_date: &str,
        shift_type: ShiftType,
        attendant: &str,
        cash: i64,
        upi: i64,
    ) {
        let reading = NozzleReading {
            id: Uuid::new_v4().to_string(),
            outlet_id: f.outlet_id.clone(),
            nozzle_id: f.nozzle_id.clone(),
            attendant_id: attendant.to_string(),
            shift_type,
            shift_date: shift_date.parse().unwrap(),
            previous_reading_ml: 0,
            current_reading_ml: 0,
            testing_ml: None,
            cash_paise: cash,
            credit_paise: 0,
            upi_paise: upi,
            card_paise: 0,
            total_paise: cash + upi,
            created_at: Utc::now(),
        };
        f.db.readings().insert(&reading).await.unwrap();
    }

    fn rate(product: &str, paise: i64) -> ProductRate {
        ProductRate {
            product_id: product.to_string(),
            rate_paise: paise,
            density: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_shift_sales_groups_and_decorates_names() {
        let f = fixture().await;
        let (a1, a2) = (f.attendants[0].clone(), f.attendants[1].clone());

        insert_reading(&f, "2024-01-02", ShiftType::Morning, &a1, 1_000, 500).await;
        insert_reading(&f, "2024-01-02", ShiftType::Morning, &a1, 2_000, 0).await;
        insert_reading(&f, "2024-01-01", ShiftType::Evening, &a2, 700, 0).await;

        let summaries = f.db.sales_engine().shift_sales(&f.outlet_id, None).await.unwrap();
        assert_eq!(summaries.len(), 2);

        // Newest date first.
        assert_eq!(summaries[0].shift_date.to_string(), "2024-01-02");
        assert_eq!(summaries[0].total_paise, 3_500);
        assert_eq!(summaries[0].attendant_name.as_deref(), Some("Asha"));

        assert_eq!(summaries[1].attendant_name.as_deref(), Some("Bilal"));
        assert_eq!(summaries[1].total_paise, 700);
    }

    #[tokio::test]
    async fn test_shift_sales_limit_defaults_to_ten() {
        let f = fixture().await;
        let a1 = f.attendants[0].clone();

        for day in 1..=12 {
            insert_reading(
                &f,
                &format!("2024-01-{day:02}"),
                ShiftType::Morning,
                &a1,
                100,
                0,
            )
            .await;
        }

        let defaulted = f.db.sales_engine().shift_sales(&f.outlet_id, None).await.unwrap();
        assert_eq!(defaulted.len(), 10);
        assert_eq!(defaulted[0].shift_date.to_string(), "2024-01-12");

        let capped = f
            .db
            .sales_engine()
            .shift_sales(&f.outlet_id, Some(3))
            .await
            .unwrap();
        assert_eq!(capped.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_attendant_keeps_none_name() {
        let f = fixture().await;

        // Reading whose attendant has no staff row. The staff FK only
        // applies at insert time through real repositories in production;
        // here we go through raw SQL to simulate a deleted staff row.
        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(f.db.pool())
            .await
            .unwrap();
        insert_reading(&f, "2024-01-01", ShiftType::Morning, "ghost-staff", 100, 0).await;

        let summaries = f.db.sales_engine().shift_sales(&f.outlet_id, None).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].attendant_name, None);
    }

    #[tokio::test]
    async fn test_sales_stats_windows() {
        let f = fixture().await;
        let a1 = f.attendants[0].clone();
        let today = "2024-01-31".parse().unwrap();

        insert_reading(&f, "2024-01-28", ShiftType::Morning, &a1, 10_000, 5_000).await;
        insert_reading(&f, "2024-01-10", ShiftType::Morning, &a1, 7_000, 0).await;
        insert_reading(&f, "2023-12-01", ShiftType::Morning, &a1, 99_000, 0).await;

        let stats = f
            .db
            .sales_engine()
            .sales_stats_as_of(&f.outlet_id, today)
            .await
            .unwrap();

        assert_eq!(stats.weekly_sales_paise, 15_000);
        assert_eq!(stats.monthly_sales_paise, 22_000);
        assert_eq!(stats.breakdown.cash_paise, 17_000);
        assert_eq!(stats.breakdown.upi_paise, 5_000);
    }

    #[tokio::test]
    async fn test_sales_stats_zero_state() {
        let f = fixture().await;
        let stats = f
            .db
            .sales_engine()
            .sales_stats_as_of(&f.outlet_id, "2024-01-31".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(stats, forecourt_core::SalesStats::default());
    }

    #[tokio::test]
    async fn test_product_rates_fall_back_across_shifts() {
        let f = fixture().await;
        let outlets = OutletRepository::new(f.db.pool().clone());
        let manager_id = outlets
            .create_staff(&f.outlet_id, "Manager", None)
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        f.db.shifts()
            .create(&manager_id, ShiftType::Morning, today, &[rate("p1", 10_000)])
            .await
            .unwrap();

        // Exact tier: morning shift created today.
        let exact = f
            .db
            .sales_engine()
            .product_rates(&manager_id, Some(today), Some(ShiftType::Morning))
            .await
            .unwrap();
        assert_eq!(exact, vec![rate("p1", 10_000)]);

        // Same-type tier: evening never had a shift, any-type fallback
        // reaches the morning rates.
        let fallback = f
            .db
            .sales_engine()
            .product_rates(&manager_id, Some(today), Some(ShiftType::Evening))
            .await
            .unwrap();
        assert_eq!(fallback, vec![rate("p1", 10_000)]);

        // Manager with no shifts at all: empty, not an error.
        let none = f
            .db
            .sales_engine()
            .product_rates("no-such-manager", None, None)
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
