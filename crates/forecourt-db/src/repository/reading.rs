//! # Nozzle Reading Repository
//!
//! Persistence for attendant meter readings — the fact rows behind both
//! stock reconciliation and sales aggregation.
//!
//! ## Query Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  list_for_tank_since(tank, cutoff)                                      │
//! │    readings JOIN nozzles ON nozzle_id                                   │
//! │    WHERE nozzles.tank_id = ? AND shift_date >= cutoff   (INCLUSIVE)     │
//! │    → feeds stock reconciliation                                         │
//! │                                                                         │
//! │  list_by_outlet[_since](outlet, [cutoff])                               │
//! │    WHERE outlet_id = ?                                                  │
//! │    → feeds sales grouping and trailing statistics                       │
//! │                                                                         │
//! │  attendant_names(ids)                                                   │
//! │    one IN (...) query for however many distinct attendants appear       │
//! │    in a result set — never a lookup per summary row                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use forecourt_core::{validation, NozzleReading};

/// Repository for nozzle-reading facts.
#[derive(Debug, Clone)]
pub struct ReadingRepository {
    pool: SqlitePool,
}

impl ReadingRepository {
    /// Creates a new ReadingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReadingRepository { pool }
    }

    /// Inserts a nozzle reading after validating it.
    ///
    /// Validation checks required IDs and non-negative figures only. It
    /// deliberately does NOT require `current >= previous` (meters get
    /// replaced) nor `total == cash + credit + upi + card` (the split is
    /// the caller's contract; stored figures aggregate as-is).
    pub async fn insert(&self, reading: &NozzleReading) -> DbResult<()> {
        validation::validate_reading(reading)?;

        debug!(
            id = %reading.id,
            nozzle_id = %reading.nozzle_id,
            shift_date = %reading.shift_date,
            "Inserting nozzle reading"
        );

        sqlx::query(
            r#"
            INSERT INTO nozzle_readings (
                id, outlet_id, nozzle_id, attendant_id,
                shift_type, shift_date,
                previous_reading_ml, current_reading_ml, testing_ml,
                cash_paise, credit_paise, upi_paise, card_paise, total_paise,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&reading.id)
        .bind(&reading.outlet_id)
        .bind(&reading.nozzle_id)
        .bind(&reading.attendant_id)
        .bind(reading.shift_type)
        .bind(reading.shift_date)
        .bind(reading.previous_reading_ml)
        .bind(reading.current_reading_ml)
        .bind(reading.testing_ml)
        .bind(reading.cash_paise)
        .bind(reading.credit_paise)
        .bind(reading.upi_paise)
        .bind(reading.card_paise)
        .bind(reading.total_paise)
        .bind(reading.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists readings for every nozzle of one tank with
    /// `shift_date >= since` (inclusive boundary).
    ///
    /// This is the reconciliation feed: attribution runs through the
    /// nozzle → tank mapping, not through the reading rows themselves.
    pub async fn list_for_tank_since(
        &self,
        tank_id: &str,
        since: NaiveDate,
    ) -> DbResult<Vec<NozzleReading>> {
        let readings = sqlx::query_as::<_, NozzleReading>(
            r#"
            SELECT
                r.id, r.outlet_id, r.nozzle_id, r.attendant_id,
                r.shift_type, r.shift_date,
                r.previous_reading_ml, r.current_reading_ml, r.testing_ml,
                r.cash_paise, r.credit_paise, r.upi_paise, r.card_paise, r.total_paise,
                r.created_at
            FROM nozzle_readings r
            JOIN nozzles n ON n.id = r.nozzle_id
            WHERE n.tank_id = ?1 AND r.shift_date >= ?2
            "#,
        )
        .bind(tank_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    /// Lists every reading for an outlet.
    pub async fn list_by_outlet(&self, outlet_id: &str) -> DbResult<Vec<NozzleReading>> {
        let readings = sqlx::query_as::<_, NozzleReading>(
            r#"
            SELECT
                id, outlet_id, nozzle_id, attendant_id,
                shift_type, shift_date,
                previous_reading_ml, current_reading_ml, testing_ml,
                cash_paise, credit_paise, upi_paise, card_paise, total_paise,
                created_at
            FROM nozzle_readings
            WHERE outlet_id = ?1
            ORDER BY shift_date DESC, created_at DESC
            "#,
        )
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    /// Lists an outlet's readings with `shift_date >= since` (inclusive).
    ///
    /// Bounds the statistics path so it never scans history older than the
    /// widest trailing window.
    pub async fn list_by_outlet_since(
        &self,
        outlet_id: &str,
        since: NaiveDate,
    ) -> DbResult<Vec<NozzleReading>> {
        let readings = sqlx::query_as::<_, NozzleReading>(
            r#"
            SELECT
                id, outlet_id, nozzle_id, attendant_id,
                shift_type, shift_date,
                previous_reading_ml, current_reading_ml, testing_ml,
                cash_paise, credit_paise, upi_paise, card_paise, total_paise,
                created_at
            FROM nozzle_readings
            WHERE outlet_id = ?1 AND shift_date >= ?2
            ORDER BY shift_date DESC, created_at DESC
            "#,
        )
        .bind(outlet_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    /// Resolves attendant display names in one batch query.
    ///
    /// Returns a map keyed by staff ID. IDs with no matching staff row are
    /// simply absent from the map — the caller leaves those names `None`
    /// rather than failing the whole listing.
    pub async fn attendant_names(&self, ids: &[String]) -> DbResult<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("SELECT id, name FROM staff WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut names = HashMap::with_capacity(rows.len());
        for row in rows {
            names.insert(row.try_get("id")?, row.try_get("name")?);
        }

        Ok(names)
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
    use forecourt_core::{NozzleReading, ShiftType};

    struct Fixture {
        db: Database,
        outlet_id: String,
        nozzle_id: String,
        tank_id: String,
        attendant_id: String,
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
        let attendant_id = outlets
            .create_staff(&outlet_id, "Asha", Some("9800000001"))
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
            nozzle_id: nozzle.id,
            tank_id: tank.id,
            attendant_id,
        }
    }

    fn reading(f: &Fixture, shift_date: &str, dispensed_ml: i64) -> NozzleReading {
        NozzleReading {
            id: Uuid::new_v4().to_string(),
            outlet_id: f.outlet_id.clone(),
            nozzle_id: f.nozzle_id.clone(),
            attendant_id: f.attendant_id.clone(),
            shift_type: ShiftType::Morning,
            shift_date: shift_date.parse().unwrap(),
            previous_reading_ml: 1_000_000,
            current_reading_ml: 1_000_000 + dispensed_ml,
            testing_ml: None,
            cash_paise: 10_000,
            credit_paise: 0,
            upi_paise: 0,
            card_paise: 0,
            total_paise: 10_000,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_tank_since_filter_is_inclusive() {
        let f = fixture().await;
        let repo = f.db.readings();

        repo.insert(&reading(&f, "2024-01-01", 100_000)).await.unwrap();
        repo.insert(&reading(&f, "2024-01-02", 200_000)).await.unwrap();
        repo.insert(&reading(&f, "2023-12-31", 999_000)).await.unwrap();

        let since = "2024-01-01".parse().unwrap();
        let rows = repo.list_for_tank_since(&f.tank_id, since).await.unwrap();

        // The reading dated exactly on the cutoff IS included.
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.shift_date >= since));
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_meter() {
        let f = fixture().await;
        let mut bad = reading(&f, "2024-01-01", 0);
        bad.previous_reading_ml = -5;

        assert!(f.db.readings().insert(&bad).await.is_err());
    }

    #[tokio::test]
    async fn test_meter_rollback_is_storable() {
        // current < previous is a data-entry reality (meter replacement);
        // it stores fine and the engines clamp downstream.
        let f = fixture().await;
        let mut rollback = reading(&f, "2024-01-01", 0);
        rollback.current_reading_ml = 500_000;

        f.db.readings().insert(&rollback).await.unwrap();
    }

    #[tokio::test]
    async fn test_attendant_names_batch_lookup() {
        let f = fixture().await;
        let repo = f.db.readings();

        let names = repo
            .attendant_names(&[f.attendant_id.clone(), "no-such-staff".to_string()])
            .await
            .unwrap();

        assert_eq!(names.get(&f.attendant_id).map(String::as_str), Some("Asha"));
        assert!(!names.contains_key("no-such-staff"));

        assert!(repo.attendant_names(&[]).await.unwrap().is_empty());
    }
}
