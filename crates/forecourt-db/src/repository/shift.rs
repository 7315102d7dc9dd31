//! # Shift Repository
//!
//! Persistence for manager shift records: lifecycle status and the
//! product rates entered for the shift.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   not-started ──► active ──► completed ──► submitted                    │
//! │                                                                         │
//! │   One step forward at a time, never backward. The UNIQUE index on       │
//! │   (manager_id, shift_type, shift_date) makes the shift identity a       │
//! │   database fact, and the transition UPDATE re-checks the current        │
//! │   status so concurrent writers cannot both advance the same row.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forecourt_core::{CoreError, ProductRate, Shift, ShiftStatus, ShiftType};

/// Row shape for the shifts table. `product_rates` is a JSON column, so
/// the row carries it as text and [`ShiftRow::into_shift`] parses it.
#[derive(Debug, sqlx::FromRow)]
struct ShiftRow {
    id: String,
    manager_id: String,
    shift_type: ShiftType,
    shift_date: NaiveDate,
    status: ShiftStatus,
    product_rates: String,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl ShiftRow {
    fn into_shift(self) -> DbResult<Shift> {
        let product_rates: Vec<ProductRate> = serde_json::from_str(&self.product_rates)
            .map_err(|e| DbError::Internal(format!("malformed product_rates JSON: {e}")))?;

        Ok(Shift {
            id: self.id,
            manager_id: self.manager_id,
            shift_type: self.shift_type,
            shift_date: self.shift_date,
            status: self.status,
            product_rates,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SHIFT_COLUMNS: &str = "id, manager_id, shift_type, shift_date, status, \
                             product_rates, created_at, updated_at";

/// Repository for shift lifecycle and product rates.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Creates a shift record in the `not-started` state.
    ///
    /// ## Errors
    /// `UniqueViolation` when a row already exists for this
    /// `(manager, shift_type, shift_date)` — there is exactly one shift
    /// identity per manager per work period per day.
    pub async fn create(
        &self,
        manager_id: &str,
        shift_type: ShiftType,
        shift_date: NaiveDate,
        product_rates: &[ProductRate],
    ) -> DbResult<Shift> {
        let now = Utc::now();
        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            manager_id: manager_id.to_string(),
            shift_type,
            shift_date,
            status: ShiftStatus::NotStarted,
            product_rates: product_rates.to_vec(),
            created_at: now,
            updated_at: now,
        };

        let rates_json = serde_json::to_string(&shift.product_rates)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        debug!(
            id = %shift.id,
            manager_id = %manager_id,
            shift_type = %shift_type,
            shift_date = %shift_date,
            "Creating shift"
        );

        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, manager_id, shift_type, shift_date, status,
                product_rates, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.manager_id)
        .bind(shift.shift_type)
        .bind(shift.shift_date)
        .bind(shift.status)
        .bind(&rates_json)
        .bind(shift.created_at)
        .bind(shift.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Gets a shift by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Shift> {
        let row = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::Core(CoreError::ShiftNotFound(id.to_string())))?;

        row.into_shift()
    }

    /// Finds the shift for one `(manager, shift_type, shift_date)` identity.
    pub async fn find(
        &self,
        manager_id: &str,
        shift_type: ShiftType,
        shift_date: NaiveDate,
    ) -> DbResult<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts \
             WHERE manager_id = ?1 AND shift_type = ?2 AND shift_date = ?3"
        ))
        .bind(manager_id)
        .bind(shift_type)
        .bind(shift_date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShiftRow::into_shift).transpose()
    }

    /// Lists a manager's shifts, most recently updated first — the order
    /// product-rate resolution scans in.
    pub async fn list_by_manager(&self, manager_id: &str) -> DbResult<Vec<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts \
             WHERE manager_id = ?1 \
             ORDER BY updated_at DESC"
        ))
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ShiftRow::into_shift).collect()
    }

    /// Replaces the product rates on a shift.
    pub async fn update_rates(&self, shift_id: &str, rates: &[ProductRate]) -> DbResult<()> {
        let rates_json =
            serde_json::to_string(rates).map_err(|e| DbError::Internal(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE shifts SET product_rates = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(shift_id)
        .bind(&rates_json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::Core(CoreError::ShiftNotFound(
                shift_id.to_string(),
            )));
        }

        Ok(())
    }

    /// Advances a shift one step along its lifecycle.
    ///
    /// The UPDATE carries the expected current status in its WHERE clause,
    /// so two concurrent calls cannot both advance the same row: the loser
    /// matches zero rows and gets `InvalidShiftTransition`.
    ///
    /// ## Errors
    /// - `ShiftNotFound` when the ID is unknown
    /// - `InvalidShiftTransition` for backward moves, skipped states, or a
    ///   lost race
    pub async fn transition(&self, shift_id: &str, next: ShiftStatus) -> DbResult<Shift> {
        let current = self.get_by_id(shift_id).await?;

        if !current.status.can_transition_to(next) {
            return Err(DbError::Core(CoreError::InvalidShiftTransition {
                shift_id: shift_id.to_string(),
                current: current.status,
                requested: next,
            }));
        }

        let result = sqlx::query(
            "UPDATE shifts SET status = ?2, updated_at = ?3 \
             WHERE id = ?1 AND status = ?4",
        )
        .bind(shift_id)
        .bind(next)
        .bind(Utc::now())
        .bind(current.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Somebody advanced the row between our read and write.
            return Err(DbError::Core(CoreError::InvalidShiftTransition {
                shift_id: shift_id.to_string(),
                current: current.status,
                requested: next,
            }));
        }

        info!(
            shift_id = %shift_id,
            from = %current.status,
            to = %next,
            "Shift transitioned"
        );

        self.get_by_id(shift_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::outlet::OutletRepository;

    async fn fixture() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let outlets = OutletRepository::new(db.pool().clone());
        let outlet_id = outlets.create_outlet("Test Outlet").await.unwrap();
        let manager_id = outlets
            .create_staff(&outlet_id, "Manager", None)
            .await
            .unwrap();
        (db, manager_id)
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
    async fn test_create_and_find_roundtrips_rates() {
        let (db, manager_id) = fixture().await;
        let date = "2024-01-01".parse().unwrap();
        let rates = vec![rate("p1", 10_350)];

        let created = db
            .shifts()
            .create(&manager_id, ShiftType::Morning, date, &rates)
            .await
            .unwrap();
        assert_eq!(created.status, ShiftStatus::NotStarted);

        let found = db
            .shifts()
            .find(&manager_id, ShiftType::Morning, date)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.product_rates, rates);
    }

    #[tokio::test]
    async fn test_one_shift_per_manager_type_date() {
        let (db, manager_id) = fixture().await;
        let date = "2024-01-01".parse().unwrap();

        db.shifts()
            .create(&manager_id, ShiftType::Morning, date, &[])
            .await
            .unwrap();

        let duplicate = db
            .shifts()
            .create(&manager_id, ShiftType::Morning, date, &[])
            .await;
        assert!(matches!(duplicate, Err(DbError::UniqueViolation { .. })));

        // A different shift type on the same date is a different identity.
        db.shifts()
            .create(&manager_id, ShiftType::Evening, date, &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_lifecycle_advances_one_step_at_a_time() {
        let (db, manager_id) = fixture().await;
        let date = "2024-01-01".parse().unwrap();
        let shift = db
            .shifts()
            .create(&manager_id, ShiftType::Morning, date, &[])
            .await
            .unwrap();

        let shift = db
            .shifts()
            .transition(&shift.id, ShiftStatus::Active)
            .await
            .unwrap();
        assert_eq!(shift.status, ShiftStatus::Active);

        let shift = db
            .shifts()
            .transition(&shift.id, ShiftStatus::Completed)
            .await
            .unwrap();
        let shift = db
            .shifts()
            .transition(&shift.id, ShiftStatus::Submitted)
            .await
            .unwrap();
        assert_eq!(shift.status, ShiftStatus::Submitted);
    }

    #[tokio::test]
    async fn test_skipping_and_backward_transitions_fail() {
        let (db, manager_id) = fixture().await;
        let date = "2024-01-01".parse().unwrap();
        let shift = db
            .shifts()
            .create(&manager_id, ShiftType::Night, date, &[])
            .await
            .unwrap();

        // not-started → completed skips a state.
        let skip = db.shifts().transition(&shift.id, ShiftStatus::Completed).await;
        assert!(matches!(
            skip,
            Err(DbError::Core(CoreError::InvalidShiftTransition { .. }))
        ));

        let shift = db
            .shifts()
            .transition(&shift.id, ShiftStatus::Active)
            .await
            .unwrap();

        // active → not-started goes backward.
        let back = db
            .shifts()
            .transition(&shift.id, ShiftStatus::NotStarted)
            .await;
        assert!(back.is_err());

        // Status unchanged after the failed attempts.
        let current = db.shifts().get_by_id(&shift.id).await.unwrap();
        assert_eq!(current.status, ShiftStatus::Active);
    }

    #[tokio::test]
    async fn test_update_rates_bumps_updated_at() {
        let (db, manager_id) = fixture().await;
        let date = "2024-01-01".parse().unwrap();
        let shift = db
            .shifts()
            .create(&manager_id, ShiftType::Morning, date, &[])
            .await
            .unwrap();

        db.shifts()
            .update_rates(&shift.id, &[rate("p1", 9_900)])
            .await
            .unwrap();

        let updated = db.shifts().get_by_id(&shift.id).await.unwrap();
        assert_eq!(updated.product_rates, vec![rate("p1", 9_900)]);
        assert!(updated.updated_at >= shift.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_shift_is_not_found() {
        let (db, _) = fixture().await;
        assert!(db.shifts().get_by_id("no-such-shift").await.is_err());
        assert!(db
            .shifts()
            .update_rates("no-such-shift", &[])
            .await
            .is_err());
    }
}
