//! # Tank Repository
//!
//! Database operations for tanks and their nozzles.
//!
//! ## Tank → Nozzle → Reading Attribution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Tank "T1 Diesel"                                                       │
//! │    ├── Nozzle #1 on Pump A ──► readings                                 │
//! │    └── Nozzle #2 on Pump B ──► readings                                 │
//! │                                                                         │
//! │  Reconciliation deducts readings from EVERY nozzle mapped to the        │
//! │  tank, which is why the nozzle rows live here next to the tanks.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Soft Delete
//! Tanks are never hard-deleted: `is_active = 0` removes a tank from
//! reconciliation while keeping its reading/stock history intact.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forecourt_core::{CoreError, Nozzle, Tank};

/// Repository for tank and nozzle database operations.
#[derive(Debug, Clone)]
pub struct TankRepository {
    pool: SqlitePool,
}

impl TankRepository {
    /// Creates a new TankRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TankRepository { pool }
    }

    /// Creates a new tank.
    ///
    /// ## Arguments
    /// * `outlet_id` - Owning outlet (tenant boundary)
    /// * `product_id` - Fuel product stored in the tank
    /// * `name` - Display name
    /// * `capacity_ml` / `length_mm` / `diameter_mm` - Physical dimensions
    ///
    /// ## Returns
    /// The created tank with generated ID.
    pub async fn create(
        &self,
        outlet_id: &str,
        product_id: &str,
        name: &str,
        capacity_ml: i64,
        length_mm: i64,
        diameter_mm: i64,
    ) -> DbResult<Tank> {
        let now = Utc::now();
        let tank = Tank {
            id: Uuid::new_v4().to_string(),
            outlet_id: outlet_id.to_string(),
            product_id: product_id.to_string(),
            name: name.to_string(),
            capacity_ml,
            length_mm,
            diameter_mm,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %tank.id, name = %tank.name, "Creating tank");

        sqlx::query(
            r#"
            INSERT INTO tanks (
                id, outlet_id, product_id, name,
                capacity_ml, length_mm, diameter_mm,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&tank.id)
        .bind(&tank.outlet_id)
        .bind(&tank.product_id)
        .bind(&tank.name)
        .bind(tank.capacity_ml)
        .bind(tank.length_mm)
        .bind(tank.diameter_mm)
        .bind(tank.is_active)
        .bind(tank.created_at)
        .bind(tank.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(tank)
    }

    /// Gets a tank by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Tank>> {
        let tank = sqlx::query_as::<_, Tank>(
            r#"
            SELECT
                id, outlet_id, product_id, name,
                capacity_ml, length_mm, diameter_mm,
                is_active, created_at, updated_at
            FROM tanks
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tank)
    }

    /// Gets an active tank, or fails.
    ///
    /// ## Errors
    /// `TankNotFound` when the ID is unknown OR the tank is soft-deleted —
    /// reconciliation treats both the same way.
    pub async fn get_active(&self, id: &str) -> DbResult<Tank> {
        match self.get_by_id(id).await? {
            Some(tank) if tank.is_active => Ok(tank),
            _ => Err(DbError::Core(CoreError::TankNotFound(id.to_string()))),
        }
    }

    /// Lists the active tanks for an outlet.
    pub async fn list_active_by_outlet(&self, outlet_id: &str) -> DbResult<Vec<Tank>> {
        let tanks = sqlx::query_as::<_, Tank>(
            r#"
            SELECT
                id, outlet_id, product_id, name,
                capacity_ml, length_mm, diameter_mm,
                is_active, created_at, updated_at
            FROM tanks
            WHERE outlet_id = ?1 AND is_active = 1
            ORDER BY name
            "#,
        )
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tanks)
    }

    /// Soft-deletes a tank (`is_active = 0`).
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE tanks SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Tank", id));
        }

        Ok(())
    }

    /// Creates a nozzle mounted on a dispensing unit, drawing from a tank.
    ///
    /// ## Errors
    /// `UniqueViolation` when the nozzle number is already taken on the
    /// dispensing unit.
    pub async fn create_nozzle(
        &self,
        dispensing_unit_id: &str,
        tank_id: &str,
        nozzle_number: i64,
        calibration_valid_until: DateTime<Utc>,
    ) -> DbResult<Nozzle> {
        let nozzle = Nozzle {
            id: Uuid::new_v4().to_string(),
            dispensing_unit_id: dispensing_unit_id.to_string(),
            tank_id: tank_id.to_string(),
            nozzle_number,
            calibration_valid_until,
            created_at: Utc::now(),
        };

        debug!(id = %nozzle.id, tank_id = %tank_id, nozzle_number, "Creating nozzle");

        sqlx::query(
            r#"
            INSERT INTO nozzles (
                id, dispensing_unit_id, tank_id, nozzle_number,
                calibration_valid_until, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&nozzle.id)
        .bind(&nozzle.dispensing_unit_id)
        .bind(&nozzle.tank_id)
        .bind(nozzle.nozzle_number)
        .bind(nozzle.calibration_valid_until)
        .bind(nozzle.created_at)
        .execute(&self.pool)
        .await?;

        Ok(nozzle)
    }

    /// Lists the nozzles drawing from a tank.
    pub async fn list_nozzles_by_tank(&self, tank_id: &str) -> DbResult<Vec<Nozzle>> {
        let nozzles = sqlx::query_as::<_, Nozzle>(
            r#"
            SELECT
                id, dispensing_unit_id, tank_id, nozzle_number,
                calibration_valid_until, created_at
            FROM nozzles
            WHERE tank_id = ?1
            ORDER BY nozzle_number
            "#,
        )
        .bind(tank_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(nozzles)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
