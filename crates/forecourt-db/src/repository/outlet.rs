//! # Outlet Repository
//!
//! Reference-data operations for outlets and the entities that hang off
//! them: products, staff, and dispensing units.
//!
//! These rows exist so the fact tables have something to reference — the
//! engines only ever read them through joins and the batch name lookup.
//! There is no derived-value computation here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

/// Repository for outlet-scoped reference data.
///
/// ## Usage
/// ```rust,ignore
/// let repo = OutletRepository::new(pool);
///
/// let outlet_id = repo.create_outlet("Highway Fuels").await?;
/// let product_id = repo.create_product(&outlet_id, "Diesel").await?;
/// let staff_id = repo.create_staff(&outlet_id, "Asha", Some("9800000001")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OutletRepository {
    pool: SqlitePool,
}

impl OutletRepository {
    /// Creates a new OutletRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OutletRepository { pool }
    }

    /// Creates a retail outlet and returns its generated ID.
    pub async fn create_outlet(&self, name: &str) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %name, "Creating outlet");

        sqlx::query("INSERT INTO outlets (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(name)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// Creates a fuel product for an outlet and returns its generated ID.
    pub async fn create_product(&self, outlet_id: &str, name: &str) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, outlet_id = %outlet_id, name = %name, "Creating product");

        sqlx::query("INSERT INTO products (id, outlet_id, name, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&id)
            .bind(outlet_id)
            .bind(name)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// Creates a staff member (attendant or manager) and returns the ID.
    pub async fn create_staff(
        &self,
        outlet_id: &str,
        name: &str,
        phone: Option<&str>,
    ) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, outlet_id = %outlet_id, name = %name, "Creating staff member");

        sqlx::query(
            "INSERT INTO staff (id, outlet_id, name, phone, is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        )
        .bind(&id)
        .bind(outlet_id)
        .bind(name)
        .bind(phone)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Creates a dispensing unit (pump) and returns its generated ID.
    pub async fn create_dispensing_unit(&self, outlet_id: &str, name: &str) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, outlet_id = %outlet_id, name = %name, "Creating dispensing unit");

        sqlx::query(
            "INSERT INTO dispensing_units (id, outlet_id, name, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&id)
        .bind(outlet_id)
        .bind(name)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }
}
