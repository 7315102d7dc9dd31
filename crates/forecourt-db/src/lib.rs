//! # Forecourt Database Layer
//!
//! SQLite persistence and read-path engines for Forecourt.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        forecourt-db                                     │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────────────────────────────────────┐   │
//! │  │   Database    │──►│  Repositories (facts + reference data)       │   │
//! │  │  (pool.rs)    │   │  outlet / tank / stock_entry / reading /     │   │
//! │  └──────────────┘   │  shift                                        │   │
//! │         │            └──────────────────────────────────────────────┘   │
//! │         │            ┌──────────────────────────────────────────────┐   │
//! │         └───────────►│  Engines (derived views, computed on read)   │   │
//! │                      │  StockEngine / SalesEngine                   │   │
//! │                      └──────────────────────────────────────────────┘   │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                      pure arithmetic in forecourt-core                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use forecourt_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./forecourt.db")).await?;
//!
//! let stock = db.stock_engine().current_stock("tank-uuid", None).await?;
//! let sales = db.sales_engine().shift_sales("outlet-uuid", None).await?;
//! ```

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// Re-export main types
pub use engine::sales::SalesEngine;
pub use engine::stock::StockEngine;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Re-export the domain crate for downstream convenience
pub use forecourt_core as core;
