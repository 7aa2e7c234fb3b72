//! # emis-db: Database Layer for the Emissions Tracker
//!
//! SQLite storage for locations, daily logs and transactions, using sqlx
//! for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Emissions Tracker Data Flow                         │
//! │                                                                         │
//! │  HTTP handler (POST /add-transaction)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     emis-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ LocationRepo   │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ DailyLogRepo   │    │              │  │   │
//! │  │   │               │    │ TransactionRepo│    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (emis.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use emis_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("emis.db")).await?;
//!
//! let shop = db.locations().ensure("Taylorsville").await?;
//! let log = db.daily_logs().open(shop.id, Money::from_cents(10_000), today).await?;
//! let balance = db.daily_logs().balance(log.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::daily_log::DailyLogRepository;
pub use repository::location::LocationRepository;
pub use repository::transaction::TransactionRepository;
