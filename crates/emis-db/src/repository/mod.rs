//! # Repository Module
//!
//! Database repository implementations for the emissions tracker.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.daily_logs().close(7, closing, deposit)                    │
//! │       ▼                                                                 │
//! │  DailyLogRepository                                                     │
//! │  ├── open / get_by_id / list_for_location                              │
//! │  ├── balance (read snapshot)                                           │
//! │  └── close   (guarded OPEN → CLOSED)                                   │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarded Writes
//! Every write that depends on a parent row (a log needs its location, a
//! transaction needs an OPEN log) checks that row inside the same SQL
//! statement, so a concurrent close can never let a transaction slip into
//! a closed day.
//!
//! ## Available Repositories
//!
//! - [`LocationRepository`] - Shop reference data
//! - [`DailyLogRepository`] - Drawer sessions, balancing and close-out
//! - [`TransactionRepository`] - Vehicle service sales
//!
//! [`LocationRepository`]: location::LocationRepository
//! [`DailyLogRepository`]: daily_log::DailyLogRepository
//! [`TransactionRepository`]: transaction::TransactionRepository

pub mod daily_log;
pub mod location;
pub mod transaction;
