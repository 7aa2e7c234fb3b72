//! # emis-core: Pure Business Logic for the Emissions Tracker
//!
//! Domain types and the end-of-day Balancing Engine, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Emissions Tracker Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Client Surface (any UI)                      │   │
//! │  │    Open Drawer ──► New Transaction ──► Live Balance ──► Close   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    emis-server (Session API)                    │   │
//! │  │    start-day, add-transaction, balance-day, close-day           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ emis-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  balance  │  │ validation│  │   │
//! │  │   │ DailyLog  │  │   Money   │  │ DayBalance│  │   rules   │  │   │
//! │  │   │Transaction│  │  (cents)  │  │ DayClose  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    emis-db (Record Store)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Location, DailyLog, Transaction) and enums
//! - [`money`] - Money type with integer cents arithmetic
//! - [`balance`] - The Balancing Engine (drawer totals and over/short)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use emis_core::money::Money;
//!
//! // Amounts arrive from clients as dollars and are held as cents
//! let fee = Money::from_dollars(40.0).unwrap();
//! assert_eq!(fee.cents(), 4000);
//! assert_eq!(fee.to_string(), "$40.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use balance::{balance_day, reconcile, DayBalance, DayClose, ServiceTally};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest absolute amount accepted for a single money field, in cents.
///
/// $1,000,000.00 is far above any drawer or vehicle fee and keeps every
/// day total comfortably inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;

/// Maximum length of the vehicle description (year/make/model).
pub const MAX_VEHICLE_LEN: usize = 100;

/// A full VIN is 17 characters; shops often record only the last 8.
pub const MAX_VIN_LEN: usize = 17;

/// Maximum license plate length.
pub const MAX_PLATE_LEN: usize = 10;

/// Maximum length of an emissions certificate or DMV number.
pub const MAX_CERT_LEN: usize = 50;

/// Maximum length of a location name.
pub const MAX_LOCATION_NAME_LEN: usize = 100;
