//! # Domain Types
//!
//! Core domain records used throughout the emissions tracker.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Location     │   │    DailyLog     │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  location_id    │◄──│  daily_log_id   │       │
//! │  │  name (unique)  │   │  date           │   │  vehicle_make   │       │
//! │  └─────────────────┘   │  starting_cash  │   │  service flags  │       │
//! │                        │  closing_cash   │   │  total_amount   │       │
//! │                        │  deposit        │   │  payment_method │       │
//! │                        │  status         │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │   DayStatus     │   │ PaymentMethod   │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  OPEN           │   │  CASH   CC      │                              │
//! │  │  CLOSED         │   │  FLEET  CHECK   │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money columns are stored as integer cents (`*_cents`) with accessor
//! methods returning [`Money`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Location
// =============================================================================

/// A shop. Reference data, created at setup time and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Location {
    pub id: i64,
    /// Human-readable shop identifier, e.g. "Taylorsville".
    pub name: String,
}

// =============================================================================
// Day Status
// =============================================================================

/// Lifecycle of a cash-drawer session.
///
/// ## State Machine
/// ```text
///   start-day            close-day
///  ──────────► OPEN ──────────────► CLOSED (terminal)
///               │ ▲
///               └─┘ add-transaction
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    /// Drawer is open and accepting transactions.
    Open,
    /// Drawer has been counted; no further changes.
    Closed,
}

impl DayStatus {
    /// Returns the stored / wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Open => "OPEN",
            DayStatus::Closed => "CLOSED",
        }
    }

    /// Whether a log in this status may receive new transactions.
    #[inline]
    pub const fn accepts_transactions(&self) -> bool {
        matches!(self, DayStatus::Open)
    }

    /// Applies the close transition.
    ///
    /// `OPEN → CLOSED` succeeds; closing a closed day fails with
    /// [`CoreError::DayClosed`].
    pub fn close(self, log_id: i64) -> CoreResult<DayStatus> {
        match self {
            DayStatus::Open => Ok(DayStatus::Closed),
            DayStatus::Closed => Err(CoreError::DayClosed { log_id }),
        }
    }
}

impl Default for DayStatus {
    fn default() -> Self {
        DayStatus::Open
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a transaction was paid. A transaction has exactly one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash; the only method that lands in the drawer.
    Cash,
    /// Credit card on the shop terminal.
    Cc,
    /// Billed to a fleet account.
    Fleet,
    /// Paper check.
    Check,
}

impl PaymentMethod {
    /// Every accepted method, in display order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Cc,
        PaymentMethod::Fleet,
        PaymentMethod::Check,
    ];

    /// Returns the stored / wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Cc => "CC",
            PaymentMethod::Fleet => "FLEET",
            PaymentMethod::Check => "CHECK",
        }
    }

    /// Whether money paid this way ends up in the cash drawer.
    #[inline]
    pub const fn is_drawer_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `"CASH"`, `"cc"`, `" Fleet "` etc. Anything else is rejected with
/// the list of allowed values.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Daily Log
// =============================================================================

/// One cash-drawer session for one location on one date.
///
/// Nothing prevents several logs for the same location and date; callers
/// keep hold of the id they opened.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DailyLog {
    pub id: i64,
    pub location_id: i64,
    /// Business date the drawer was opened on.
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Cash counted into the drawer at open.
    pub starting_cash_cents: i64,
    /// Cash counted at close (0 while OPEN).
    pub closing_cash_cents: i64,
    /// Cash pulled for the bank deposit at close (0 while OPEN).
    pub deposit_cents: i64,
    pub status: DayStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl DailyLog {
    #[inline]
    pub fn starting_cash(&self) -> Money {
        Money::from_cents(self.starting_cash_cents)
    }

    #[inline]
    pub fn closing_cash(&self) -> Money {
        Money::from_cents(self.closing_cash_cents)
    }

    #[inline]
    pub fn deposit(&self) -> Money {
        Money::from_cents(self.deposit_cents)
    }

    /// Fails with [`CoreError::DayClosed`] unless the log is OPEN.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.status.accepts_transactions() {
            Ok(())
        } else {
            Err(CoreError::DayClosed { log_id: self.id })
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// One vehicle service sale. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: i64,
    pub daily_log_id: i64,

    /// Year / make / model as typed by the cashier.
    pub vehicle_make: String,
    pub vin: Option<String>,
    pub plate: Option<String>,

    // Services performed; any combination may be set.
    pub is_dmv: bool,
    pub is_tsi: bool,
    pub is_safety: bool,
    pub is_renewal: bool,

    /// Emissions certificate number.
    pub emis_cert_num: Option<String>,
    pub dmv_num: Option<String>,

    pub total_amount_cents: i64,
    pub payment_method: PaymentMethod,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the amount charged as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// Raw add-transaction input, exactly as a client submits it.
///
/// Service flags default to `false`; optional strings may be absent or
/// empty (form fields left blank) and both mean "not recorded".
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionDraft {
    pub daily_log_id: i64,
    pub vehicle_make: String,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub is_dmv: bool,
    #[serde(default)]
    pub is_tsi: bool,
    #[serde(default)]
    pub is_safety: bool,
    #[serde(default)]
    pub is_renewal: bool,
    #[serde(default)]
    pub emis_cert_num: Option<String>,
    #[serde(default)]
    pub dmv_num: Option<String>,
    /// Dollars.
    pub total_amount: f64,
    pub payment_method: String,
}

/// A validated transaction ready to be inserted.
///
/// Built by [`crate::validation::validate_new_transaction`]; the store
/// assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub daily_log_id: i64,
    pub vehicle_make: String,
    pub vin: Option<String>,
    pub plate: Option<String>,
    pub is_dmv: bool,
    pub is_tsi: bool,
    pub is_safety: bool,
    pub is_renewal: bool,
    pub emis_cert_num: Option<String>,
    pub dmv_num: Option<String>,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Unit Tests
// =============================================================================
