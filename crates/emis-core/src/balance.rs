//! # Balancing Engine
//!
//! End-of-day drawer math: sales totals by payment method and the cash the
//! drawer should hold.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transactions of ONE daily log                                          │
//! │                                                                         │
//! │   CASH ──┬──────────────► cash_sales ──┐                                │
//! │   CC   ──┼──► credit_card_sales        │                                │
//! │   FLEET ─┼──► fleet_sales              ▼                                │
//! │   CHECK ─┼──► check_sales    starting_cash + cash_sales                 │
//! │          │                        = expected_drawer_cash               │
//! │          └──► total_sales (every method)                                │
//! │                                                                         │
//! │  At close:  over_short = closing_cash - expected_drawer_cash            │
//! │             (> 0 drawer over, < 0 drawer short)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! FLEET and CHECK are part of the day's sales but never sit in the drawer
//! as cash, so they do not touch `expected_drawer_cash`.
//!
//! Every call recomputes from the records it is given; nothing is cached.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DailyLog, PaymentMethod, Transaction};

// =============================================================================
// Results
// =============================================================================

/// How many transactions included each service. A transaction with several
/// flags counts once under each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceTally {
    pub dmv: u32,
    pub tsi: u32,
    pub safety: u32,
    pub renewal: u32,
}

/// Snapshot aggregate for one daily log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DayBalance {
    pub daily_log_id: i64,
    pub starting_cash: Money,
    pub total_sales: Money,
    pub cash_sales: Money,
    pub credit_card_sales: Money,
    pub fleet_sales: Money,
    pub check_sales: Money,
    pub expected_drawer_cash: Money,
    pub transaction_count: u32,
    pub services: ServiceTally,
}

/// Balance plus the counted close-out figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DayClose {
    pub balance: DayBalance,
    pub closing_cash: Money,
    pub deposit: Money,
    /// `closing_cash - expected_drawer_cash`.
    pub over_short: Money,
}

// =============================================================================
// Engine
// =============================================================================

/// Computes the balance of `log` from its transactions.
///
/// Transactions whose `daily_log_id` is not `log.id` are skipped, so a
/// caller handing over a mixed set still gets only this day's figures.
/// Zero transactions yield zero sums and `expected_drawer_cash ==
/// starting_cash`.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, Utc};
/// use emis_core::{balance_day, DailyLog, DayStatus, Money, PaymentMethod, Transaction};
///
/// let log = DailyLog {
///     id: 7,
///     location_id: 1,
///     date: NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
///     starting_cash_cents: 10_000,
///     closing_cash_cents: 0,
///     deposit_cents: 0,
///     status: DayStatus::Open,
///     created_at: Utc::now(),
///     closed_at: None,
/// };
///
/// let balance = balance_day(&log, &[]);
/// assert!(balance.total_sales.is_zero());
/// assert_eq!(balance.expected_drawer_cash, Money::from_cents(10_000));
/// ```
pub fn balance_day(log: &DailyLog, transactions: &[Transaction]) -> DayBalance {
    let mut balance = DayBalance {
        daily_log_id: log.id,
        starting_cash: log.starting_cash(),
        total_sales: Money::zero(),
        cash_sales: Money::zero(),
        credit_card_sales: Money::zero(),
        fleet_sales: Money::zero(),
        check_sales: Money::zero(),
        expected_drawer_cash: log.starting_cash(),
        transaction_count: 0,
        services: ServiceTally::default(),
    };

    for tx in transactions.iter().filter(|tx| tx.daily_log_id == log.id) {
        let amount = tx.total_amount();

        balance.total_sales += amount;
        match tx.payment_method {
            PaymentMethod::Cash => balance.cash_sales += amount,
            PaymentMethod::Cc => balance.credit_card_sales += amount,
            PaymentMethod::Fleet => balance.fleet_sales += amount,
            PaymentMethod::Check => balance.check_sales += amount,
        }
        if tx.payment_method.is_drawer_cash() {
            balance.expected_drawer_cash += amount;
        }

        balance.transaction_count += 1;
        balance.services.dmv += u32::from(tx.is_dmv);
        balance.services.tsi += u32::from(tx.is_tsi);
        balance.services.safety += u32::from(tx.is_safety);
        balance.services.renewal += u32::from(tx.is_renewal);
    }

    balance
}

/// Compares the counted drawer against the expected cash.
pub fn reconcile(balance: DayBalance, closing_cash: Money, deposit: Money) -> DayClose {
    DayClose {
        balance,
        closing_cash,
        deposit,
        over_short: closing_cash - balance.expected_drawer_cash,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
