//! # Day Routes
//!
//! Drawer session lifecycle: start, balance, close, inspect.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /start-day/          {location_id, starting_cash}                 │
//! │       └── {status: "Day Started", log_id}                               │
//! │                                                                         │
//! │  POST /add-transaction/    (see transaction routes)                     │
//! │                                                                         │
//! │  GET  /balance-day/{id}    running totals, any time                     │
//! │                                                                         │
//! │  POST /close-day/{id}      {closing_cash, deposit?}                     │
//! │       └── {status: "Day Closed", over_short, balance, ...}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts cross the wire as dollars (JSON numbers) and are converted to
//! integer cents once, on the way in.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;
use emis_core::validation::{parse_cash_count, validate_close_counts};
use emis_core::{CoreError, DailyLog, DayBalance, DayStatus, ServiceTally};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start-day", post(start_day))
        .route("/start-day/", post(start_day))
        .route("/balance-day/{daily_log_id}", get(balance_day))
        .route("/balance-day/{daily_log_id}/", get(balance_day))
        .route("/close-day/{daily_log_id}", post(close_day))
        .route("/close-day/{daily_log_id}/", post(close_day))
        .route("/daily-logs/{daily_log_id}", get(get_daily_log))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct StartDayRequest {
    pub location_id: i64,
    /// Dollars counted into the drawer.
    pub starting_cash: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartDayResponse {
    pub status: String,
    pub log_id: i64,
}

/// Balance figures in dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub daily_log_id: i64,
    pub starting_cash: f64,
    pub total_sales: f64,
    pub cash_sales: f64,
    pub credit_card_sales: f64,
    pub fleet_sales: f64,
    pub check_sales: f64,
    pub expected_drawer_cash: f64,
    pub transaction_count: u32,
    pub services: ServiceTally,
}

impl From<DayBalance> for BalanceResponse {
    fn from(b: DayBalance) -> Self {
        BalanceResponse {
            daily_log_id: b.daily_log_id,
            starting_cash: b.starting_cash.to_dollars(),
            total_sales: b.total_sales.to_dollars(),
            cash_sales: b.cash_sales.to_dollars(),
            credit_card_sales: b.credit_card_sales.to_dollars(),
            fleet_sales: b.fleet_sales.to_dollars(),
            check_sales: b.check_sales.to_dollars(),
            expected_drawer_cash: b.expected_drawer_cash.to_dollars(),
            transaction_count: b.transaction_count,
            services: b.services,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloseDayRequest {
    /// Dollars counted in the drawer at close.
    pub closing_cash: f64,
    /// Dollars pulled for the bank; defaults to zero.
    #[serde(default)]
    pub deposit: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseDayResponse {
    pub status: String,
    pub log_id: i64,
    pub closing_cash: f64,
    pub deposit: f64,
    /// Positive when the drawer is over, negative when short.
    pub over_short: f64,
    pub closed_at: Option<DateTime<Utc>>,
    pub balance: BalanceResponse,
}

/// Daily log with money in dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLogDto {
    pub id: i64,
    pub location_id: i64,
    pub date: NaiveDate,
    pub starting_cash: f64,
    pub closing_cash: f64,
    pub deposit: f64,
    pub status: DayStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<DailyLog> for DailyLogDto {
    fn from(log: DailyLog) -> Self {
        DailyLogDto {
            id: log.id,
            location_id: log.location_id,
            date: log.date,
            starting_cash: log.starting_cash().to_dollars(),
            closing_cash: log.closing_cash().to_dollars(),
            deposit: log.deposit().to_dollars(),
            status: log.status,
            created_at: log.created_at,
            closed_at: log.closed_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Opens a new drawer session dated today (server local time).
async fn start_day(
    State(state): State<AppState>,
    body: Result<Json<StartDayRequest>, JsonRejection>,
) -> ApiResult<Json<StartDayResponse>> {
    let Json(req) = body?;
    let starting_cash = parse_cash_count("starting_cash", req.starting_cash)?;

    debug!(location_id = req.location_id, %starting_cash, "start-day");

    let log = state
        .db
        .daily_logs()
        .open(req.location_id, starting_cash, Local::now().date_naive())
        .await?;

    Ok(Json(StartDayResponse {
        status: "Day Started".to_string(),
        log_id: log.id,
    }))
}

/// Running totals for one log; valid while OPEN and after close.
async fn balance_day(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<BalanceResponse>> {
    let Path(daily_log_id) = path?;

    let balance = state.db.daily_logs().balance(daily_log_id).await?;
    Ok(Json(balance.into()))
}

async fn close_day(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CloseDayRequest>, JsonRejection>,
) -> ApiResult<Json<CloseDayResponse>> {
    let Path(daily_log_id) = path?;
    let Json(req) = body?;
    let (closing_cash, deposit) = validate_close_counts(req.closing_cash, req.deposit)?;

    debug!(daily_log_id, %closing_cash, %deposit, "close-day");

    let (log, close) = state
        .db
        .daily_logs()
        .close(daily_log_id, closing_cash, deposit)
        .await?;

    Ok(Json(CloseDayResponse {
        status: "Day Closed".to_string(),
        log_id: log.id,
        closing_cash: close.closing_cash.to_dollars(),
        deposit: close.deposit.to_dollars(),
        over_short: close.over_short.to_dollars(),
        closed_at: log.closed_at,
        balance: close.balance.into(),
    }))
}

async fn get_daily_log(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DailyLogDto>> {
    let Path(daily_log_id) = path?;

    let log = state
        .db
        .daily_logs()
        .get_by_id(daily_log_id)
        .await?
        .ok_or(CoreError::DailyLogNotFound(daily_log_id))?;

    Ok(Json(log.into()))
}
