//! # Routes
//!
//! | Path | Method | Module |
//! |------|--------|--------|
//! | /start-day/ | POST | [`day`] |
//! | /balance-day/{id} | GET | [`day`] |
//! | /close-day/{id} | POST | [`day`] |
//! | /daily-logs/{id} | GET | [`day`] |
//! | /add-transaction/ | POST | [`transaction`] |
//! | /daily-logs/{id}/transactions | GET | [`transaction`] |
//! | /locations | GET | [`location`] |
//! | /locations/{id}/daily-logs | GET | [`location`] |
//! | /health | GET | [`health`] |
//!
//! The three session endpoints answer with and without the trailing slash.

use axum::Router;

use crate::state::AppState;

pub mod day;
pub mod health;
pub mod location;
pub mod transaction;

/// All routes, before state is attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(day::router())
        .merge(transaction::router())
        .merge(location::router())
        .merge(health::router())
}
