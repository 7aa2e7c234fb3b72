//! # Location Routes
//!
//! Read-only shop listing so clients can map names to ids.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use super::day::DailyLogDto;
use crate::error::ApiResult;
use crate::state::AppState;
use emis_core::{CoreError, Location};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/locations/{location_id}/daily-logs", get(list_daily_logs))
}

async fn list_locations(State(state): State<AppState>) -> ApiResult<Json<Vec<Location>>> {
    let locations = state.db.locations().list().await?;
    Ok(Json(locations))
}

/// A shop's drawer sessions, newest first.
async fn list_daily_logs(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<DailyLogDto>>> {
    let Path(location_id) = path?;

    if state.db.locations().get_by_id(location_id).await?.is_none() {
        return Err(CoreError::LocationNotFound(location_id).into());
    }

    let logs = state.db.daily_logs().list_for_location(location_id).await?;
    Ok(Json(logs.into_iter().map(DailyLogDto::from).collect()))
}
