//! Health check route.
//!
//! | Path | Method | Response |
//! |------|--------|----------|
//! | /health | GET | `{"status": "ok"}` or 503 `STORE_UNAVAILABLE` |

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    if state.db.health_check().await {
        Ok(Json(HealthResponse {
            status: "ok".to_string(),
        }))
    } else {
        Err(ApiError::unavailable())
    }
}
