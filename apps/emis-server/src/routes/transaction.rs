//! # Transaction Routes
//!
//! Recording and listing vehicle service sales.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;
use emis_core::validation::validate_new_transaction;
use emis_core::{CoreError, PaymentMethod, Transaction, TransactionDraft};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-transaction", post(add_transaction))
        .route("/add-transaction/", post(add_transaction))
        .route("/daily-logs/{daily_log_id}/transactions", get(list_for_log))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTransactionResponse {
    pub status: String,
    pub transaction_id: i64,
}

/// Transaction with the amount in dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDto {
    pub id: i64,
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
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        TransactionDto {
            total_amount: tx.total_amount().to_dollars(),
            id: tx.id,
            daily_log_id: tx.daily_log_id,
            vehicle_make: tx.vehicle_make,
            vin: tx.vin,
            plate: tx.plate,
            is_dmv: tx.is_dmv,
            is_tsi: tx.is_tsi,
            is_safety: tx.is_safety,
            is_renewal: tx.is_renewal,
            emis_cert_num: tx.emis_cert_num,
            dmv_num: tx.dmv_num,
            payment_method: tx.payment_method,
            created_at: tx.created_at,
        }
    }
}

/// Records one sale against an OPEN daily log.
///
/// The draft is fully validated before the store is touched; a rejected
/// request leaves nothing behind.
async fn add_transaction(
    State(state): State<AppState>,
    body: Result<Json<TransactionDraft>, JsonRejection>,
) -> ApiResult<Json<AddTransactionResponse>> {
    let Json(draft) = body?;
    let new = validate_new_transaction(&draft)?;

    debug!(
        daily_log_id = new.daily_log_id,
        amount = %new.total_amount,
        method = %new.payment_method,
        "add-transaction"
    );

    let tx = state.db.transactions().insert(&new).await?;

    Ok(Json(AddTransactionResponse {
        status: "Saved".to_string(),
        transaction_id: tx.id,
    }))
}

async fn list_for_log(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<TransactionDto>>> {
    let Path(daily_log_id) = path?;

    if state.db.daily_logs().get_by_id(daily_log_id).await?.is_none() {
        return Err(CoreError::DailyLogNotFound(daily_log_id).into());
    }

    let transactions = state.db.transactions().list_for_log(daily_log_id).await?;
    Ok(Json(transactions.into_iter().map(TransactionDto::from).collect()))
}
