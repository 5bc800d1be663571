//! Borrow, return, status, and listing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use seathub_core::error::AppError;
use seathub_core::types::id::BorrowId;
use seathub_core::types::record::BorrowRecord;
use seathub_core::types::status::PoolStatus;

use crate::dto::request::{BorrowListQuery, BorrowRequest, ChargeListQuery, ReturnRequest};
use crate::dto::response::{BorrowResponse, ChargeListResponse, ReturnResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /licenses/borrow
pub async fn borrow(
    State(state): State<AppState>,
    Json(req): Json<BorrowRequest>,
) -> Result<Json<BorrowResponse>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let grant = state.ledger.borrow(&req.tool, &req.user).await?;

    Ok(Json(BorrowResponse {
        id: grant.id.to_string(),
        tool: grant.tool,
        user: grant.user,
        borrowed_at: grant.borrowed_at,
        is_overage: grant.is_overage,
    }))
}

/// POST /licenses/return
pub async fn return_license(
    State(state): State<AppState>,
    Json(req): Json<ReturnRequest>,
) -> Result<Json<ReturnResponse>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    // A malformed id cannot reference an outstanding borrow.
    let id: BorrowId = req
        .id
        .parse()
        .map_err(|_| AppError::not_found("Borrow record not found"))?;

    let receipt = state.ledger.return_borrow(id).await?;

    Ok(Json(ReturnResponse {
        status: "ok".to_string(),
        tool: receipt.tool,
    }))
}

/// GET /licenses/{tool}/status
pub async fn status(
    State(state): State<AppState>,
    Path(tool): Path<String>,
) -> Result<Json<PoolStatus>, ApiError> {
    let status = state.ledger.status(&tool).await?;
    Ok(Json(status))
}

/// GET /licenses/status
pub async fn status_all(State(state): State<AppState>) -> Json<Vec<PoolStatus>> {
    Json(state.ledger.status_all().await)
}

/// GET /borrows
pub async fn list_borrows(
    State(state): State<AppState>,
    Query(query): Query<BorrowListQuery>,
) -> Json<Vec<BorrowRecord>> {
    Json(state.ledger.outstanding(query.user.as_deref()))
}

/// GET /overage-charges
pub async fn list_overage_charges(
    State(state): State<AppState>,
    Query(query): Query<ChargeListQuery>,
) -> Result<Json<ChargeListResponse>, ApiError> {
    let charges = state.ledger.overage_charges(query.tool.as_deref()).await?;
    Ok(Json(ChargeListResponse { charges }))
}
