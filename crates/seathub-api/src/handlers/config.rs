//! Budget and pool administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use seathub_core::error::AppError;
use seathub_core::types::status::PoolStatus;

use crate::dto::request::BudgetConfigRequest;
use crate::dto::response::BudgetListResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /config/budget
pub async fn get_budget(State(state): State<AppState>) -> Json<BudgetListResponse> {
    Json(BudgetListResponse {
        tools: state.ledger.status_all().await,
    })
}

/// PUT /config/budget
pub async fn update_budget(
    State(state): State<AppState>,
    Json(req): Json<BudgetConfigRequest>,
) -> Result<Json<PoolStatus>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let status = state.ledger.update_budget(&req.into_seed()).await?;
    Ok(Json(status))
}

/// POST /config/pools
pub async fn provision_pool(
    State(state): State<AppState>,
    Json(req): Json<BudgetConfigRequest>,
) -> Result<Json<PoolStatus>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let status = state.ledger.provision(&req.into_seed()).await?;
    Ok(Json(status))
}

/// DELETE /config/pools/{tool}
pub async fn deactivate_pool(
    State(state): State<AppState>,
    Path(tool): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.ledger.deactivate(&tool).await?;
    Ok(Json(serde_json::json!({ "status": "ok", "tool": tool })))
}
