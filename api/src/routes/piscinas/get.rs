use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use db::models::piscina::Model as PiscinaModel;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/piscinas
///
/// Lists every registered pool. Requires authentication.
pub async fn list_piscinas(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let piscinas = PiscinaModel::find_all(state.db()).await?;
    Ok(Json(ApiResponse::success(
        piscinas,
        "Piscinas obtenidas exitosamente",
    )))
}

/// GET /api/piscinas/{piscina_id}
pub async fn get_piscina(
    State(state): State<AppState>,
    Path(piscina_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let piscina = PiscinaModel::find_by_id(state.db(), piscina_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Piscina no encontrada".to_string()))?;
    Ok(Json(ApiResponse::success(
        piscina,
        "Piscina obtenida exitosamente",
    )))
}
