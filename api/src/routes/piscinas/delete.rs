use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use db::models::piscina::Model as PiscinaModel;

use crate::error::ApiError;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;

/// DELETE /api/piscinas/{piscina_id}
///
/// Removes a pool. Admin only; stored file URLs are left untouched.
pub async fn delete_piscina(
    State(state): State<AppState>,
    Path(piscina_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let eliminada = PiscinaModel::delete_by_id(state.db(), piscina_id).await?;
    if !eliminada {
        return Err(ApiError::NotFound("Piscina no encontrada".to_string()));
    }
    Ok(Json(ApiResponse::<Empty>::success(
        Empty,
        "Piscina eliminada exitosamente",
    )))
}
