use axum::{
    Json,
    extract::{Path, State},
};
use db::models::user;
use sea_orm::EntityTrait;

use crate::error::ApiError;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;

/// DELETE /users/{user_id}
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found` for an unknown id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let res = user::Entity::delete_by_id(user_id).exec(state.db()).await?;
    if res.rows_affected == 0 {
        return Err(ApiError::NotFound("Usuario no encontrado".to_string()));
    }

    Ok(Json(ApiResponse::success(
        Empty,
        "Usuario eliminado exitosamente",
    )))
}
