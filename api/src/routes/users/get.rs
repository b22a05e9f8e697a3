use axum::{
    Json,
    extract::{Path, State},
};
use db::models::user;
use sea_orm::EntityTrait;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /users
///
/// Lists all users. Password hashes are never serialized.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<user::Model>>>, ApiError> {
    let usuarios = user::Model::list_all(state.db()).await?;
    Ok(Json(ApiResponse::success(usuarios, "Usuarios obtenidos")))
}

/// GET /users/{user_id}
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found` for an unknown id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    let usuario = user::Entity::find_by_id(user_id)
        .one(state.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success(usuario, "Usuario obtenido")))
}
