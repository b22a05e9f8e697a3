use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use db::models::user::{self, Estado, Rol};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub identificacion: Option<String>,
    #[validate(email(message = "El correo es inválido"))]
    pub correo: Option<String>,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub password: Option<String>,
    pub rol: Option<Rol>,
    pub estado: Option<Estado>,
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// PUT /users/{user_id}
///
/// Partial update: absent or empty fields never overwrite stored values. A
/// supplied password is re-hashed before persistence.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` on validation failure
/// - `404 Not Found` for an unknown id
/// - `409 Conflict` when the new correo or identificacion is taken
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    req.validate().map_err(|e| ApiError::validation_errors(&e))?;

    let usuario = user::Entity::find_by_id(user_id)
        .one(state.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    let correo = present(req.correo);
    if let Some(nuevo) = &correo {
        if *nuevo != usuario.correo
            && user::Model::find_by_correo(state.db(), nuevo).await?.is_some()
        {
            return Err(ApiError::Conflict("El correo ya está en uso".to_string()));
        }
    }

    let identificacion = present(req.identificacion);
    if let Some(nueva) = &identificacion {
        if *nueva != usuario.identificacion
            && user::Model::find_by_identificacion(state.db(), nueva)
                .await?
                .is_some()
        {
            return Err(ApiError::Conflict(
                "La identificación ya está en uso".to_string(),
            ));
        }
    }

    let mut active = usuario.into_active_model();
    if let Some(nombre) = present(req.nombre) {
        active.nombre = Set(nombre);
    }
    if let Some(apellido) = present(req.apellido) {
        active.apellido = Set(apellido);
    }
    if let Some(identificacion) = identificacion {
        active.identificacion = Set(identificacion);
    }
    if let Some(correo) = correo {
        active.correo = Set(correo);
    }
    if let Some(password) = present(req.password) {
        active.password_hash = Set(user::Model::hash_password(&password)?);
    }
    if let Some(rol) = req.rol {
        active.rol = Set(rol);
    }
    if let Some(estado) = req.estado {
        active.estado = Set(estado);
    }
    active.updated_at = Set(Utc::now());

    let actualizado = active.update(state.db()).await?;

    Ok(Json(ApiResponse::success(
        actualizado,
        "Usuario actualizado exitosamente",
    )))
}

/// PATCH /users/{user_id}/estado
///
/// Flips the user's estado between `activo` and `inactivo`.
pub async fn toggle_user_estado(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    let usuario = user::Entity::find_by_id(user_id)
        .one(state.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    let actualizado = usuario.toggle_estado(state.db()).await?;
    let mensaje = match actualizado.estado {
        Estado::Activo => "Usuario activado exitosamente",
        Estado::Inactivo => "Usuario inactivado exitosamente",
    };

    Ok(Json(ApiResponse::success(actualizado, mensaje)))
}
