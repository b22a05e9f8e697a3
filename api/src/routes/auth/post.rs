use axum::{Json, extract::State, http::StatusCode};
use db::models::user::{self, Rol};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{decode_jwt, decode_reset_token, generate_jwt, generate_reset_token};
use crate::error::ApiError;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[validate(length(min = 1, message = "La identificación es requerida"))]
    pub identificacion: String,
    #[validate(email(message = "El correo es inválido"))]
    pub correo: String,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub password: String,
    pub rol: Option<Rol>,
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: user::Model,
}

/// POST /auth/register
///
/// Registers a new user and issues a bearer token.
///
/// ### Responses
/// - `201 Created` → `{ token, user }` (password never serialized)
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when `correo` or `identificacion` already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), ApiError> {
    req.validate().map_err(|e| ApiError::validation_errors(&e))?;

    // Friendly 409 fast path; the unique indexes remain the authoritative guard.
    let duplicate = user::Model::find_by_correo(state.db(), &req.correo)
        .await?
        .is_some()
        || user::Model::find_by_identificacion(state.db(), &req.identificacion)
            .await?
            .is_some();
    if duplicate {
        return Err(ApiError::Conflict("El usuario ya existe".to_string()));
    }

    let usuario = user::Model::create(
        state.db(),
        &req.nombre,
        &req.apellido,
        &req.identificacion,
        &req.correo,
        &req.password,
        req.rol.unwrap_or(Rol::User),
    )
    .await?;

    let (token, _expiry) = generate_jwt(usuario.id, usuario.rol);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            AuthData { token, user: usuario },
            "Usuario registrado exitosamente",
        )),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/login
///
/// Verifies credentials and issues a bearer token.
///
/// ### Responses
/// - `200 OK` → `{ token, user }`
/// - `401 Unauthorized` on unknown correo or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let usuario = user::Model::find_by_correo(state.db(), &req.correo)
        .await?
        .filter(|u| u.verify_password(&req.password))
        .ok_or_else(|| ApiError::Auth("Credenciales inválidas".to_string()))?;

    let (token, _expiry) = generate_jwt(usuario.id, usuario.rol);

    Ok(Json(ApiResponse::success(
        AuthData { token, user: usuario },
        "Usuario logueado exitosamente",
    )))
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: Option<String>,
}

/// POST /auth/logout
///
/// Stateless logout: the token is checked but not revoked server-side.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` when the token is missing
/// - `401 Unauthorized` when the token is invalid or expired
pub async fn logout(
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let token = req
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::validation("Token requerido"))?;

    decode_jwt(&token).map_err(|_| ApiError::Auth("Token inválido".to_string()))?;

    Ok(Json(ApiResponse::success(
        Empty,
        "Usuario deslogueado exitosamente",
    )))
}

#[derive(Debug, Deserialize)]
pub struct RequestPasswordResetRequest {
    pub correo: Option<String>,
}

/// POST /auth/request-password-reset
///
/// Issues a short-lived reset token, stores it (with its expiry) on the user
/// row, and mails the reset link.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` when `correo` is missing
/// - `404 Not Found` for an unknown correo
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<RequestPasswordResetRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let correo = req
        .correo
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation("El correo es requerido"))?;

    let usuario = user::Model::find_by_correo(state.db(), &correo)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    let (token, expiry) = generate_reset_token(usuario.id, &correo);
    usuario
        .store_reset_token(state.db(), &token, expiry)
        .await?;

    state
        .mailer()
        .send_password_reset(&correo, &token)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        Empty,
        "Email de recuperación enviado",
    )))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// POST /auth/reset-password
///
/// The presented token must decode (its embedded expiry is enforced) and match
/// the stored token verbatim; on success the password is re-hashed and the
/// stored token and expiry are cleared.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` on missing fields or an invalid/mismatched token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let (token, new_password) = match (req.token, req.new_password) {
        (Some(t), Some(p)) if !t.is_empty() && !p.is_empty() => (t, p),
        _ => return Err(ApiError::validation("Token y contraseña son requeridos")),
    };

    let claims = decode_reset_token(&token)
        .map_err(|_| ApiError::validation("Token inválido o expirado"))?;

    let usuario = user::Entity::find_by_id(claims.sub)
        .one(state.db())
        .await?
        .filter(|u| u.reset_token.as_deref() == Some(token.as_str()))
        .ok_or_else(|| ApiError::validation("Token inválido o expirado"))?;

    usuario.reset_password(state.db(), &new_password).await?;

    Ok(Json(ApiResponse::success(
        Empty,
        "Contraseña actualizada exitosamente",
    )))
}
