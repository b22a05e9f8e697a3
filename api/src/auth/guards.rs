//! Route-group access guards.
//!
//! Both guards resolve the bearer token to a live user record: the referenced
//! user must still exist (404) and must be `activo` (403). `allow_admin`
//! additionally requires the ADMIN role. The resolved `Model` is inserted into
//! request extensions for handlers that want it.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use db::models::user::{self, Estado, Rol};
use sea_orm::EntityTrait;

use crate::auth::claims::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

async fn resolve_active_user(
    state: &AppState,
    req: Request<Body>,
) -> Result<(Request<Body>, user::Model), ApiError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &()).await?;

    let usuario = user::Entity::find_by_id(auth_user.0.sub)
        .one(state.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    if usuario.estado == Estado::Inactivo {
        return Err(ApiError::Forbidden("Usuario inactivo".to_string()));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(auth_user);
    req.extensions_mut().insert(usuario.clone());
    Ok((req, usuario))
}

/// Guard for endpoints that only require an authenticated, active account.
pub async fn allow_authenticated(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let (req, _usuario) = resolve_active_user(&state, req).await?;
    Ok(next.run(req).await)
}

/// Guard for endpoints restricted to the ADMIN role.
pub async fn allow_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let (req, usuario) = resolve_active_user(&state, req).await?;

    if usuario.rol != Rol::Admin {
        return Err(ApiError::Forbidden(format!(
            "El rol {} no tiene permiso para esta acción",
            usuario.rol
        )));
    }

    Ok(next.run(req).await)
}
