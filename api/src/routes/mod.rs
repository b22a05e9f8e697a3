//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/auth` → registration, login, password recovery (public)
//! - `/users` → user management (authenticated users)
//! - `/piscinas` → pool CRUD (reads authenticated, mutations admin-only)

use axum::{Router, middleware::from_fn_with_state};

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    auth::auth_routes, health::health_routes, piscinas::piscinas_routes, users::users_routes,
};
use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod piscinas;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest(
            "/users",
            users_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest("/piscinas", piscinas_routes(app_state.clone()))
        .with_state(app_state)
}
