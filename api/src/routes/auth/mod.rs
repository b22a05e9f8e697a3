//! Routes for the `/auth` endpoint group.
//!
//! - `POST /auth/register` → `register`
//! - `POST /auth/login` → `login`
//! - `POST /auth/logout` → `logout`
//! - `POST /auth/request-password-reset` → `request_password_reset`
//! - `POST /auth/reset-password` → `reset_password`

pub mod post;

use axum::{Router, routing::post};

use crate::state::AppState;
use post::{login, logout, register, request_password_reset, reset_password};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password))
}
