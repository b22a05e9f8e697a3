//! Routes for the `/users` endpoint group.
//!
//! All routes require an authenticated, active account (guard applied where
//! the group is nested):
//! - `GET /users` → `list_users`
//! - `GET /users/{user_id}` → `get_user`
//! - `PUT /users/{user_id}` → `update_user`
//! - `DELETE /users/{user_id}` → `delete_user`
//! - `PATCH /users/{user_id}/estado` → `toggle_user_estado`

pub mod delete;
pub mod get;
pub mod put;

use axum::{
    Router,
    routing::{delete, get, patch, put},
};

use crate::state::AppState;
use delete::delete_user;
use get::{get_user, list_users};
use put::{toggle_user_estado, update_user};

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{user_id}", get(get_user))
        .route("/{user_id}", put(update_user))
        .route("/{user_id}", delete(delete_user))
        .route("/{user_id}/estado", patch(toggle_user_estado))
}
