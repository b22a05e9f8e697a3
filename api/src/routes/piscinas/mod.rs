//! Pool route group.
//!
//! Reads require any authenticated, active user; writes require the ADMIN
//! role. Create and update accept `multipart/form-data` and share the
//! reconciliation pipeline in [`common`].

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post as axum_post, put as axum_put},
    Router,
};

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::state::AppState;

use delete::delete_piscina;
use get::{get_piscina, list_piscinas};
use post::create_piscina;
use put::update_piscina;

// Whole-request cap; the per-file 5 MB cap is enforced in the form collector.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn piscinas_routes(app_state: AppState) -> Router<AppState> {
    let lectura = Router::new()
        .route("/", get(list_piscinas))
        .route("/{piscina_id}", get(get_piscina))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            allow_authenticated,
        ));

    let escritura = Router::new()
        .route("/", axum_post(create_piscina))
        .route("/{piscina_id}", axum_put(update_piscina).delete(delete_piscina))
        .route_layer(from_fn_with_state(app_state, allow_admin))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    lectura.merge(escritura)
}
