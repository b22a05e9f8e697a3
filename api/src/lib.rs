pub mod auth;
pub mod error;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
