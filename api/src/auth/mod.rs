pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims, ResetClaims};

use chrono::{DateTime, Duration, Utc};
use common::config;
use db::models::user::Rol;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Generates a bearer JWT and its expiry timestamp for a given user.
pub fn generate_jwt(user_id: i64, rol: Rol) -> (String, String) {
    let expiry = Utc::now() + Duration::minutes(config::jwt_duration_minutes());

    let claims = Claims {
        sub: user_id,
        rol,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )
    .expect("Token encoding failed");

    (token, expiry.to_rfc3339())
}

pub fn decode_jwt(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

/// Issues a short-lived single-use password-reset token bound to the user id.
/// The expiry also travels inside the token as its `exp` claim.
pub fn generate_reset_token(user_id: i64, correo: &str) -> (String, DateTime<Utc>) {
    let expiry = Utc::now() + Duration::minutes(config::reset_token_expiry_minutes());

    let claims = ResetClaims {
        sub: user_id,
        correo: correo.to_owned(),
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )
    .expect("Token encoding failed");

    (token, expiry)
}

pub fn decode_reset_token(token: &str) -> Result<ResetClaims, jsonwebtoken::errors::Error> {
    decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}
