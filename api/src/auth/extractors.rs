use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::auth::claims::AuthUser;
use crate::auth::decode_jwt;
use crate::error::ApiError;

/// Extracts an `AuthUser` from the `Authorization: Bearer ...` header.
///
/// The JWT is verified against the configured secret; a missing or malformed
/// header, or an invalid/expired token, rejects the request with 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Auth("Missing or invalid Authorization header".to_string())
                })?;

        let claims = decode_jwt(bearer.token())
            .map_err(|_| ApiError::Auth("Invalid or expired token".to_string()))?;

        Ok(AuthUser(claims))
    }
}
