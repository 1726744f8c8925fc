/// Authentication middleware for Axum
///
/// Validates the `Authorization: Bearer <token>` header and adds a
/// [`CurrentUser`] to the request extensions. Handlers extract it with
/// Axum's `Extension` extractor; the admin save path uses its username
/// for audit stamping.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use cadre_core::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// The authenticated user of the current request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID from the token's `sub` claim
    pub id: Uuid,

    /// Username recorded in audit columns
    pub username: String,
}

/// Error type for authentication middleware
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a bearer token
    #[error("Invalid authorization header format: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::InvalidToken(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// Authenticates a request and forwards it with [`CurrentUser`] attached
///
/// Wrap this with `axum::middleware::from_fn_with_state` to supply the JWT
/// secret from application state.
///
/// # Errors
///
/// Returns 401 for missing or invalid tokens and 400 for a malformed
/// Authorization header.
pub async fn authenticate(
    secret: &str,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&req)?;
    let claims = validate_token(token, secret)?;

    req.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Result<&str, AuthError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid UTF-8".to_string()))?;

    header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected 'Bearer <token>'".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_missing_header() {
        let req = request_with_auth(None);
        assert!(matches!(
            bearer_token(&req),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_non_bearer_header() {
        let req = request_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(
            bearer_token(&req),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_bearer_token_extracted() {
        let req = request_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }
}
