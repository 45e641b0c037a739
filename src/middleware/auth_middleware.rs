use crate::config::AppState;
use crate::models::auth_model::CurrentUser;
use crate::repositories::user_repository::UserRepository;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::jwt_utils::JwtUtils;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;

/// Resolves the bearer token, if any, into a [`CurrentUser`] extension.
///
/// Requests without an `Authorization` header pass through as anonymous.
/// A header that is present but unusable is rejected with 401.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // 1. Get Token from Header
    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(header) => header,
        None => return next.run(req).await,
    };

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => {
            return unauthorized("AUTH_INVALID_FORMAT", "Invalid Authorization header format");
        }
    };

    let token = match auth_str.strip_prefix("Bearer ") {
        Some(token) => token,
        None => {
            return unauthorized(
                "AUTH_INVALID_SCHEME",
                "Invalid token format. Missing 'Bearer ' prefix",
            );
        }
    };

    // 2. Validate JWT
    let claims = match JwtUtils::validate_jwt(&state.config, token) {
        Ok(claims) => claims,
        Err(e) => {
            let (code, message) = match e.kind() {
                ErrorKind::ExpiredSignature => ("TOKEN_EXPIRED", "Token has expired"),
                ErrorKind::InvalidToken => ("TOKEN_INVALID", "Token is invalid"),
                ErrorKind::InvalidSignature => ("TOKEN_BAD_SIGNATURE", "Invalid token signature"),
                _ => ("AUTH_FAILED", "Authentication failed"),
            };
            return unauthorized(code, message);
        }
    };

    // 3. The account must still exist
    let user = match UserRepository::find_by_public_id(&state.db, claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized("AUTH_USER_GONE", "User no longer exists"),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            return ResponseBuilder::error::<()>(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DB_ERR",
                "Database error",
            )
            .into_response();
        }
    };

    // 4. Inject CurrentUser into request
    req.extensions_mut().insert(CurrentUser {
        id: user.public_id,
        db_id: user.id,
        username: user.username,
    });

    next.run(req).await
}

/// Rejects anonymous requests. Layered on login-required routes after [`session_middleware`].
pub async fn require_login(req: Request<Body>, next: Next) -> Response {
    if req.extensions().get::<CurrentUser>().is_none() {
        return unauthorized("AUTH_MISSING", "Authorization header is missing");
    }
    next.run(req).await
}

fn unauthorized(code: &str, message: &str) -> Response {
    ResponseBuilder::error::<()>(StatusCode::UNAUTHORIZED, code, message).into_response()
}
