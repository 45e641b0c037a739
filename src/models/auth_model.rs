use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "crate::utils::validator_utils::trimmed")]
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters"))]
    #[validate(custom(function = "crate::utils::validator_utils::validate_username"))]
    pub username: String,

    #[serde(default, deserialize_with = "crate::utils::validator_utils::trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "crate::utils::validator_utils::trimmed")]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    pub login_id: String, // Email OR Username

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_expires_at: usize,
    pub type_: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// The authenticated requester, injected by the session middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid, // Public ID
    #[serde(skip)]
    pub db_id: i64,
    pub username: String,
}
