use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use crate::config::AppState;
use crate::error::AppError;
use crate::models::auth_model::{LoginRequest, SignupRequest, SignupResponse};
use crate::services::auth_service::AuthService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn signup_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<Response, AppError> {
    let user = AuthService::register_user(
        &state.db,
        payload.username,
        payload.email,
        payload.password,
    )
    .await?;

    Ok(ResponseBuilder::created(
        "AUTH_REGISTER_SUCCESS",
        "User registered successfully",
        SignupResponse {
            id: user.public_id,
            username: user.username,
            email: user.email,
        },
    )
    .into_response())
}

pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Response, AppError> {
    let res = AuthService::login_user(&state.db, &state.config, payload.login_id, payload.password).await?;
    Ok(ResponseBuilder::success("AUTH_LOGIN_SUCCESS", "Login successful", res).into_response())
}
