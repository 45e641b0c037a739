use axum::{middleware, routing::post, Router};
use crate::config::AppState;
use crate::handlers::auth_handler::*;
use crate::middleware::rate_limiter::rate_limit_middleware;

pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/signup/", post(signup_handler))
        .route("/login/", post(login_handler))
        .layer(middleware::from_fn_with_state(state, rate_limit_middleware))
}
