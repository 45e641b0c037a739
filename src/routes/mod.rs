use crate::config::AppState;
use crate::handlers::health_check_handler;
use crate::middleware::auth_middleware::session_middleware;
use axum::http::Method;
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth_route;
pub mod comment_route;
pub mod like_route;
pub mod post_route;
pub mod profile_route;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/accounts", auth_route::auth_routes(state.clone()))
        .merge(post_route::post_routes(state.clone()))
        .merge(comment_route::comment_routes())
        .merge(like_route::like_routes())
        .merge(profile_route::profile_routes())
        .route("/health", get(health_check_handler))
        .layer(middleware::from_fn_with_state(state, session_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
