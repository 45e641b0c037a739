use axum::{middleware, routing::post, Router};
use crate::config::AppState;
use crate::entities::{comment, post, reply};
use crate::handlers::like_handler::like_handler;
use crate::middleware::auth_middleware::require_login;

pub fn like_routes() -> Router<AppState> {
    Router::new()
        .route("/post/like/{id}/", post(like_handler::<post::Model>))
        .route("/comment/like/{id}/", post(like_handler::<comment::Model>))
        .route("/reply/like/{id}/", post(like_handler::<reply::Model>))
        .route_layer(middleware::from_fn(require_login))
}
