use axum::{middleware, routing::{get, post}, Router};
use crate::config::AppState;
use crate::handlers::comment_handler::*;
use crate::middleware::auth_middleware::require_login;

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/commentsent/{id}/", post(comment_sent_handler))
        .route("/reply-sent/{id}/", post(reply_sent_handler))
        .route("/comment/delete/{id}/", get(comment_delete_page_handler).post(comment_delete_handler))
        .route("/reply/delete/{id}/", get(reply_delete_page_handler).post(reply_delete_handler))
        .route_layer(middleware::from_fn(require_login))
}
