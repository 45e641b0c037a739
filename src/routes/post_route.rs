use axum::{middleware, routing::{get, post}, Router};
use crate::config::AppState;
use crate::handlers::post_handler::*;
use crate::middleware::{auth_middleware::require_login, rate_limiter::rate_limit_middleware};

pub fn post_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(home_handler))
        .route("/category/{slug}/", get(category_handler))
        .route("/post/{id}/", get(post_page_handler));

    let owner = Router::new()
        .route(
            "/post/create/",
            get(post_create_page_handler).merge(
                post(post_create_handler).layer(middleware::from_fn_with_state(state, rate_limit_middleware)),
            ),
        )
        .route("/post/edit/{id}/", get(post_edit_page_handler).post(post_edit_handler))
        .route("/post/delete/{id}/", get(post_delete_page_handler).post(post_delete_handler))
        .route_layer(middleware::from_fn(require_login));

    public.merge(owner)
}
