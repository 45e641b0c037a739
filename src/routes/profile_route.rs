use axum::{middleware, routing::get, Router};
use crate::config::AppState;
use crate::handlers::profile_handler::*;
use crate::middleware::auth_middleware::require_login;

pub fn profile_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/profile/", get(own_profile_handler))
        .route("/{username}/", get(user_profile_handler));

    let account = Router::new()
        .route("/profile/edit/", get(profile_edit_page_handler).post(profile_edit_handler))
        .route("/profile/onboarding/", get(profile_onboarding_page_handler).post(profile_edit_handler))
        .route("/profile/delete/", get(profile_delete_page_handler).post(profile_delete_handler))
        .route_layer(middleware::from_fn(require_login));

    public.merge(account)
}
