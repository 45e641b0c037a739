use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension,
};

use crate::config::AppState;
use crate::entities::user;
use crate::error::AppError;
use crate::models::{auth_model::CurrentUser, profile_model::*};
use crate::services::comment_service::CommentService;
use crate::services::profile_service::{ProfileService, USER_NOT_FOUND};
use crate::utils::api_response::ResponseBuilder;
use crate::utils::htmx::HxRequest;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn own_profile_handler(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
    Query(params): Query<HashMap<String, String>>,
    HxRequest(fragment): HxRequest,
) -> Result<Response, AppError> {
    let Extension(current) = current.ok_or(USER_NOT_FOUND)?;
    let user = ProfileService::find_user(&state.db, current.db_id).await?;
    render_profile(&state, user, &params, fragment).await
}

pub async fn user_profile_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    HxRequest(fragment): HxRequest,
) -> Result<Response, AppError> {
    let user = ProfileService::find_by_username(&state.db, &username).await?;
    render_profile(&state, user, &params, fragment).await
}

async fn render_profile(
    state: &AppState,
    user: user::Model,
    params: &HashMap<String, String>,
    fragment: bool,
) -> Result<Response, AppError> {
    if fragment {
        let posts = match ProfileTab::from_flags(|key| params.contains_key(key)) {
            ProfileTab::TopPosts => ProfileService::top_posts(&state.db, &user).await?,
            ProfileTab::TopComments => {
                let comments = CommentService::top_comments_by_author(&state.db, user.id).await?;
                return Ok(ResponseBuilder::view("PROFILE_COMMENTS_FRAGMENT", ProfileCommentsFragmentResponse { comments }));
            }
            ProfileTab::LikedPosts => ProfileService::liked_posts(&state.db, &user).await?,
            ProfileTab::Posts => ProfileService::user_posts(&state.db, &user).await?,
        };
        return Ok(ResponseBuilder::view("PROFILE_POSTS_FRAGMENT", ProfilePostsFragmentResponse { posts }));
    }

    let profile = ProfileService::get_profile(&state.db, &user).await?;
    let posts = ProfileService::user_posts(&state.db, &user).await?;
    Ok(ResponseBuilder::view("PROFILE_PAGE", ProfilePageResponse { profile, posts }))
}

pub async fn profile_edit_page_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    render_profile_form(&state, &current, false).await
}

pub async fn profile_onboarding_page_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    render_profile_form(&state, &current, true).await
}

async fn render_profile_form(state: &AppState, current: &CurrentUser, onboarding: bool) -> Result<Response, AppError> {
    let user = ProfileService::find_user(&state.db, current.db_id).await?;
    let profile = ProfileService::get_profile(&state.db, &user).await?;
    let code = if onboarding { "PROFILE_ONBOARDING_PAGE" } else { "PROFILE_EDIT_PAGE" };
    Ok(ResponseBuilder::view(code, ProfileFormResponse { profile, onboarding }))
}

pub async fn profile_edit_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<EditProfileRequest>,
) -> Result<Response, AppError> {
    let user = ProfileService::find_user(&state.db, current.db_id).await?;
    ProfileService::update_profile(&state.db, &user, payload).await?;
    Ok(Redirect::to("/profile/").into_response())
}

pub async fn profile_delete_page_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    let user = ProfileService::find_user(&state.db, current.db_id).await?;
    let profile = ProfileService::get_profile(&state.db, &user).await?;
    Ok(ResponseBuilder::view("PROFILE_DELETE_PAGE", ProfileFormResponse { profile, onboarding: false }))
}

pub async fn profile_delete_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    let user = ProfileService::find_user(&state.db, current.db_id).await?;
    ProfileService::delete_user(&state.db, user).await?;
    Ok(Redirect::to("/").into_response())
}
