use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use uuid::Uuid;

use crate::config::AppState;
use crate::entities::tag;
use crate::error::AppError;
use crate::models::{auth_model::CurrentUser, comment_model::*, post_model::*};
use crate::services::comment_service::CommentService;
use crate::services::post_service::PostService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::htmx::HxRequest;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn home_handler(
    State(state): State<AppState>,
    Query(params): Query<HomeParams>,
    HxRequest(fragment): HxRequest,
) -> Result<Response, AppError> {
    render_listing(&state, None, params.page.unwrap_or(1), fragment).await
}

pub async fn category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<HomeParams>,
    HxRequest(fragment): HxRequest,
) -> Result<Response, AppError> {
    let tag = PostService::find_tag_by_slug(&state.db, &slug).await?;
    render_listing(&state, Some(tag), params.page.unwrap_or(1), fragment).await
}

async fn render_listing(
    state: &AppState,
    tag: Option<tag::Model>,
    page: i64,
    fragment: bool,
) -> Result<Response, AppError> {
    let (posts, window) = match PostService::list_posts(&state.db, tag.as_ref(), page).await? {
        Some(listing) => listing,
        None => return Ok(ResponseBuilder::empty()),
    };

    if fragment {
        return Ok(ResponseBuilder::view("HOME_POSTS_FRAGMENT", PostsFragmentResponse {
            posts,
            page: window.page,
            next_page: window.next_page,
        }));
    }

    let categories = PostService::list_tags(&state.db).await?;
    Ok(ResponseBuilder::view("HOME_PAGE", HomePageResponse {
        posts,
        tag: tag.map(TagResponse::from),
        categories,
        page: window.page,
        next_page: window.next_page,
    }))
}

pub async fn post_create_page_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let tags = PostService::list_tags(&state.db).await?;
    Ok(ResponseBuilder::view("POST_CREATE_PAGE", PostFormResponse {
        post: None,
        body: String::new(),
        selected_tags: Vec::new(),
        tags,
    }))
}

pub async fn post_create_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> Result<Response, AppError> {
    let tags = PostService::resolve_tags(&state.db, &payload.tags).await?;

    // Nothing is stored unless the photo page yields all three fields
    let photo = match state.photo_source.fetch(&payload.url).await {
        Ok(photo) => photo,
        Err(e) => {
            tracing::warn!("Could not scrape {}: {}", payload.url, e);
            return Ok(Redirect::to("/post/create/").into_response());
        }
    };

    PostService::create_post(&state.db, user.db_id, payload, photo, &tags).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn post_edit_page_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let post = PostService::find_owned(&state.db, id, user.db_id).await?;
    let selected_tags = PostService::selected_tag_ids(&state.db, &post).await?;
    let tags = PostService::list_tags(&state.db).await?;
    let body = post.body.clone();
    let post = PostService::to_response(&state.db, post).await?;

    Ok(ResponseBuilder::view("POST_EDIT_PAGE", PostFormResponse {
        post: Some(post),
        body,
        selected_tags,
        tags,
    }))
}

pub async fn post_edit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<EditPostRequest>,
) -> Result<Response, AppError> {
    let post = PostService::find_owned(&state.db, id, user.db_id).await?;
    let tags = PostService::resolve_tags(&state.db, &payload.tags).await?;

    PostService::update_post(&state.db, post, payload, &tags).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn post_delete_page_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let post = PostService::find_owned(&state.db, id, user.db_id).await?;
    let post = PostService::to_response(&state.db, post).await?;
    Ok(ResponseBuilder::view("POST_DELETE_PAGE", PostDeleteResponse { post }))
}

pub async fn post_delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let post = PostService::find_owned(&state.db, id, user.db_id).await?;
    PostService::delete_post(&state.db, post).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn post_page_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
    HxRequest(fragment): HxRequest,
) -> Result<Response, AppError> {
    let post = PostService::get_post(&state.db, id).await?;

    if fragment {
        let comments = CommentService::comments_for_post(&state.db, &post, params.contains_key("top")).await?;
        return Ok(ResponseBuilder::view("POST_COMMENTS_FRAGMENT", CommentsFragmentResponse { comments }));
    }

    let comments = CommentService::comments_for_post(&state.db, &post, false).await?;
    let post = PostService::to_response(&state.db, post).await?;
    Ok(ResponseBuilder::view("POST_PAGE", PostPageResponse { post, comments }))
}
