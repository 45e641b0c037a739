use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use uuid::Uuid;

use crate::config::AppState;
use crate::error::AppError;
use crate::models::{auth_model::CurrentUser, comment_model::*};
use crate::services::comment_service::CommentService;
use crate::services::post_service::PostService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn comment_sent_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(post_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> Result<Response, AppError> {
    let post = PostService::get_post(&state.db, post_id).await?;
    let comment = CommentService::create_comment(&state.db, &post, user.db_id, payload.body).await?;
    let comment = CommentService::comment_response(&state.db, comment).await?;

    Ok(ResponseBuilder::success(
        "ADD_COMMENT_FRAGMENT",
        "Comment added",
        AddCommentResponse { comment, post_id: post.public_id },
    )
    .into_response())
}

pub async fn reply_sent_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(comment_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> Result<Response, AppError> {
    let parent = CommentService::get_comment(&state.db, comment_id).await?;
    let reply = CommentService::create_reply(&state.db, &parent, user.db_id, payload.body).await?;
    let reply = CommentService::reply_response(&state.db, reply).await?;

    Ok(ResponseBuilder::success(
        "ADD_REPLY_FRAGMENT",
        "Reply added",
        AddReplyResponse { reply, comment_id: parent.public_id },
    )
    .into_response())
}

pub async fn comment_delete_page_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let comment = CommentService::find_owned_comment(&state.db, id, user.db_id).await?;
    let comment = CommentService::comment_response(&state.db, comment).await?;
    Ok(ResponseBuilder::view("COMMENT_DELETE_PAGE", CommentDeleteResponse { comment }))
}

pub async fn comment_delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let comment = CommentService::find_owned_comment(&state.db, id, user.db_id).await?;
    let post = CommentService::delete_comment(&state.db, comment).await?;
    Ok(Redirect::to(&format!("/post/{}/", post.public_id)).into_response())
}

pub async fn reply_delete_page_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let reply = CommentService::find_owned_reply(&state.db, id, user.db_id).await?;
    let reply = CommentService::reply_response(&state.db, reply).await?;
    Ok(ResponseBuilder::view("REPLY_DELETE_PAGE", ReplyDeleteResponse { reply }))
}

pub async fn reply_delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let reply = CommentService::find_owned_reply(&state.db, id, user.db_id).await?;
    let post = CommentService::delete_reply(&state.db, reply).await?;
    Ok(Redirect::to(&format!("/post/{}/", post.public_id)).into_response())
}
