use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::post_model::{AuthorResponse, PostResponse};

#[derive(Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[serde(default, deserialize_with = "crate::utils::validator_utils::trimmed")]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters"))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyResponse {
    pub id: Uuid,
    pub body: String,
    pub author: AuthorResponse,
    pub comment_id: Uuid,
    pub likes_count: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub body: String,
    pub author: AuthorResponse,
    pub post_id: Uuid,
    pub likes_count: u64,
    pub replies: Vec<ReplyResponse>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct PostPageResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Serialize)]
pub struct CommentsFragmentResponse {
    pub comments: Vec<CommentResponse>,
}

#[derive(Serialize)]
pub struct AddCommentResponse {
    pub comment: CommentResponse,
    pub post_id: Uuid,
}

#[derive(Serialize)]
pub struct AddReplyResponse {
    pub reply: ReplyResponse,
    pub comment_id: Uuid,
}

#[derive(Serialize)]
pub struct CommentDeleteResponse {
    pub comment: CommentResponse,
}

#[derive(Serialize)]
pub struct ReplyDeleteResponse {
    pub reply: ReplyResponse,
}

/// State of a like button after a toggle.
#[derive(Debug, Clone, Serialize)]
pub struct LikesFragmentResponse {
    pub id: Uuid,
    pub likes_count: u64,
    pub liked: bool,
    pub is_author: bool,
}
