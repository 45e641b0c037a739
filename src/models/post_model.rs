use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::tag;

#[derive(Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(url(message = "Enter a valid URL"))]
    pub url: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub tags: Vec<Uuid>, // Tag Public IDs
}

#[derive(Deserialize, Validate)]
pub struct EditPostRequest {
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub tags: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<tag::Model> for TagResponse {
    fn from(t: tag::Model) -> Self {
        TagResponse {
            id: t.public_id,
            name: t.name,
            slug: t.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub url: String,
    pub image: String,
    pub title: String,
    pub artist: String,
    pub body: String,
    pub author: AuthorResponse,
    pub tags: Vec<TagResponse>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct HomePageResponse {
    pub posts: Vec<PostResponse>,
    pub tag: Option<TagResponse>,
    pub categories: Vec<TagResponse>,
    pub page: u64,
    pub next_page: Option<u64>,
}

#[derive(Serialize)]
pub struct PostsFragmentResponse {
    pub posts: Vec<PostResponse>,
    pub page: u64,
    pub next_page: Option<u64>,
}

/// Context for the create and edit forms.
#[derive(Serialize)]
pub struct PostFormResponse {
    pub post: Option<PostResponse>,
    pub body: String,
    pub selected_tags: Vec<Uuid>,
    pub tags: Vec<TagResponse>,
}

#[derive(Serialize)]
pub struct PostDeleteResponse {
    pub post: PostResponse,
}
