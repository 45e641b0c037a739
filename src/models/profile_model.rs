use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{comment_model::CommentResponse, post_model::PostResponse};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct ProfilePageResponse {
    pub profile: ProfileResponse,
    pub posts: Vec<PostResponse>,
}

#[derive(Serialize)]
pub struct ProfilePostsFragmentResponse {
    pub posts: Vec<PostResponse>,
}

#[derive(Serialize)]
pub struct ProfileCommentsFragmentResponse {
    pub comments: Vec<CommentResponse>,
}

/// Alternate fragment views of a profile, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    TopPosts,
    TopComments,
    LikedPosts,
    Posts,
}

impl ProfileTab {
    pub fn from_flags<F: Fn(&str) -> bool>(has: F) -> Self {
        if has("top-posts") {
            ProfileTab::TopPosts
        } else if has("top-comments") {
            ProfileTab::TopComments
        } else if has("liked-posts") {
            ProfileTab::LikedPosts
        } else {
            ProfileTab::Posts
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct EditProfileRequest {
    #[validate(length(max = 20, message = "Ensure this value has at most 20 characters"))]
    pub display_name: Option<String>,

    pub bio: Option<String>,

    #[validate(url(message = "Enter a valid URL"))]
    pub avatar_url: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileFormResponse {
    pub profile: ProfileResponse,
    pub onboarding: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_precedence_is_fixed() {
        let all = |_: &str| true;
        assert_eq!(ProfileTab::from_flags(all), ProfileTab::TopPosts);

        let comments_and_likes = |k: &str| k == "top-comments" || k == "liked-posts";
        assert_eq!(ProfileTab::from_flags(comments_and_likes), ProfileTab::TopComments);

        assert_eq!(ProfileTab::from_flags(|k| k == "liked-posts"), ProfileTab::LikedPosts);
        assert_eq!(ProfileTab::from_flags(|_| false), ProfileTab::Posts);
    }
}
