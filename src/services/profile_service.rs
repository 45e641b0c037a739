use chrono::Utc;
use sea_orm::*;

use crate::entities::{post, post_like, profile, user, user::Entity as User};
use crate::error::AppError;
use crate::models::post_model::PostResponse;
use crate::models::profile_model::{EditProfileRequest, ProfileResponse};
use crate::repositories::user_repository::UserRepository;
use crate::services::like_service::rank_by_likes;
use crate::services::post_service::PostService;

pub const USER_NOT_FOUND: AppError = AppError::NotFound("USER_NOT_FOUND", "User not found");

pub struct ProfileService;

impl ProfileService {
    pub async fn find_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model, AppError> {
        User::find_by_id(user_id).one(db).await?.ok_or(USER_NOT_FOUND)
    }

    pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<user::Model, AppError> {
        UserRepository::find_by_username(db, username)
            .await?
            .ok_or(USER_NOT_FOUND)
    }

    pub async fn get_profile(db: &DatabaseConnection, user: &user::Model) -> Result<ProfileResponse, AppError> {
        let profile = Self::profile_of(db, user).await?;
        Ok(Self::to_response(user, profile))
    }

    /// The user's posts, newest first.
    pub async fn user_posts(db: &DatabaseConnection, user: &user::Model) -> Result<Vec<PostResponse>, AppError> {
        let posts = user
            .find_related(post::Entity)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(db)
            .await?;
        PostService::hydrate(db, posts).await
    }

    /// The user's posts with at least one like, most liked first.
    pub async fn top_posts(db: &DatabaseConnection, user: &user::Model) -> Result<Vec<PostResponse>, AppError> {
        let posts = Self::user_posts(db, user).await?;
        Ok(rank_by_likes(posts, |p| p.likes_count))
    }

    /// Posts the user liked, most recently liked first.
    pub async fn liked_posts(db: &DatabaseConnection, user: &user::Model) -> Result<Vec<PostResponse>, AppError> {
        let rows = post_like::Entity::find()
            .filter(post_like::Column::UserId.eq(user.id))
            .order_by_desc(post_like::Column::CreatedAt)
            .find_also_related(post::Entity)
            .all(db)
            .await?;

        let posts = rows.into_iter().filter_map(|(_, post)| post).collect();
        PostService::hydrate(db, posts).await
    }

    pub async fn update_profile(
        db: &DatabaseConnection,
        user: &user::Model,
        payload: EditProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let current = Self::profile_of(db, user).await?;

        let mut active: profile::ActiveModel = current.into();
        active.display_name = Set(non_blank(payload.display_name));
        active.bio = Set(non_blank(payload.bio));
        active.avatar_url = Set(non_blank(payload.avatar_url));
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;

        tracing::info!("Profile of {} updated", user.username);
        Ok(Self::to_response(user, updated))
    }

    /// Removes the account. Profile, posts, comments, replies and likes go with it.
    pub async fn delete_user(db: &DatabaseConnection, user: user::Model) -> Result<(), AppError> {
        User::delete_by_id(user.id).exec(db).await?;
        tracing::info!("User {} deleted", user.username);
        Ok(())
    }

    async fn profile_of(db: &DatabaseConnection, user: &user::Model) -> Result<profile::Model, AppError> {
        user.find_related(profile::Entity)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("PROFILE_NOT_FOUND", "Profile not found"))
    }

    fn to_response(user: &user::Model, profile: profile::Model) -> ProfileResponse {
        ProfileResponse {
            user_id: user.public_id,
            username: user.username.clone(),
            display_name: profile.display_name,
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            joined_at: user.created_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
