//! Like toggling shared by posts, comments and replies.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

use crate::entities::{comment, comment_like, post, post_like, reply, reply_like};
use crate::error::AppError;
use crate::models::comment_model::LikesFragmentResponse;

/// An entity users can like. Implemented per model so that [`toggle_like`]
/// stays generic over which one is being liked.
#[async_trait]
pub trait Likeable: Sized + Send + Sync + 'static {
    /// Error returned when the target does not exist.
    const NOT_FOUND: AppError;
    /// View code of the like button fragment.
    const FRAGMENT: &'static str;

    async fn find_by_public_id(db: &DatabaseConnection, public_id: Uuid) -> Result<Option<Self>, DbErr>;

    fn public_id(&self) -> Uuid;
    fn author_id(&self) -> i64;

    async fn is_liked_by(&self, db: &DatabaseConnection, user_id: i64) -> Result<bool, DbErr>;
    /// Idempotent: a like that already exists is left alone.
    async fn add_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr>;
    async fn remove_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr>;
    async fn like_count(&self, db: &DatabaseConnection) -> Result<u64, DbErr>;
}

/// Adds or removes the user's like. Authors cannot like their own content:
/// for them the state is left as is and still reported back.
pub async fn toggle_like<T: Likeable>(
    db: &DatabaseConnection,
    public_id: Uuid,
    user_id: i64,
) -> Result<LikesFragmentResponse, AppError> {
    let target = T::find_by_public_id(db, public_id).await?.ok_or(T::NOT_FOUND)?;

    let already_liked = target.is_liked_by(db, user_id).await?;
    let is_author = target.author_id() == user_id;

    let liked = if is_author {
        already_liked
    } else if already_liked {
        target.remove_like(db, user_id).await?;
        false
    } else {
        target.add_like(db, user_id).await?;
        true
    };

    Ok(LikesFragmentResponse {
        id: target.public_id(),
        likes_count: target.like_count(db).await?,
        liked,
        is_author,
    })
}

/// Keeps items with at least one like, most liked first. Ties keep their input order.
pub fn rank_by_likes<T, F>(items: Vec<T>, likes: F) -> Vec<T>
where
    F: Fn(&T) -> u64,
{
    let mut ranked: Vec<T> = items.into_iter().filter(|item| likes(item) > 0).collect();
    ranked.sort_by(|a, b| likes(b).cmp(&likes(a)));
    ranked
}

#[async_trait]
impl Likeable for post::Model {
    const NOT_FOUND: AppError = AppError::NotFound("POST_NOT_FOUND", "Post not found");
    const FRAGMENT: &'static str = "POST_LIKES_FRAGMENT";

    async fn find_by_public_id(db: &DatabaseConnection, public_id: Uuid) -> Result<Option<Self>, DbErr> {
        post::Entity::find()
            .filter(post::Column::PublicId.eq(public_id))
            .one(db)
            .await
    }

    fn public_id(&self) -> Uuid {
        self.public_id
    }

    fn author_id(&self) -> i64 {
        self.author_id
    }

    async fn is_liked_by(&self, db: &DatabaseConnection, user_id: i64) -> Result<bool, DbErr> {
        let found = post_like::Entity::find_by_id((self.id, user_id)).one(db).await?;
        Ok(found.is_some())
    }

    async fn add_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr> {
        let like = post_like::ActiveModel {
            post_id: Set(self.id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        };
        post_like::Entity::insert(like)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    async fn remove_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr> {
        post_like::Entity::delete_by_id((self.id, user_id)).exec(db).await?;
        Ok(())
    }

    async fn like_count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        post_like::Entity::find()
            .filter(post_like::Column::PostId.eq(self.id))
            .count(db)
            .await
    }
}

#[async_trait]
impl Likeable for comment::Model {
    const NOT_FOUND: AppError = AppError::NotFound("COMMENT_NOT_FOUND", "Comment not found");
    const FRAGMENT: &'static str = "COMMENT_LIKES_FRAGMENT";

    async fn find_by_public_id(db: &DatabaseConnection, public_id: Uuid) -> Result<Option<Self>, DbErr> {
        comment::Entity::find()
            .filter(comment::Column::PublicId.eq(public_id))
            .one(db)
            .await
    }

    fn public_id(&self) -> Uuid {
        self.public_id
    }

    fn author_id(&self) -> i64 {
        self.author_id
    }

    async fn is_liked_by(&self, db: &DatabaseConnection, user_id: i64) -> Result<bool, DbErr> {
        let found = comment_like::Entity::find_by_id((self.id, user_id)).one(db).await?;
        Ok(found.is_some())
    }

    async fn add_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr> {
        let like = comment_like::ActiveModel {
            comment_id: Set(self.id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        };
        comment_like::Entity::insert(like)
            .on_conflict(
                OnConflict::columns([comment_like::Column::CommentId, comment_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    async fn remove_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr> {
        comment_like::Entity::delete_by_id((self.id, user_id)).exec(db).await?;
        Ok(())
    }

    async fn like_count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        comment_like::Entity::find()
            .filter(comment_like::Column::CommentId.eq(self.id))
            .count(db)
            .await
    }
}

#[async_trait]
impl Likeable for reply::Model {
    const NOT_FOUND: AppError = AppError::NotFound("REPLY_NOT_FOUND", "Reply not found");
    const FRAGMENT: &'static str = "REPLY_LIKES_FRAGMENT";

    async fn find_by_public_id(db: &DatabaseConnection, public_id: Uuid) -> Result<Option<Self>, DbErr> {
        reply::Entity::find()
            .filter(reply::Column::PublicId.eq(public_id))
            .one(db)
            .await
    }

    fn public_id(&self) -> Uuid {
        self.public_id
    }

    fn author_id(&self) -> i64 {
        self.author_id
    }

    async fn is_liked_by(&self, db: &DatabaseConnection, user_id: i64) -> Result<bool, DbErr> {
        let found = reply_like::Entity::find_by_id((self.id, user_id)).one(db).await?;
        Ok(found.is_some())
    }

    async fn add_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr> {
        let like = reply_like::ActiveModel {
            reply_id: Set(self.id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        };
        reply_like::Entity::insert(like)
            .on_conflict(
                OnConflict::columns([reply_like::Column::ReplyId, reply_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    async fn remove_like(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr> {
        reply_like::Entity::delete_by_id((self.id, user_id)).exec(db).await?;
        Ok(())
    }

    async fn like_count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        reply_like::Entity::find()
            .filter(reply_like::Column::ReplyId.eq(self.id))
            .count(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_drops_unliked_and_orders_by_count() {
        let items = vec![("a", 1), ("b", 0), ("c", 5), ("d", 1), ("e", 3)];
        let ranked = rank_by_likes(items, |(_, n)| *n);
        let names: Vec<&str> = ranked.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["c", "e", "a", "d"]);
    }

    #[test]
    fn ranking_nothing_liked_is_empty() {
        let ranked = rank_by_likes(vec![0u64, 0, 0], |n| *n);
        assert!(ranked.is_empty());
    }
}
