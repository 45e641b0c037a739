use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entities::{comment, comment_like, post, reply, reply_like};
use crate::error::AppError;
use crate::models::comment_model::*;
use crate::services::like_service::rank_by_likes;
use crate::services::post_service::{PostService, POST_NOT_FOUND};

pub const COMMENT_NOT_FOUND: AppError = AppError::NotFound("COMMENT_NOT_FOUND", "Comment not found");
pub const REPLY_NOT_FOUND: AppError = AppError::NotFound("REPLY_NOT_FOUND", "Reply not found");

pub struct CommentService;

impl CommentService {
    /// Comments of a post, oldest first. With `top` only liked comments, most liked first.
    pub async fn comments_for_post(
        db: &DatabaseConnection,
        post: &post::Model,
        top: bool,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let comments = comment::Entity::find()
            .filter(comment::Column::ParentPostId.eq(post.id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(db)
            .await?;

        let data = Self::hydrate(db, comments).await?;
        Ok(if top { rank_by_likes(data, |c| c.likes_count) } else { data })
    }

    /// A user's comments with at least one like, most liked first.
    pub async fn top_comments_by_author(
        db: &DatabaseConnection,
        author_id: i64,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let comments = comment::Entity::find()
            .filter(comment::Column::AuthorId.eq(author_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(db)
            .await?;

        let data = Self::hydrate(db, comments).await?;
        Ok(rank_by_likes(data, |c| c.likes_count))
    }

    pub async fn create_comment(
        db: &DatabaseConnection,
        post: &post::Model,
        author_id: i64,
        body: String,
    ) -> Result<comment::Model, AppError> {
        let saved = comment::ActiveModel {
            id: NotSet,
            public_id: Set(Uuid::now_v7()),
            body: Set(body),
            author_id: Set(author_id),
            parent_post_id: Set(post.id),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(saved)
    }

    pub async fn create_reply(
        db: &DatabaseConnection,
        parent: &comment::Model,
        author_id: i64,
        body: String,
    ) -> Result<reply::Model, AppError> {
        let saved = reply::ActiveModel {
            id: NotSet,
            public_id: Set(Uuid::now_v7()),
            body: Set(body),
            author_id: Set(author_id),
            parent_comment_id: Set(parent.id),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(saved)
    }

    pub async fn get_comment(db: &DatabaseConnection, public_id: Uuid) -> Result<comment::Model, AppError> {
        comment::Entity::find()
            .filter(comment::Column::PublicId.eq(public_id))
            .one(db)
            .await?
            .ok_or(COMMENT_NOT_FOUND)
    }

    pub async fn find_owned_comment(
        db: &DatabaseConnection,
        public_id: Uuid,
        user_id: i64,
    ) -> Result<comment::Model, AppError> {
        comment::Entity::find()
            .filter(comment::Column::PublicId.eq(public_id))
            .filter(comment::Column::AuthorId.eq(user_id))
            .one(db)
            .await?
            .ok_or(COMMENT_NOT_FOUND)
    }

    pub async fn find_owned_reply(
        db: &DatabaseConnection,
        public_id: Uuid,
        user_id: i64,
    ) -> Result<reply::Model, AppError> {
        reply::Entity::find()
            .filter(reply::Column::PublicId.eq(public_id))
            .filter(reply::Column::AuthorId.eq(user_id))
            .one(db)
            .await?
            .ok_or(REPLY_NOT_FOUND)
    }

    /// Deletes the comment (and, by cascade, its replies). Returns the parent post.
    pub async fn delete_comment(db: &DatabaseConnection, comment: comment::Model) -> Result<post::Model, AppError> {
        let parent = Self::parent_post(db, &comment).await?;
        comment::Entity::delete_by_id(comment.id).exec(db).await?;
        tracing::info!("Comment {} deleted", comment.public_id);
        Ok(parent)
    }

    /// Deletes the reply. Returns the post the reply thread belongs to.
    pub async fn delete_reply(db: &DatabaseConnection, reply: reply::Model) -> Result<post::Model, AppError> {
        let parent = comment::Entity::find_by_id(reply.parent_comment_id)
            .one(db)
            .await?
            .ok_or(COMMENT_NOT_FOUND)?;
        let post = Self::parent_post(db, &parent).await?;

        reply::Entity::delete_by_id(reply.id).exec(db).await?;
        tracing::info!("Reply {} deleted", reply.public_id);
        Ok(post)
    }

    pub async fn parent_post(db: &DatabaseConnection, comment: &comment::Model) -> Result<post::Model, AppError> {
        post::Entity::find_by_id(comment.parent_post_id)
            .one(db)
            .await?
            .ok_or(POST_NOT_FOUND)
    }

    pub async fn comment_response(db: &DatabaseConnection, comment: comment::Model) -> Result<CommentResponse, AppError> {
        let mut data = Self::hydrate(db, vec![comment]).await?;
        data.pop().ok_or_else(|| AppError::Internal("Comment vanished while loading".to_string()))
    }

    pub async fn reply_response(db: &DatabaseConnection, reply: reply::Model) -> Result<ReplyResponse, AppError> {
        let mut data = Self::hydrate_replies(db, vec![reply], HashMap::new()).await?;
        data.pop().ok_or_else(|| AppError::Internal("Reply vanished while loading".to_string()))
    }

    /// Attaches author, parent post id, like count and replies to each comment.
    async fn hydrate(db: &DatabaseConnection, comments: Vec<comment::Model>) -> Result<Vec<CommentResponse>, AppError> {
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = comments.iter().map(|c| c.id).collect();
        let authors = PostService::authors_by_id(db, comments.iter().map(|c| c.author_id)).await?;
        let likes = PostService::counts_by::<comment_like::Entity>(db, comment_like::Column::CommentId, &ids).await?;

        let post_ids: HashSet<i64> = comments.iter().map(|c| c.parent_post_id).collect();
        let posts: HashMap<i64, Uuid> = post::Entity::find()
            .filter(post::Column::Id.is_in(post_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.public_id))
            .collect();

        let replies = reply::Entity::find()
            .filter(reply::Column::ParentCommentId.is_in(ids.iter().copied()))
            .order_by_asc(reply::Column::CreatedAt)
            .order_by_asc(reply::Column::Id)
            .all(db)
            .await?;
        let reply_parents: Vec<i64> = replies.iter().map(|r| r.parent_comment_id).collect();
        let parents = comments.iter().map(|c| (c.id, c.public_id)).collect();
        let mut replies_by_comment: HashMap<i64, Vec<ReplyResponse>> = HashMap::new();
        for (parent, reply) in reply_parents.into_iter().zip(Self::hydrate_replies(db, replies, parents).await?) {
            replies_by_comment.entry(parent).or_default().push(reply);
        }

        let mut data = Vec::with_capacity(comments.len());
        for comment in comments {
            let post_id = *posts.get(&comment.parent_post_id).ok_or(POST_NOT_FOUND)?;
            let author = authors
                .get(&comment.author_id)
                .cloned()
                .ok_or_else(|| AppError::Internal(format!("Comment {} has no author", comment.public_id)))?;

            data.push(CommentResponse {
                id: comment.public_id,
                body: comment.body,
                author,
                post_id,
                likes_count: likes.get(&comment.id).copied().unwrap_or(0),
                replies: replies_by_comment.remove(&comment.id).unwrap_or_default(),
                created_at: comment.created_at,
            });
        }

        Ok(data)
    }

    /// `parents` maps comment ids to public ids; parents not in it are looked up.
    async fn hydrate_replies(
        db: &DatabaseConnection,
        replies: Vec<reply::Model>,
        mut parents: HashMap<i64, Uuid>,
    ) -> Result<Vec<ReplyResponse>, AppError> {
        if replies.is_empty() {
            return Ok(Vec::new());
        }

        let missing: HashSet<i64> = replies
            .iter()
            .map(|r| r.parent_comment_id)
            .filter(|id| !parents.contains_key(id))
            .collect();
        if !missing.is_empty() {
            let found = comment::Entity::find()
                .filter(comment::Column::Id.is_in(missing))
                .all(db)
                .await?;
            parents.extend(found.into_iter().map(|c| (c.id, c.public_id)));
        }

        let ids: Vec<i64> = replies.iter().map(|r| r.id).collect();
        let authors = PostService::authors_by_id(db, replies.iter().map(|r| r.author_id)).await?;
        let likes = PostService::counts_by::<reply_like::Entity>(db, reply_like::Column::ReplyId, &ids).await?;

        let mut data = Vec::with_capacity(replies.len());
        for reply in replies {
            let comment_id = *parents.get(&reply.parent_comment_id).ok_or(COMMENT_NOT_FOUND)?;
            let author = authors
                .get(&reply.author_id)
                .cloned()
                .ok_or_else(|| AppError::Internal(format!("Reply {} has no author", reply.public_id)))?;

            data.push(ReplyResponse {
                id: reply.public_id,
                body: reply.body,
                author,
                comment_id,
                likes_count: likes.get(&reply.id).copied().unwrap_or(0),
                created_at: reply.created_at,
            });
        }

        Ok(data)
    }
}
