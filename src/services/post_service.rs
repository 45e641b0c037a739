use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::entities::{comment, post, post::Entity as Post, post_like, post_tag, tag, user};
use crate::error::AppError;
use crate::models::post_model::*;
use crate::services::scraper_service::ScrapedPhoto;
use crate::utils::pagination::{resolve_page, PageWindow, POSTS_PER_PAGE};

pub const POST_NOT_FOUND: AppError = AppError::NotFound("POST_NOT_FOUND", "Post not found");

pub struct PostService;

impl PostService {
    /// One page of posts, newest first, optionally restricted to a tag.
    ///
    /// Returns `Ok(None)` when the page number is out of range.
    pub async fn list_posts(
        db: &DatabaseConnection,
        tag: Option<&tag::Model>,
        page: i64,
    ) -> Result<Option<(Vec<PostResponse>, PageWindow)>, AppError> {
        let query = match tag {
            Some(t) => t.find_related(Post),
            None => Post::find(),
        }
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id);

        let paginator = query.paginate(db, POSTS_PER_PAGE);
        let num_pages = paginator.num_pages().await?;

        let window = match resolve_page(page, num_pages) {
            Some(w) => w,
            None => return Ok(None),
        };

        let posts = paginator.fetch_page(window.index()).await?;
        Ok(Some((Self::hydrate(db, posts).await?, window)))
    }

    pub async fn get_post(db: &DatabaseConnection, public_id: Uuid) -> Result<post::Model, AppError> {
        Post::find()
            .filter(post::Column::PublicId.eq(public_id))
            .one(db)
            .await?
            .ok_or(POST_NOT_FOUND)
    }

    /// Ownership-filtered lookup: a post that exists but belongs to someone else is "not found".
    pub async fn find_owned(
        db: &DatabaseConnection,
        public_id: Uuid,
        user_id: i64,
    ) -> Result<post::Model, AppError> {
        Post::find()
            .filter(post::Column::PublicId.eq(public_id))
            .filter(post::Column::AuthorId.eq(user_id))
            .one(db)
            .await?
            .ok_or(POST_NOT_FOUND)
    }

    pub async fn create_post(
        db: &DatabaseConnection,
        author_id: i64,
        payload: CreatePostRequest,
        photo: ScrapedPhoto,
        tags: &[tag::Model],
    ) -> Result<post::Model, AppError> {
        let txn = db.begin().await?;

        let saved = post::ActiveModel {
            id: NotSet,
            public_id: Set(Uuid::now_v7()),
            url: Set(payload.url),
            image: Set(photo.image),
            title: Set(photo.title),
            artist: Set(photo.artist),
            body: Set(payload.body),
            author_id: Set(author_id),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        Self::link_tags(&txn, saved.id, tags).await?;
        txn.commit().await?;

        tracing::info!("Post {} created by user {}", saved.public_id, author_id);
        Ok(saved)
    }

    /// Only the caption and the tag set are editable.
    pub async fn update_post(
        db: &DatabaseConnection,
        post: post::Model,
        payload: EditPostRequest,
        tags: &[tag::Model],
    ) -> Result<post::Model, AppError> {
        let txn = db.begin().await?;

        let mut active: post::ActiveModel = post.into();
        active.body = Set(payload.body);
        let updated = active.update(&txn).await?;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(updated.id))
            .exec(&txn)
            .await?;
        Self::link_tags(&txn, updated.id, tags).await?;

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn delete_post(db: &DatabaseConnection, post: post::Model) -> Result<(), AppError> {
        Post::delete_by_id(post.id).exec(db).await?;
        tracing::info!("Post {} deleted", post.public_id);
        Ok(())
    }

    pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<TagResponse>, AppError> {
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Order)
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await?;
        Ok(tags.into_iter().map(TagResponse::from).collect())
    }

    pub async fn find_tag_by_slug(db: &DatabaseConnection, slug: &str) -> Result<tag::Model, AppError> {
        tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(db)
            .await?
            .ok_or(AppError::NotFound("TAG_NOT_FOUND", "Category not found"))
    }

    /// Looks up the selected tags; any unknown id is a validation error on `tags`.
    pub async fn resolve_tags(db: &DatabaseConnection, ids: &[Uuid]) -> Result<Vec<tag::Model>, AppError> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let found = tag::Entity::find()
            .filter(tag::Column::PublicId.is_in(wanted.iter().copied()))
            .all(db)
            .await?;

        if found.len() != wanted.len() {
            return Err(AppError::field("tags", "invalid_choice", "Select a valid choice"));
        }
        Ok(found)
    }

    pub async fn selected_tag_ids(db: &DatabaseConnection, post: &post::Model) -> Result<Vec<Uuid>, AppError> {
        let tags = post.find_related(tag::Entity).all(db).await?;
        Ok(tags.into_iter().map(|t| t.public_id).collect())
    }

    pub async fn to_response(db: &DatabaseConnection, post: post::Model) -> Result<PostResponse, AppError> {
        let mut data = Self::hydrate(db, vec![post]).await?;
        data.pop().ok_or_else(|| AppError::Internal("Post vanished while loading".to_string()))
    }

    /// Attaches author, tags and counters to each post, keeping order.
    /// Runs a fixed number of queries however many posts there are.
    pub async fn hydrate(db: &DatabaseConnection, posts: Vec<post::Model>) -> Result<Vec<PostResponse>, AppError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let authors = Self::authors_by_id(db, posts.iter().map(|p| p.author_id)).await?;
        let mut tags = Self::tags_by_post(db, &ids).await?;
        let likes = Self::counts_by::<post_like::Entity>(db, post_like::Column::PostId, &ids).await?;
        let comments = Self::counts_by::<comment::Entity>(db, comment::Column::ParentPostId, &ids).await?;

        let mut data = Vec::with_capacity(posts.len());
        for post in posts {
            let author = authors
                .get(&post.author_id)
                .cloned()
                .ok_or_else(|| AppError::Internal(format!("Post {} has no author", post.public_id)))?;

            data.push(PostResponse {
                id: post.public_id,
                url: post.url,
                image: post.image,
                title: post.title,
                artist: post.artist,
                body: post.body,
                author,
                tags: tags.remove(&post.id).unwrap_or_default(),
                likes_count: likes.get(&post.id).copied().unwrap_or(0),
                comments_count: comments.get(&post.id).copied().unwrap_or(0),
                created_at: post.created_at,
            });
        }

        Ok(data)
    }

    /// Number of `E` rows per value of `column`, restricted to `keys`.
    /// Keys without rows are absent from the map.
    pub async fn counts_by<E: EntityTrait>(
        db: &DatabaseConnection,
        column: E::Column,
        keys: &[i64],
    ) -> Result<HashMap<i64, u64>, DbErr> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = E::find()
            .select_only()
            .column(column)
            .column_as(Expr::col(column).count(), "count")
            .filter(column.is_in(keys.iter().copied()))
            .group_by(column)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows.into_iter().map(|(key, n)| (key, n as u64)).collect())
    }

    /// Categories of each post in display order.
    async fn tags_by_post(db: &DatabaseConnection, ids: &[i64]) -> Result<HashMap<i64, Vec<TagResponse>>, DbErr> {
        let links = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(ids.iter().copied()))
            .find_also_related(tag::Entity)
            .order_by_asc(tag::Column::Order)
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?;

        let mut grouped: HashMap<i64, Vec<TagResponse>> = HashMap::new();
        for (link, tag) in links {
            if let Some(tag) = tag {
                grouped.entry(link.post_id).or_default().push(TagResponse::from(tag));
            }
        }
        Ok(grouped)
    }

    pub async fn authors_by_id(
        db: &DatabaseConnection,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<HashMap<i64, AuthorResponse>, DbErr> {
        let ids: HashSet<i64> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(db)
            .await?;

        Ok(users
            .into_iter()
            .map(|u| (u.id, AuthorResponse { id: u.public_id, username: u.username }))
            .collect())
    }

    async fn link_tags(txn: &DatabaseTransaction, post_id: i64, tags: &[tag::Model]) -> Result<(), DbErr> {
        for tag in tags {
            post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(tag.id),
            }
            .insert(txn)
            .await?;
        }
        Ok(())
    }
}
