use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_users_table::Users;
use crate::m20240301_000002_create_post_tables::Posts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Comments on posts
        manager.create_table(
            Table::create()
                .table(Comments::Table)
                .if_not_exists()
                .col(ColumnDef::new(Comments::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Comments::PublicId).uuid().not_null().unique_key())
                .col(ColumnDef::new(Comments::Body).string_len(150).not_null())
                .col(ColumnDef::new(Comments::AuthorId).big_integer().not_null())
                .col(ColumnDef::new(Comments::ParentPostId).big_integer().not_null())
                .col(ColumnDef::new(Comments::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_comments_author_id")
                        .from(Comments::Table, Comments::AuthorId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_comments_parent_post_id")
                        .from(Comments::Table, Comments::ParentPostId)
                        .to(Posts::Table, Posts::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        // 2. Replies on comments
        manager.create_table(
            Table::create()
                .table(Replies::Table)
                .if_not_exists()
                .col(ColumnDef::new(Replies::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Replies::PublicId).uuid().not_null().unique_key())
                .col(ColumnDef::new(Replies::Body).string_len(150).not_null())
                .col(ColumnDef::new(Replies::AuthorId).big_integer().not_null())
                .col(ColumnDef::new(Replies::ParentCommentId).big_integer().not_null())
                .col(ColumnDef::new(Replies::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_replies_author_id")
                        .from(Replies::Table, Replies::AuthorId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_replies_parent_comment_id")
                        .from(Replies::Table, Replies::ParentCommentId)
                        .to(Comments::Table, Comments::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        // 3. Like tables
        manager.create_table(
            Table::create()
                .table(CommentLikes::Table)
                .if_not_exists()
                .col(ColumnDef::new(CommentLikes::CommentId).big_integer().not_null())
                .col(ColumnDef::new(CommentLikes::UserId).big_integer().not_null())
                .col(ColumnDef::new(CommentLikes::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .primary_key(Index::create().col(CommentLikes::CommentId).col(CommentLikes::UserId))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_comment_likes_comment_id")
                        .from(CommentLikes::Table, CommentLikes::CommentId)
                        .to(Comments::Table, Comments::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_comment_likes_user_id")
                        .from(CommentLikes::Table, CommentLikes::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        manager.create_table(
            Table::create()
                .table(ReplyLikes::Table)
                .if_not_exists()
                .col(ColumnDef::new(ReplyLikes::ReplyId).big_integer().not_null())
                .col(ColumnDef::new(ReplyLikes::UserId).big_integer().not_null())
                .col(ColumnDef::new(ReplyLikes::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .primary_key(Index::create().col(ReplyLikes::ReplyId).col(ReplyLikes::UserId))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_reply_likes_reply_id")
                        .from(ReplyLikes::Table, ReplyLikes::ReplyId)
                        .to(Replies::Table, Replies::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_reply_likes_user_id")
                        .from(ReplyLikes::Table, ReplyLikes::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ReplyLikes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CommentLikes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Replies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Comments::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Comments {
    Table,
    Id,
    PublicId,
    Body,
    AuthorId,
    ParentPostId,
    CreatedAt,
}

#[derive(Iden)]
enum Replies {
    Table,
    Id,
    PublicId,
    Body,
    AuthorId,
    ParentCommentId,
    CreatedAt,
}

#[derive(Iden)]
enum CommentLikes {
    Table,
    CommentId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum ReplyLikes {
    Table,
    ReplyId,
    UserId,
    CreatedAt,
}
