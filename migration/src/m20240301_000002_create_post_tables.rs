use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Tags (categories)
        manager.create_table(
            Table::create()
                .table(Tags::Table)
                .if_not_exists()
                .col(ColumnDef::new(Tags::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Tags::PublicId).uuid().not_null().unique_key())
                .col(ColumnDef::new(Tags::Name).string().not_null().unique_key())
                .col(ColumnDef::new(Tags::Slug).string().not_null().unique_key())
                .col(ColumnDef::new(Tags::Order).integer().not_null().default(0))
                .col(ColumnDef::new(Tags::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .to_owned(),
        ).await?;

        // 2. Posts
        manager.create_table(
            Table::create()
                .table(Posts::Table)
                .if_not_exists()
                .col(ColumnDef::new(Posts::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Posts::PublicId).uuid().not_null().unique_key())
                .col(ColumnDef::new(Posts::Url).string().not_null())
                .col(ColumnDef::new(Posts::Image).string().not_null())
                .col(ColumnDef::new(Posts::Title).string().not_null())
                .col(ColumnDef::new(Posts::Artist).string().not_null())
                .col(ColumnDef::new(Posts::Body).text().not_null())
                .col(ColumnDef::new(Posts::AuthorId).big_integer().not_null())
                .col(ColumnDef::new(Posts::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_posts_author_id")
                        .from(Posts::Table, Posts::AuthorId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        manager.create_index(Index::create().name("idx_posts_created_at").table(Posts::Table).col(Posts::CreatedAt).to_owned()).await?;

        // 3. PostTags (Many-to-Many)
        manager.create_table(
            Table::create()
                .table(PostTags::Table)
                .if_not_exists()
                .col(ColumnDef::new(PostTags::PostId).big_integer().not_null())
                .col(ColumnDef::new(PostTags::TagId).big_integer().not_null())
                .primary_key(Index::create().col(PostTags::PostId).col(PostTags::TagId))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_post_tags_post_id")
                        .from(PostTags::Table, PostTags::PostId)
                        .to(Posts::Table, Posts::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_post_tags_tag_id")
                        .from(PostTags::Table, PostTags::TagId)
                        .to(Tags::Table, Tags::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        // 4. PostLikes (Many-to-Many with timestamp)
        manager.create_table(
            Table::create()
                .table(PostLikes::Table)
                .if_not_exists()
                .col(ColumnDef::new(PostLikes::PostId).big_integer().not_null())
                .col(ColumnDef::new(PostLikes::UserId).big_integer().not_null())
                .col(ColumnDef::new(PostLikes::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .primary_key(Index::create().col(PostLikes::PostId).col(PostLikes::UserId))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_post_likes_post_id")
                        .from(PostLikes::Table, PostLikes::PostId)
                        .to(Posts::Table, Posts::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_post_likes_user_id")
                        .from(PostLikes::Table, PostLikes::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PostLikes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(PostTags::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Posts::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Tags::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    PublicId,
    Name,
    Slug,
    Order,
    CreatedAt,
}

#[derive(Iden)]
pub enum Posts {
    Table,
    Id,
    PublicId,
    Url,
    Image,
    Title,
    Artist,
    Body,
    AuthorId,
    CreatedAt,
}

#[derive(Iden)]
enum PostTags {
    Table,
    PostId,
    TagId,
}

#[derive(Iden)]
enum PostLikes {
    Table,
    PostId,
    UserId,
    CreatedAt,
}
