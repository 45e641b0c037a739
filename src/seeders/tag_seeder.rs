use sea_orm::{DatabaseConnection, DbErr, EntityTrait, ActiveValue::Set, ActiveModelTrait, QueryFilter, ColumnTrait};
use uuid::Uuid;
use chrono::Utc;
use slug::slugify;
use crate::entities::tag;

/// Default photo categories, in display order.
pub const DEFAULT_CATEGORIES: [&str; 6] = ["Nature", "Architecture", "Portrait", "Street", "Animals", "Travel"];

/// Inserts any default category that is missing. Safe to run on every start.
pub async fn seed_tags(db: &DatabaseConnection) -> Result<(), DbErr> {
    for (order, name) in DEFAULT_CATEGORIES.iter().enumerate() {
        let exists = tag::Entity::find()
            .filter(tag::Column::Name.eq(*name))
            .one(db)
            .await?;

        if exists.is_none() {
            let new_tag = tag::ActiveModel {
                public_id: Set(Uuid::now_v7()),
                name: Set(name.to_string()),
                slug: Set(slugify(name)),
                order: Set(order as i32),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            new_tag.insert(db).await?;
            tracing::info!("Seeded category: {}", name);
        }
    }

    Ok(())
}
