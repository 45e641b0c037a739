use sea_orm::*;
use chrono::Utc;
use uuid::Uuid;
use crate::entities::{profile, user, user::Entity as User};

pub struct UserRepository;

impl UserRepository {
    // Find user by email or username
    pub async fn find_by_login_id(
        db: &DatabaseConnection,
        login_id: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(login_id))
                    .add(user::Column::Username.eq(login_id))
            )
            .one(db)
            .await
    }

    pub async fn find_by_public_id(
        db: &DatabaseConnection,
        public_id: Uuid,
    ) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::PublicId.eq(public_id))
            .one(db)
            .await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await
    }

    // Check if user exists (for signup) - Returns LIST to identify what matches
    pub async fn find_duplicates(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
    ) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username))
            )
            .all(db)
            .await
    }

    // Create new user together with its empty profile
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<user::Model, DbErr> {
        let now = Utc::now();
        let new_user = user::ActiveModel {
            id: NotSet,
            public_id: Set(Uuid::now_v7()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let user = new_user.insert(db).await?;

        profile::ActiveModel {
            id: NotSet,
            user_id: Set(user.id),
            display_name: Set(None),
            bio: Set(None),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Ok(user)
    }
}
