pub mod tag_seeder;

use sea_orm::{DatabaseConnection, DbErr};

pub async fn run_seeders(db: &DatabaseConnection) -> Result<(), DbErr> {
    tag_seeder::seed_tags(db).await?;
    Ok(())
}
