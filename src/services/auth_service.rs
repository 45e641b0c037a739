use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::config::Config;
use crate::entities::user;
use crate::error::AppError;
use crate::models::auth_model::LoginResponse;
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt_utils::JwtUtils;

pub struct AuthService;

impl AuthService {
    pub async fn register_user(
        db: &DatabaseConnection,
        username: String,
        email: String,
        password: String,
    ) -> Result<user::Model, AppError> {
        // 1. Check Duplicate
        let duplicates = UserRepository::find_duplicates(db, &username, &email).await?;
        if !duplicates.is_empty() {
            return Err(Self::duplicate_error(&duplicates, &username, &email));
        }

        // 2. Hash Password
        let hashed_password = Self::hash_password(&password)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        // 3. User + Profile in one transaction
        let txn = db.begin().await?;
        let user = UserRepository::create(&txn, username, email, hashed_password).await?;
        txn.commit().await?;

        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    pub async fn login_user(
        db: &DatabaseConnection,
        cfg: &Config,
        login_id: String,
        password: String,
    ) -> Result<LoginResponse, AppError> {
        let user = UserRepository::find_by_login_id(db, &login_id)
            .await?
            .ok_or(AppError::Unauthorized("AUTH_FAILED", "Invalid username or password"))?;

        let is_valid = Self::verify_password(&password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !is_valid {
            tracing::warn!("Failed login for {}", user.username);
            return Err(AppError::Unauthorized("AUTH_FAILED", "Invalid username or password"));
        }

        let (token, token_expires_at) = JwtUtils::generate_jwt(cfg, user.public_id)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(LoginResponse {
            token,
            token_expires_at,
            type_: "Bearer".to_string(),
        })
    }

    fn duplicate_error(duplicates: &[user::Model], username: &str, email: &str) -> AppError {
        let u_exists = duplicates.iter().any(|u| u.username == username);
        let e_exists = duplicates.iter().any(|u| u.email == email);

        if u_exists && e_exists {
            AppError::Conflict("AUTH_DUPLICATE", "Username and Email already exists")
        } else if u_exists {
            AppError::Conflict("AUTH_DUPLICATE_USERNAME", "Username already exists")
        } else {
            AppError::Conflict("AUTH_DUPLICATE_EMAIL", "Email already exists")
        }
    }

    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }
}
