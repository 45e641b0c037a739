use crate::config::Config;
use crate::models::auth_model::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

pub struct JwtUtils;

impl JwtUtils {
    /// Generate an access token for the user; returns the token and its expiry timestamp.
    pub fn generate_jwt(
        cfg: &Config,
        user_id: Uuid,
    ) -> Result<(String, usize), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let expire = now + Duration::minutes(cfg.jwt_expires_in);
        let claims = Claims {
            sub: user_id,
            exp: expire.timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )?;
        Ok((token, claims.exp))
    }

    /// Validate a token and return its claims
    pub fn validate_jwt(cfg: &Config, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(cfg.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    fn config(secret: &str) -> Config {
        Config::with_defaults("sqlite::memory:".to_string(), secret.to_string())
    }

    #[test]
    fn issued_token_validates() {
        let cfg = config("round-trip-secret");
        let user_id = Uuid::now_v7();
        let (token, exp) = JwtUtils::generate_jwt(&cfg, user_id).unwrap();

        let claims = JwtUtils::validate_jwt(&cfg, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let (token, _) = JwtUtils::generate_jwt(&config("one"), Uuid::now_v7()).unwrap();
        let err = JwtUtils::validate_jwt(&config("two"), &token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = Config {
            jwt_expires_in: -10,
            ..config("expiry")
        };
        let (token, _) = JwtUtils::generate_jwt(&cfg, Uuid::now_v7()).unwrap();
        let err = JwtUtils::validate_jwt(&cfg, &token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }
}
