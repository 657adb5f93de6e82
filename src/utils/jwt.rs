use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};

/// Access token claims.
///
/// `sub` identifies the user. `email` and `role` describe the user at issue
/// time only; permissions are resolved from the current user row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, email: String, role: String, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            email,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// The user id in `sub`.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub.parse::<i32>().map_err(|_| AppError::Unauthorized {
            message: "Invalid token subject".to_string(),
        })
    }
}

/// Issues a signed access token.
///
/// # Example
/// ```ignore
/// let token = generate_access_token(1, "ops@example.com".into(), "admin".into(), &settings.jwt)?;
/// ```
pub fn generate_access_token(
    user_id: i32,
    email: String,
    role: String,
    config: &JwtConfig,
) -> AppResult<String> {
    let claims = Claims::new(user_id, email, role, config.access_token_expiration);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Validates and decodes an access token.
pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(expiration: i64) -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_jwt_testing_0123".to_string(),
            access_token_expiration: expiration,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = config(1);
        let token =
            generate_access_token(42, "ops@example.com".into(), "admin".into(), &config).unwrap();

        let claims = validate_access_token(&token, &config.secret).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);

        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "ops@example.com");
    }

    #[test]
    fn test_wrong_secret() {
        let token =
            generate_access_token(1, "a@example.com".into(), "viewer".into(), &config(1)).unwrap();

        match validate_access_token(&token, "another_secret_key_that_is_long_enough") {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_token() {
        let config = config(-1);
        let token =
            generate_access_token(1, "a@example.com".into(), "viewer".into(), &config).unwrap();

        match validate_access_token(&token, &config.secret) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            validate_access_token("invalid.token.format", "secret"),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".to_string(),
            email: "a@example.com".to_string(),
            role: "viewer".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.user_id().is_err());
    }
}
