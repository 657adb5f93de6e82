//! User-related DTOs for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppResult;
use crate::models::{NewUser, UpdateUser, User, UserQuery};
use crate::services::ActionInput;

fn default_role() -> String {
    "viewer".to_string()
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    #[schema(format = "password", min_length = 8, max_length = 128)]
    pub password: String,
    #[serde(default = "default_role")]
    #[validate(length(min = 1, max = 50, message = "Role must be between 1 and 50 characters"))]
    #[schema(example = "editor")]
    pub role: String,
}

/// The password is still plain here; the service hashes it.
impl ActionInput<NewUser> for CreateUserRequest {
    fn checked(self) -> AppResult<NewUser> {
        self.validate()?;
        Ok(NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            role: self.role,
        })
    }
}

/// Request body for updating a user. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Role must be between 1 and 50 characters"))]
    pub role: Option<String>,
}

impl ActionInput<UpdateUser> for UpdateUserRequest {
    fn checked(self) -> AppResult<UpdateUser> {
        self.validate()?;
        Ok(UpdateUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            role: self.role,
        })
    }
}

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct UserListParams {
    /// Page number (1-based)
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: Option<i64>,
    /// Items per page (max 100)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: Option<i64>,
    /// Case-insensitive email substring
    pub email: Option<String>,
    pub role: Option<String>,
}

impl ActionInput<UserQuery> for UserListParams {
    fn checked(self) -> AppResult<UserQuery> {
        self.validate()?;
        Ok(UserQuery {
            page: self.page,
            limit: self.limit,
            email: self.email,
            role: self.role,
        })
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// User data without the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_role() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"first_name":"Ada","last_name":"Lovelace","email":"ada@example.com","password":"correct-horse"}"#,
        )
        .unwrap();
        assert_eq!(request.role, "viewer");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_short_password() {
        let request = CreateUserRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "short".into(),
            role: "viewer".into(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_list_params_into_query_keeps_only_supplied_fields() {
        let query: UserQuery = UserListParams {
            page: Some(2),
            ..Default::default()
        }
        .checked()
        .unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, None);
    }
}
