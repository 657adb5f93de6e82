//! Profile DTOs for the authenticated user.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChangeEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[validate(length(min = 1, message = "Current password is required"))]
    #[schema(format = "password")]
    pub current_password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    #[schema(format = "password")]
    pub current_password: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    #[schema(format = "password")]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Password confirmation does not match"))]
    #[schema(format = "password")]
    pub new_password_confirmation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_confirmation_must_match() {
        let request = ChangePasswordRequest {
            current_password: "old-password".into(),
            new_password: "new-password-1".into(),
            new_password_confirmation: "new-password-2".into(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password_confirmation"));
    }

    #[test]
    fn test_change_email_requires_current_password() {
        let request = ChangeEmailRequest {
            email: "new@example.com".into(),
            current_password: String::new(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("current_password"));
    }
}
