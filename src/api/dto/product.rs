//! Product DTOs for API requests and responses.

use std::sync::LazyLock;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::AppResult;
use crate::models::{NewProduct, Product, ProductQuery, ProductStatus, UpdateProduct};
use crate::services::ActionInput;

/// Lowercase letters and digits in dash-separated groups.
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("static pattern"));

fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price < BigDecimal::zero() {
        let mut error = ValidationError::new("price_negative");
        error.message = Some("Price cannot be negative".into());
        return Err(error);
    }
    Ok(())
}

fn default_status() -> ProductStatus {
    ProductStatus::Draft
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a product. The owner is the caller.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    #[schema(example = "Walnut Desk")]
    pub title: String,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"),
        regex(path = *SLUG_PATTERN, message = "Slug may only contain lowercase letters, digits and dashes")
    )]
    #[schema(example = "walnut-desk")]
    pub slug: String,
    #[serde(default = "default_status")]
    pub status: ProductStatus,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "249.00")]
    pub price: BigDecimal,
}

/// The owner is assigned by the service from the caller.
impl ActionInput<NewProduct> for CreateProductRequest {
    fn checked(self) -> AppResult<NewProduct> {
        self.validate()?;
        Ok(NewProduct {
            title: self.title,
            description: self.description,
            slug: self.slug,
            status: self.status,
            price: self.price,
            user_id: 0,
        })
    }
}

/// Request body for updating a product. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"),
        regex(path = *SLUG_PATTERN, message = "Slug may only contain lowercase letters, digits and dashes")
    )]
    pub slug: Option<String>,
    pub status: Option<ProductStatus>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "199.00")]
    pub price: Option<BigDecimal>,
}

impl ActionInput<UpdateProduct> for UpdateProductRequest {
    fn checked(self) -> AppResult<UpdateProduct> {
        self.validate()?;
        Ok(UpdateProduct {
            title: self.title,
            description: self.description,
            slug: self.slug,
            status: self.status,
            price: self.price,
        })
    }
}

/// Request body for restoring an archived product.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RestoreProductRequest {
    #[validate(range(min = 1, message = "Product id must be positive"))]
    pub product_id: i32,
}

impl ActionInput<i32> for RestoreProductRequest {
    fn checked(self) -> AppResult<i32> {
        self.validate()?;
        Ok(self.product_id)
    }
}

/// Query parameters for listing products.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// Page number (1-based)
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: Option<i64>,
    /// Items per page (max 100)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: Option<i64>,
    /// Case-insensitive title substring
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<ProductStatus>,
    /// Owner id
    pub user_id: Option<i32>,
}

impl ActionInput<ProductQuery> for ProductListParams {
    fn checked(self) -> AppResult<ProductQuery> {
        self.validate()?;
        Ok(ProductQuery {
            page: self.page,
            limit: self.limit,
            title: self.title,
            slug: self.slug,
            status: self.status,
            user_id: self.user_id,
        })
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub status: ProductStatus,
    #[schema(value_type = String, example = "249.00")]
    pub price: BigDecimal,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the product is archived
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            slug: product.slug,
            status: product.status,
            price: product.price,
            user_id: product.user_id,
            created_at: product.created_at,
            updated_at: product.updated_at,
            deleted_at: product.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_request(slug: &str, price: &str) -> CreateProductRequest {
        CreateProductRequest {
            title: "Walnut Desk".to_string(),
            description: None,
            slug: slug.to_string(),
            status: ProductStatus::Draft,
            price: BigDecimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create_request("walnut-desk-2", "249.00").validate().is_ok());
    }

    #[test]
    fn test_slug_pattern() {
        for slug in ["Walnut", "walnut desk", "-walnut", "walnut--desk", "walnut_desk"] {
            let errors = create_request(slug, "1").validate().unwrap_err();
            assert!(errors.field_errors().contains_key("slug"), "{}", slug);
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let errors = create_request("desk", "-0.01").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn test_update_request_validates_present_fields_only() {
        let request = UpdateProductRequest {
            price: Some(BigDecimal::from_str("-1").unwrap()),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);

        assert!(UpdateProductRequest::default().validate().is_ok());
    }

    #[test]
    fn test_checked_create_request() {
        let new_product: NewProduct = create_request("oak-desk", "99.90").checked().unwrap();
        assert_eq!(new_product.slug, "oak-desk");

        assert!(matches!(
            ActionInput::<NewProduct>::checked(create_request("Oak Desk", "99.90")),
            Err(crate::error::AppError::ValidationErrors { .. })
        ));
    }

    #[test]
    fn test_list_params_limit_checked() {
        let params = ProductListParams {
            limit: Some(1000),
            ..Default::default()
        };
        assert!(ActionInput::<ProductQuery>::checked(params).is_err());
    }

    #[test]
    fn test_status_defaults_to_draft() {
        let request: CreateProductRequest =
            serde_json::from_str(r#"{"title":"Lamp","slug":"lamp","price":"12.50"}"#).unwrap();
        assert_eq!(request.status, ProductStatus::Draft);
    }
}
