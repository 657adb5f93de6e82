//! Product models for database operations.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::LifecycleState;
use crate::models::page::normalize_paging;

/// Publication status of a product
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, ToSchema,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::ProductStatus")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Published,
    Hidden,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Published => write!(f, "published"),
            ProductStatus::Hidden => write!(f, "hidden"),
        }
    }
}

/// Product row. `deleted_at` set means archived.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub status: ProductStatus,
    pub price: BigDecimal,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState::from_marker(self.deleted_at.as_ref())
    }

    pub fn is_archived(&self) -> bool {
        self.lifecycle_state() == LifecycleState::Archived
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub status: ProductStatus,
    pub price: BigDecimal,
    pub user_id: i32,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub status: Option<ProductStatus>,
    pub price: Option<BigDecimal>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.slug.is_none()
            && self.status.is_none()
            && self.price.is_none()
    }
}

/// Optional list filters. `title` matches a case-insensitive substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<ProductStatus>,
    pub user_id: Option<i32>,
}

impl ProductFilter {
    /// Whether a product satisfies every set filter field.
    pub fn matches(&self, product: &Product) -> bool {
        self.title.as_ref().is_none_or(|title| {
            product
                .title
                .to_lowercase()
                .contains(&title.to_lowercase())
        }) && self.slug.as_ref().is_none_or(|slug| &product.slug == slug)
            && self.status.is_none_or(|status| product.status == status)
            && self.user_id.is_none_or(|user_id| product.user_id == user_id)
    }
}

/// List query for products.
///
/// The serialized form, with unset fields dropped, is the cache key suffix,
/// so only values the caller actually supplied take part in the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<ProductStatus>,
    pub user_id: Option<i32>,
}

impl ProductQuery {
    pub fn paging(&self) -> (i64, i64) {
        normalize_paging(self.page, self.limit)
    }

    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            title: self.title.clone(),
            slug: self.slug.clone(),
            status: self.status,
            user_id: self.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product() -> Product {
        Product {
            id: 1,
            title: "Walnut Desk".to_string(),
            description: None,
            slug: "walnut-desk".to_string(),
            status: ProductStatus::Published,
            price: BigDecimal::from_str("249.00").unwrap(),
            user_id: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_deleted_at_marks_archived() {
        let mut product = product();
        assert!(!product.is_archived());
        product.deleted_at = Some(Utc::now());
        assert!(product.is_archived());
    }

    #[test]
    fn test_filter_title_is_case_insensitive_substring() {
        let filter = ProductFilter {
            title: Some("WALNUT".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&product()));
    }

    #[test]
    fn test_filter_requires_all_fields() {
        let filter = ProductFilter {
            status: Some(ProductStatus::Published),
            user_id: Some(4),
            ..Default::default()
        };
        assert!(!filter.matches(&product()));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Hidden).unwrap(),
            "\"hidden\""
        );
    }
}
