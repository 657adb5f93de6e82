//! Data Transfer Objects for API requests and responses.

mod error;
mod health;
mod me;
mod pagination;
mod product;
mod user;

pub use error::{ErrorDetail, ErrorResponse};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use me::{ChangeEmailRequest, ChangePasswordRequest, UpdateProfileRequest};
pub use pagination::{PagedResponse, PaginationMeta};
pub use product::{
    CreateProductRequest, ProductListParams, ProductResponse, RestoreProductRequest,
    UpdateProductRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, UserListParams, UserResponse};
