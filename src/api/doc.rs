use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const PRODUCT_TAG: &str = "Products";
pub const USER_TAG: &str = "Users";
pub const ME_TAG: &str = "Me";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Emporium",
        description = "Product catalog admin API with a read-through response cache",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::ErrorDetail,
            crate::models::ProductStatus,
        )
    ),
    tags(
        (name = PRODUCT_TAG, description = "Product administration, archive and cache purge endpoints"),
        (name = USER_TAG, description = "User administration endpoints"),
        (name = ME_TAG, description = "Current user profile endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token carrying the caller's role"))
                        .build(),
                ),
            )
        }
    }
}
