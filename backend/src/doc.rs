//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the request and response schemas they reference. Mutating routes
//! declare the `BearerAuth` scheme; public routes opt out with an empty
//! security requirement.
//!
//! The document backs Swagger UI (debug builds) and is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Image, LikedProduct, Product, Role, User};
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::products::{
    CreateProductRequest, ImageUploadForm, MessageResponse, UpdateProductRequest,
};
use crate::inbound::http::users::CreateUserRequest;

/// Name of the bearer security scheme referenced by handler annotations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Registers the JWT bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront backend API",
        description = "Catalog, account and like endpoints with JWT bearer authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::auth::login,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::like_product,
        crate::inbound::http::products::upload_product_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        Product,
        Image,
        LikedProduct,
        CreateUserRequest,
        LoginRequest,
        LoginResponse,
        CreateProductRequest,
        UpdateProductRequest,
        ImageUploadForm,
        MessageResponse,
    )),
    tags(
        (name = "users", description = "Account registration"),
        (name = "auth", description = "Token issuance"),
        (name = "products", description = "Catalog, likes and images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
