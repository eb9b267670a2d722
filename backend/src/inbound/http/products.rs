//! Product catalog HTTP handlers.
//!
//! ```text
//! GET    /products?limit=10&offset=0&category=lamps
//! GET    /products/{id}
//! POST   /products                 (admin)
//! PATCH  /products/{id}            (admin)
//! DELETE /products/{id}            (admin)
//! POST   /products/{id}/img        (admin, multipart field `image`)
//! POST   /products/{id}/like       (any authenticated user)
//! ```

use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpResponse, delete, get, patch, post, web};
use futures_util::TryStreamExt;
use pagination::PageRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, Image, LikedProduct, Product, ProductDraft, ProductFields, ProductListQuery,
    ProductPatch, ProductPatchFields,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, empty_value_error, map_pagination_error, map_product_validation_error,
    missing_field_error, parse_product_id, payload_too_large_error,
};

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// Message returned by `DELETE /products/{id}`.
pub const PRODUCT_DELETED_MESSAGE: &str = "Product deleted successfully";

/// Query string accepted by `GET /products`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Page size; a non-negative integer, default 10.
    pub limit: Option<String>,
    /// Items to skip; a non-negative integer, default 0.
    pub offset: Option<String>,
    /// Exact category to filter on.
    pub category: Option<String>,
}

impl TryFrom<ListProductsQuery> for ProductListQuery {
    type Error = Error;

    fn try_from(value: ListProductsQuery) -> Result<Self, Self::Error> {
        let page = PageRequest::from_query(value.limit.as_deref(), value.offset.as_deref())
            .map_err(map_pagination_error)?;
        let category = value
            .category
            .map(|raw| raw.trim().to_owned())
            .filter(|category| !category.is_empty());
        Ok(Self { page, category })
    }
}

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[schema(example = "Desk lamp")]
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    pub stock: i64,
    pub category: Option<String>,
    /// Cover image URL.
    pub image: Option<String>,
}

impl TryFrom<CreateProductRequest> for ProductDraft {
    type Error = Error;

    fn try_from(value: CreateProductRequest) -> Result<Self, Self::Error> {
        ProductDraft::try_new(ProductFields {
            name: value.name,
            description: value.description,
            price: value.price,
            stock: value.stock,
            category: value.category,
            image: value.image,
        })
        .map_err(map_product_validation_error)
    }
}

/// Request body for `PATCH /products/{id}`; omitted fields keep their values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<i64>,
    /// Category; `null` clears it.
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>, nullable)]
    pub category: Option<Option<String>>,
    /// Cover image URL; `null` clears it.
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>, nullable)]
    pub image: Option<Option<String>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an omitted field (`None`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateProductRequest> for ProductPatch {
    type Error = Error;

    fn try_from(value: UpdateProductRequest) -> Result<Self, Self::Error> {
        ProductPatch::try_new(ProductPatchFields {
            name: value.name,
            description: value.description,
            price: value.price,
            stock: value.stock,
            category: value.category,
            image: value.image,
        })
        .map_err(map_product_validation_error)
    }
}

/// Multipart body accepted by `POST /products/{id}/img`.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// Plain confirmation payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product deleted successfully")]
    pub message: String,
}

/// List products in insertion order.
#[utoipa::path(
    get,
    path = "/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Page of products", body = [Product]),
        (status = 400, description = "Invalid pagination", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ListProductsQuery>,
) -> ApiResult<web::Json<Vec<Product>>> {
    let query = ProductListQuery::try_from(query.into_inner())?;
    let products = state.products.list_products(query).await?;
    Ok(web::Json(products))
}

/// Fetch a single product with its images.
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = String, Path, format = Uuid, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security([])
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Product>> {
    let id = parse_product_id(&path.into_inner())?;
    let product = state.products.get_product(&id).await?;
    Ok(web::Json(product))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct",
    security(("BearerAuth" = []))
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateProductRequest>,
) -> ApiResult<HttpResponse> {
    user.require_admin(&state).await?;
    let draft = ProductDraft::try_from(payload.into_inner())?;
    let product = state.products_command.create_product(draft).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Partially update a product.
#[utoipa::path(
    patch,
    path = "/products/{id}",
    params(("id" = String, Path, format = Uuid, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct",
    security(("BearerAuth" = []))
)]
#[patch("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateProductRequest>,
) -> ApiResult<web::Json<Product>> {
    user.require_admin(&state).await?;
    let id = parse_product_id(&path.into_inner())?;
    let patch = ProductPatch::try_from(payload.into_inner())?;
    let product = state.products_command.update_product(&id, patch).await?;
    Ok(web::Json(product))
}

/// Delete a product along with its images and likes.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = String, Path, format = Uuid, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct",
    security(("BearerAuth" = []))
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let admin = user.require_admin(&state).await?;
    let id = parse_product_id(&path.into_inner())?;
    state.products_command.delete_product(&id).await?;
    info!(product_id = %id, admin = %admin.id(), "product deleted");
    Ok(web::Json(MessageResponse {
        message: PRODUCT_DELETED_MESSAGE.to_owned(),
    }))
}

/// Like a product as the authenticated user.
///
/// Liking twice leaves the caller in `likers` once.
#[utoipa::path(
    post,
    path = "/products/{id}/like",
    params(("id" = String, Path, format = Uuid, description = "Product id")),
    responses(
        (status = 200, description = "Product with its likers", body = LikedProduct),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Product or user not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "likeProduct",
    security(("BearerAuth" = []))
)]
#[post("/products/{id}/like")]
pub async fn like_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikedProduct>> {
    let id = parse_product_id(&path.into_inner())?;
    let liked = state.products_command.like_product(&id, user.user_id()).await?;
    Ok(web::Json(liked))
}

/// Upload an image for a product.
#[utoipa::path(
    post,
    path = "/products/{id}/img",
    params(("id" = String, Path, format = Uuid, description = "Product id")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = Image),
        (status = 400, description = "Missing, empty or oversized image", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Image host failure", body = Error)
    ),
    tags = ["products"],
    operation_id = "uploadProductImage",
    security(("BearerAuth" = []))
)]
#[post("/products/{id}/img")]
pub async fn upload_product_image(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    user.require_admin(&state).await?;
    let id = parse_product_id(&path.into_inner())?;
    let bytes = read_image_field(payload, state.max_image_bytes).await?;
    let image = state.products_command.upload_image(&id, bytes).await?;
    Ok(HttpResponse::Created().json(image))
}

fn map_multipart_error(err: MultipartError) -> Error {
    Error::invalid_request(format!("invalid multipart body: {err}"))
}

/// Read the `image` field into memory, enforcing `limit` while streaming.
async fn read_image_field(mut payload: Multipart, limit: usize) -> Result<Vec<u8>, Error> {
    let field_name = FieldName::new(IMAGE_FIELD);
    while let Some(mut field) = payload.try_next().await.map_err(map_multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(map_multipart_error)? {
            if bytes.len() + chunk.len() > limit {
                return Err(payload_too_large_error(field_name, limit));
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(empty_value_error(field_name));
        }
        return Ok(bytes);
    }
    Err(missing_field_error(field_name))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
