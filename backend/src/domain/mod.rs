//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed storefront entities and the use-cases that
//! operate on them. Types here know nothing about HTTP or SQL; adapters in
//! `inbound` and `outbound` translate at the edges.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Role, NewUser: accounts and sign-up input.
//! - LoginCredentials, AccessToken, AccessClaims: authentication values.
//! - Product, ProductDraft, ProductPatch, LikedProduct: catalog entries.
//! - Image, ImageUrl: hosted product images.
//! - UsersService, AuthService, ProductsService, ImageService: use-cases.

pub mod auth;
mod auth_service;
pub mod error;
pub mod image;
pub mod image_service;
pub mod ports;
pub mod product;
mod products_service;
pub mod trace_id;
pub mod user;
mod users_service;

pub use self::auth::{AccessClaims, AccessToken, LoginCredentials, LoginValidationError};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::image::{Image, ImageUrl, ImageUrlValidationError};
pub use self::image_service::ImageService;
pub use self::product::{
    LikedProduct, Product, ProductDraft, ProductFields, ProductId, ProductListQuery, ProductPatch,
    ProductPatchFields, ProductValidationError,
};
pub use self::products_service::ProductsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, PasswordHash, Role, User, UserCredentials, UserId, UserRecord,
    UserValidationError, Username,
};
pub use self::users_service::UsersService;
