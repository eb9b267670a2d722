//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`]) are what inbound
//! adapters call. Driven ports (repositories, [`ImageHost`],
//! [`PasswordHasher`], [`TokenService`]) are what services call out to; each
//! exposes a typed error so adapters map failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod image_host;
mod image_repository;
mod login_service;
mod password_hasher;
mod product_repository;
mod products_command;
mod products_query;
mod token_service;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use image_host::MockImageHost;
pub use image_host::{ImageHost, ImageHostError};
#[cfg(test)]
pub use image_repository::MockImageRepository;
pub use image_repository::{ImageRepository, ImageRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use products_command::MockProductsCommand;
pub use products_command::ProductsCommand;
#[cfg(test)]
pub use products_query::MockProductsQuery;
pub use products_query::ProductsQuery;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
