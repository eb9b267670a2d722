//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: Argon2 password hashing and JWT bearer tokens
//! - **image_host**: signed uploads to a Cloudinary-compatible image host
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod image_host;
pub mod persistence;
pub mod security;
