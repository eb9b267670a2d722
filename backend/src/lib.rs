//! Storefront backend library.
//!
//! Layout follows a hexagonal split: [`domain`] holds entities, services and
//! ports; [`inbound`] adapts HTTP requests onto driving ports; [`outbound`]
//! implements driven ports over PostgreSQL, the image host and the security
//! primitives.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
