//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from a `STOREFRONT_*` environment variable, a
//! command-line flag or a configuration file. Accessors fall back to the
//! defaults below when a value is absent.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use storefront::inbound::http::state::DEFAULT_MAX_IMAGE_BYTES;
use storefront::outbound::image_host::DEFAULT_API_BASE;
use storefront::outbound::security::Argon2PasswordHasher;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_JWT_TTL_SECS: u64 = 3600;
const DEFAULT_IMAGE_HOST_TIMEOUT_SECS: u64 = 30;

/// Storefront server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Apply embedded migrations on startup. Development only.
    #[ortho_config(default = false)]
    pub auto_migrate: bool,
    /// HMAC secret used to sign access tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in seconds.
    pub jwt_ttl_secs: Option<u64>,
    /// Argon2 iteration count for new password hashes.
    pub password_cost: Option<u32>,
    /// Image host account name.
    pub cloudinary_cloud_name: Option<String>,
    /// Image host API key.
    pub cloudinary_api_key: Option<String>,
    /// Image host API secret used to sign uploads.
    pub cloudinary_api_secret: Option<String>,
    /// Image host API root, overridable for testing against a stub.
    pub cloudinary_api_base: Option<String>,
    /// Request timeout for image host uploads, in seconds.
    pub image_host_timeout_secs: Option<u64>,
    /// Largest accepted image upload, in bytes.
    pub max_image_bytes: Option<usize>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    pub fn jwt_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt_ttl_secs.unwrap_or(DEFAULT_JWT_TTL_SECS))
    }

    pub fn password_cost(&self) -> u32 {
        self.password_cost
            .unwrap_or(Argon2PasswordHasher::DEFAULT_COST)
    }

    pub fn cloudinary_api_base(&self) -> &str {
        self.cloudinary_api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
    }

    pub fn image_host_timeout(&self) -> Duration {
        Duration::from_secs(
            self.image_host_timeout_secs
                .unwrap_or(DEFAULT_IMAGE_HOST_TIMEOUT_SECS),
        )
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes.unwrap_or(DEFAULT_MAX_IMAGE_BYTES)
    }
}
