//! Port for the third-party image host.
//!
//! The domain only needs bytes in, public URL out. Credentials, signing and
//! transport live in the adapter.

use async_trait::async_trait;

use crate::domain::ImageUrl;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image host adapters.
    pub enum ImageHostError {
        /// The request never reached the host or timed out.
        Transport { message: String } => "image host transport failed: {message}",
        /// The host answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "image host rejected upload with status {status}: {message}",
        /// The host answered but the payload was unusable.
        InvalidResponse { message: String } => "image host response invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload raw image bytes and return the hosted URL.
    async fn upload(&self, bytes: Vec<u8>) -> Result<ImageUrl, ImageHostError>;
}
