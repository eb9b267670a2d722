//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, ProductsCommand, ProductsQuery, UsersCommand, UsersQuery};

/// Upload cap applied when none is configured (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Parameter object bundling the port implementations handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users_command: Arc<dyn UsersCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub products: Arc<dyn ProductsQuery>,
    pub products_command: Arc<dyn ProductsCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users_command: Arc<dyn UsersCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub products: Arc<dyn ProductsQuery>,
    pub products_command: Arc<dyn ProductsCommand>,
    /// Largest accepted `image` multipart field, in bytes.
    pub max_image_bytes: usize,
}

impl HttpState {
    /// Construct state from a ports bundle with the default upload cap.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            users_command,
            users,
            products,
            products_command,
        } = ports;
        Self {
            login,
            users_command,
            users,
            products,
            products_command,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Override the upload cap.
    #[must_use]
    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
