//! Port for product persistence, including images and likes read paths.

use async_trait::async_trait;

use crate::domain::{LikedProduct, Product, ProductDraft, ProductId, ProductListQuery, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
    }
}

/// Driven port over `products`, `images` and `product_likes`.
///
/// Every returned [`Product`] has its images attached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Page of products in insertion order, optionally filtered by category.
    async fn list(&self, query: &ProductListQuery)
    -> Result<Vec<Product>, ProductRepositoryError>;

    /// Fetch a single product.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Insert a new product.
    async fn insert(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError>;

    /// Overwrite every mutable column; `None` when the row does not exist.
    async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Delete a product and, by cascade, its images and likes.
    ///
    /// Returns `false` when no row matched.
    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError>;

    /// Fetch a product with the users who liked it.
    async fn find_with_likers(
        &self,
        id: &ProductId,
    ) -> Result<Option<LikedProduct>, ProductRepositoryError>;

    /// Record a like; recording the same pair twice is a no-op.
    async fn add_like(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
    ) -> Result<(), ProductRepositoryError>;
}
