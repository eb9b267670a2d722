//! Driving port for catalog mutations, likes and image uploads.

use async_trait::async_trait;

use crate::domain::{
    Error, Image, LikedProduct, Product, ProductDraft, ProductId, ProductPatch, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductsCommand: Send + Sync {
    /// Persist a new product.
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, Error>;

    /// Apply a partial update; omitted fields keep their stored values.
    async fn update_product(&self, id: &ProductId, patch: ProductPatch)
    -> Result<Product, Error>;

    /// Remove a product with its images and likes.
    async fn delete_product(&self, id: &ProductId) -> Result<(), Error>;

    /// Record that `user_id` likes the product.
    async fn like_product(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
    ) -> Result<LikedProduct, Error>;

    /// Send bytes to the image host and link the hosted image to the product.
    async fn upload_image(&self, product_id: &ProductId, bytes: Vec<u8>) -> Result<Image, Error>;
}
