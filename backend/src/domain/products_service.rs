//! Catalog service: CRUD, likes and image uploads.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::image_service::ImageService;
use super::users_service::map_user_repository_error;
use crate::domain::ports::{
    ImageHost, ImageRepository, ProductRepository, ProductRepositoryError, ProductsCommand,
    ProductsQuery, UserRepository,
};
use crate::domain::{
    Error, Image, LikedProduct, Product, ProductDraft, ProductId, ProductListQuery, ProductPatch,
    User, UserId,
};

fn map_product_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::internal(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

fn product_not_found(id: &ProductId) -> Error {
    Error::not_found(format!("Product with id {id} not found"))
}

/// Service implementing [`ProductsQuery`] and [`ProductsCommand`].
#[derive(Clone)]
pub struct ProductsService<P, U, I, H> {
    product_repo: Arc<P>,
    user_repo: Arc<U>,
    images: ImageService<I, H>,
}

impl<P, U, I, H> ProductsService<P, U, I, H>
where
    P: ProductRepository,
    U: UserRepository,
    I: ImageRepository,
    H: ImageHost,
{
    pub fn new(product_repo: Arc<P>, user_repo: Arc<U>, images: ImageService<I, H>) -> Self {
        Self {
            product_repo,
            user_repo,
            images,
        }
    }

    async fn load_product(&self, id: &ProductId) -> Result<Product, Error> {
        self.product_repo
            .find_by_id(id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| product_not_found(id))
    }

    async fn load_liked_product(&self, id: &ProductId) -> Result<LikedProduct, Error> {
        self.product_repo
            .find_with_likers(id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| product_not_found(id))
    }

    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[async_trait]
impl<P, U, I, H> ProductsQuery for ProductsService<P, U, I, H>
where
    P: ProductRepository,
    U: UserRepository,
    I: ImageRepository,
    H: ImageHost,
{
    async fn list_products(&self, query: ProductListQuery) -> Result<Vec<Product>, Error> {
        self.product_repo
            .list(&query)
            .await
            .map_err(map_product_repository_error)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, Error> {
        self.load_product(id).await
    }
}

#[async_trait]
impl<P, U, I, H> ProductsCommand for ProductsService<P, U, I, H>
where
    P: ProductRepository,
    U: UserRepository,
    I: ImageRepository,
    H: ImageHost,
{
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, Error> {
        let product = self
            .product_repo
            .insert(&ProductId::random(), &draft)
            .await
            .map_err(map_product_repository_error)?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, Error> {
        let current = self.load_product(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let merged = patch.apply_to(&current);
        self.product_repo
            .update(id, &merged)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| product_not_found(id))
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), Error> {
        let deleted = self
            .product_repo
            .delete(id)
            .await
            .map_err(map_product_repository_error)?;
        if !deleted {
            return Err(product_not_found(id));
        }
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn like_product(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
    ) -> Result<LikedProduct, Error> {
        let (mut liked, user) = tokio::try_join!(
            self.load_liked_product(product_id),
            self.load_user(user_id)
        )?;

        if liked.add_liker(user) {
            self.product_repo
                .add_like(product_id, user_id)
                .await
                .map_err(map_product_repository_error)?;
        }
        Ok(liked)
    }

    async fn upload_image(&self, product_id: &ProductId, bytes: Vec<u8>) -> Result<Image, Error> {
        self.load_product(product_id).await?;
        let url = self.images.upload(bytes).await?;
        self.images.create(url, product_id).await
    }
}

#[cfg(test)]
#[path = "products_service_tests.rs"]
mod tests;
