//! Driving port for catalog reads.

use async_trait::async_trait;

use crate::domain::{Error, Product, ProductId, ProductListQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductsQuery: Send + Sync {
    /// Page through the catalog.
    async fn list_products(&self, query: ProductListQuery) -> Result<Vec<Product>, Error>;

    /// Fetch one product with its images.
    async fn get_product(&self, id: &ProductId) -> Result<Product, Error>;
}
