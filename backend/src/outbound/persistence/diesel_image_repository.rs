//! PostgreSQL-backed `ImageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ImageRepository, ImageRepositoryError};
use crate::domain::{Image, ImageUrl, ProductId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ImageRow, NewImageRow};
use super::pool::DbPool;
use super::schema::images;

/// Diesel-backed implementation of the image repository port.
#[derive(Clone)]
pub struct DieselImageRepository {
    pool: DbPool,
}

impl DieselImageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a stored row into a domain image.
pub(super) fn row_to_image(row: ImageRow) -> Result<Image, String> {
    let url = ImageUrl::new(&row.url).map_err(|err| format!("stored image url invalid: {err}"))?;
    Ok(Image {
        id: row.id,
        url,
        product_id: ProductId::from(row.product_id),
    })
}

#[async_trait]
impl ImageRepository for DieselImageRepository {
    async fn insert(&self, image: &Image) -> Result<Image, ImageRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ImageRepositoryError::connection))?;

        let row = diesel::insert_into(images::table)
            .values(&NewImageRow {
                id: image.id,
                url: image.url.as_ref(),
                product_id: *image.product_id.as_uuid(),
            })
            .returning(ImageRow::as_returning())
            .get_result::<ImageRow>(&mut conn)
            .await
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    ImageRepositoryError::query,
                    ImageRepositoryError::connection,
                )
            })?;

        row_to_image(row).map_err(ImageRepositoryError::query)
    }
}
