//! Image upload orchestration: push bytes to the host, record the URL.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{ImageHost, ImageRepository, ImageRepositoryError};
use crate::domain::{Error, Image, ImageUrl, ProductId};

/// Message returned to clients when the host rejects or drops an upload.
pub const UPLOAD_FAILED_MESSAGE: &str = "failed to upload image to image host";

fn map_image_repository_error(error: ImageRepositoryError) -> Error {
    match error {
        ImageRepositoryError::Connection { message } => {
            Error::internal(format!("image repository unavailable: {message}"))
        }
        ImageRepositoryError::Query { message } => {
            Error::internal(format!("image repository error: {message}"))
        }
    }
}

/// Service wrapping the image host and image repository.
#[derive(Clone)]
pub struct ImageService<I, H> {
    image_repo: Arc<I>,
    host: Arc<H>,
}

impl<I, H> ImageService<I, H>
where
    I: ImageRepository,
    H: ImageHost,
{
    pub fn new(image_repo: Arc<I>, host: Arc<H>) -> Self {
        Self { image_repo, host }
    }

    /// Upload bytes to the external host.
    pub async fn upload(&self, bytes: Vec<u8>) -> Result<ImageUrl, Error> {
        let size = bytes.len();
        self.host.upload(bytes).await.map_err(|err| {
            warn!(error = %err, size, "image upload failed");
            Error::internal(UPLOAD_FAILED_MESSAGE)
        })
    }

    /// Persist an image row linking `url` to the product.
    pub async fn create(&self, url: ImageUrl, product_id: &ProductId) -> Result<Image, Error> {
        let image = self
            .image_repo
            .insert(&Image::new(url, *product_id))
            .await
            .map_err(map_image_repository_error)?;
        info!(image_id = %image.id, product_id = %product_id, "image stored");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{ImageHostError, MockImageHost, MockImageRepository};
    use rstest::rstest;

    #[rstest]
    #[case(ImageHostError::transport("connection reset"))]
    #[case(ImageHostError::rejected(401_u16, "bad signature"))]
    #[case(ImageHostError::invalid_response("missing secure_url"))]
    #[tokio::test]
    async fn upload_failures_become_upload_failed(#[case] error: ImageHostError) {
        let mut host = MockImageHost::new();
        host.expect_upload().times(1).return_once(move |_| Err(error));
        let service = ImageService::new(Arc::new(MockImageRepository::new()), Arc::new(host));

        let err = service.upload(vec![1, 2, 3]).await.expect_err("upload fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), UPLOAD_FAILED_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn create_links_image_to_product() {
        let product_id = ProductId::random();
        let mut repo = MockImageRepository::new();
        repo.expect_insert()
            .withf(move |image| image.product_id == product_id)
            .times(1)
            .returning(|image| Ok(image.clone()));
        let service = ImageService::new(Arc::new(repo), Arc::new(MockImageHost::new()));

        let url = ImageUrl::new("https://cdn.example.com/a.png").expect("url");
        let image = service.create(url.clone(), &product_id).await.expect("stored");
        assert_eq!(image.url, url);
        assert_eq!(image.product_id, product_id);
    }
}
