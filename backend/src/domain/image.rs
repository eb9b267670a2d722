//! Product images hosted by an external image service.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ProductId;

/// Validation errors for hosted image URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUrlValidationError {
    Empty,
    Malformed,
    UnsupportedScheme(String),
}

impl fmt::Display for ImageUrlValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "image url must not be empty"),
            Self::Malformed => write!(f, "image url must be an absolute URL"),
            Self::UnsupportedScheme(scheme) => {
                write!(f, "image url must use http or https (got {scheme})")
            }
        }
    }
}

impl std::error::Error for ImageUrlValidationError {}

/// Absolute `http`/`https` URL of a hosted image.
///
/// # Examples
/// ```
/// use storefront::domain::ImageUrl;
///
/// assert!(ImageUrl::new("https://cdn.example.com/a.png").is_ok());
/// assert!(ImageUrl::new("ftp://cdn.example.com/a.png").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Validate and construct an [`ImageUrl`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ImageUrlValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ImageUrlValidationError::Empty);
        }
        let parsed = Url::parse(trimmed).map_err(|_| ImageUrlValidationError::Malformed)?;
        match parsed.scheme() {
            "http" | "https" => Ok(Self(trimmed.to_owned())),
            other => Err(ImageUrlValidationError::UnsupportedScheme(other.to_owned())),
        }
    }
}

impl AsRef<str> for ImageUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = ImageUrlValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Image row linked to exactly one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[schema(value_type = String, example = "https://res.cloudinary.com/demo/image/upload/a.png")]
    pub url: ImageUrl,
    #[schema(value_type = String, format = Uuid)]
    pub product_id: ProductId,
}

impl Image {
    /// New image for `product_id` with a fresh identifier.
    pub fn new(url: ImageUrl, product_id: ProductId) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            product_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", ImageUrlValidationError::Empty)]
    #[case("not a url", ImageUrlValidationError::Malformed)]
    #[case("/relative/path.png", ImageUrlValidationError::Malformed)]
    #[case("ftp://host/a.png", ImageUrlValidationError::UnsupportedScheme("ftp".to_owned()))]
    fn image_url_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: ImageUrlValidationError,
    ) {
        assert_eq!(ImageUrl::new(raw).expect_err("invalid url"), expected);
    }

    #[rstest]
    fn image_serialises_with_product_id() {
        let product_id = ProductId::random();
        let image = Image::new(
            ImageUrl::new("https://cdn.example.com/a.png").expect("url"),
            product_id,
        );
        let value = serde_json::to_value(&image).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": image.id.to_string(),
                "url": "https://cdn.example.com/a.png",
                "productId": product_id.to_string()
            })
        );
    }
}
