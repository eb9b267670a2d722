//! Product catalog model.
//!
//! [`ProductDraft`] carries validated fields for inserts and full updates.
//! [`ProductPatch`] carries the subset a caller supplied; merging it onto the
//! stored product yields a new draft, so unspecified fields keep their values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Image, ImageUrl, User};

/// Scale applied to prices before they are stored.
pub const PRICE_SCALE: u32 = 2;

/// Validation errors for product payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    InvalidId,
    EmptyName,
    EmptyDescription,
    NonPositivePrice,
    NonPositiveStock,
    StockOutOfRange,
    EmptyCategory,
    InvalidImage(String),
}

impl ProductValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyName => "name",
            Self::EmptyDescription => "description",
            Self::NonPositivePrice => "price",
            Self::NonPositiveStock | Self::StockOutOfRange => "stock",
            Self::EmptyCategory => "category",
            Self::InvalidImage(_) => "image",
        }
    }
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "product id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::NonPositivePrice => write!(f, "price must be a positive number"),
            Self::NonPositiveStock => write!(f, "stock must be a positive number"),
            Self::StockOutOfRange => write!(f, "stock is too large"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
            Self::InvalidImage(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for ProductValidationError {}

/// Stable product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(Uuid);

impl ProductId {
    /// Validate and construct a [`ProductId`] from a string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProductValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ProductValidationError::InvalidId)
    }

    /// Generate a new random [`ProductId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ProductId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for ProductId {
    type Err = ProductValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Catalog entry with its images eagerly attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(value_type = String, format = Uuid)]
    pub id: ProductId,
    #[schema(example = "Desk lamp")]
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub image: Option<ImageUrl>,
    pub images: Vec<Image>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// Raw product fields as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// Validated product fields ready to persist.
///
/// ## Invariants
/// - `name` and `description` are trimmed and non-empty.
/// - `price` is positive after rounding to [`PRICE_SCALE`] places.
/// - `stock` is positive and fits the storage column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    category: Option<String>,
    image: Option<ImageUrl>,
}

fn non_blank(value: &str, err: ProductValidationError) -> Result<String, ProductValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(err)
    } else {
        Ok(trimmed.to_owned())
    }
}

fn validate_price(price: Decimal) -> Result<Decimal, ProductValidationError> {
    let rounded = price.round_dp(PRICE_SCALE);
    if rounded <= Decimal::ZERO {
        return Err(ProductValidationError::NonPositivePrice);
    }
    Ok(rounded)
}

fn validate_stock(stock: i64) -> Result<i32, ProductValidationError> {
    if stock <= 0 {
        return Err(ProductValidationError::NonPositiveStock);
    }
    i32::try_from(stock).map_err(|_| ProductValidationError::StockOutOfRange)
}

fn validate_category(category: &str) -> Result<String, ProductValidationError> {
    non_blank(category, ProductValidationError::EmptyCategory)
}

fn validate_image(image: &str) -> Result<ImageUrl, ProductValidationError> {
    ImageUrl::new(image).map_err(|err| ProductValidationError::InvalidImage(err.to_string()))
}

impl ProductDraft {
    /// Validate caller-supplied fields.
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use storefront::domain::{ProductDraft, ProductFields};
    ///
    /// let draft = ProductDraft::try_new(ProductFields {
    ///     name: "Lamp".into(),
    ///     description: "Warm light".into(),
    ///     price: Decimal::new(1999, 2),
    ///     stock: 3,
    ///     category: None,
    ///     image: None,
    /// })
    /// .unwrap();
    /// assert_eq!(draft.stock(), 3);
    /// ```
    pub fn try_new(fields: ProductFields) -> Result<Self, ProductValidationError> {
        Ok(Self {
            name: non_blank(&fields.name, ProductValidationError::EmptyName)?,
            description: non_blank(&fields.description, ProductValidationError::EmptyDescription)?,
            price: validate_price(fields.price)?,
            stock: validate_stock(fields.stock)?,
            category: fields.category.as_deref().map(validate_category).transpose()?,
            image: fields.image.as_deref().map(validate_image).transpose()?,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn image(&self) -> Option<&ImageUrl> {
        self.image.as_ref()
    }
}

/// Raw optional product fields for a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatchFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    /// `Some(None)` clears the stored category.
    pub category: Option<Option<String>>,
    /// `Some(None)` clears the stored cover image.
    pub image: Option<Option<String>>,
}

/// Validated partial update; `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    stock: Option<i32>,
    category: Option<Option<String>>,
    image: Option<Option<ImageUrl>>,
}

impl ProductPatch {
    /// Validate every supplied field with the same rules as [`ProductDraft`].
    pub fn try_new(fields: ProductPatchFields) -> Result<Self, ProductValidationError> {
        Ok(Self {
            name: fields
                .name
                .as_deref()
                .map(|name| non_blank(name, ProductValidationError::EmptyName))
                .transpose()?,
            description: fields
                .description
                .as_deref()
                .map(|text| non_blank(text, ProductValidationError::EmptyDescription))
                .transpose()?,
            price: fields.price.map(validate_price).transpose()?,
            stock: fields.stock.map(validate_stock).transpose()?,
            category: fields
                .category
                .map(|category| category.as_deref().map(validate_category).transpose())
                .transpose()?,
            image: fields
                .image
                .map(|image| image.as_deref().map(validate_image).transpose())
                .transpose()?,
        })
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto the stored product, keeping every field the patch omits.
    pub fn apply_to(&self, current: &Product) -> ProductDraft {
        ProductDraft {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            price: self.price.unwrap_or(current.price),
            stock: self.stock.unwrap_or(current.stock),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| current.category.clone()),
            image: self.image.clone().unwrap_or_else(|| current.image.clone()),
        }
    }
}

/// Filters for listing products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListQuery {
    pub page: PageRequest,
    /// Exact category match when present.
    pub category: Option<String>,
}

/// Product together with the users who liked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub likers: Vec<User>,
}

impl LikedProduct {
    /// Record `user` as a liker unless already present.
    ///
    /// Returns `true` when the user was added.
    pub fn add_liker(&mut self, user: User) -> bool {
        if self.likers.iter().any(|liker| liker.id() == user.id()) {
            return false;
        }
        self.likers.push(user);
        true
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
