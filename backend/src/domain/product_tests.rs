//! Tests for product validation and patch merging.

use chrono::Utc;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use serde_json::json;

use super::*;
use crate::domain::{Email, Role, User, UserId, Username};

#[fixture]
fn fields() -> ProductFields {
    ProductFields {
        name: "Desk lamp".to_owned(),
        description: "Warm light".to_owned(),
        price: Decimal::new(1999, 2),
        stock: 5,
        category: Some("lighting".to_owned()),
        image: None,
    }
}

#[fixture]
fn stored() -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::random(),
        name: "Desk lamp".to_owned(),
        description: "Warm light".to_owned(),
        price: Decimal::new(1999, 2),
        stock: 5,
        category: Some("lighting".to_owned()),
        image: None,
        images: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn user(name: &str) -> User {
    User::new(
        UserId::random(),
        Email::new(format!("{name}@example.com")).expect("email"),
        Username::new(name).expect("username"),
        Role::User,
    )
}

#[rstest]
fn draft_trims_text_fields(mut fields: ProductFields) {
    fields.name = "  Desk lamp ".to_owned();
    let draft = ProductDraft::try_new(fields).expect("valid draft");
    assert_eq!(draft.name(), "Desk lamp");
    assert_eq!(draft.category(), Some("lighting"));
}

#[rstest]
#[case::blank_name(|f: &mut ProductFields| f.name = " ".into(), ProductValidationError::EmptyName)]
#[case::blank_description(|f: &mut ProductFields| f.description = String::new(), ProductValidationError::EmptyDescription)]
#[case::zero_price(|f: &mut ProductFields| f.price = Decimal::ZERO, ProductValidationError::NonPositivePrice)]
#[case::negative_price(|f: &mut ProductFields| f.price = Decimal::new(-5, 0), ProductValidationError::NonPositivePrice)]
#[case::rounds_to_zero(|f: &mut ProductFields| f.price = Decimal::new(1, 3), ProductValidationError::NonPositivePrice)]
#[case::zero_stock(|f: &mut ProductFields| f.stock = 0, ProductValidationError::NonPositiveStock)]
#[case::huge_stock(|f: &mut ProductFields| f.stock = i64::MAX, ProductValidationError::StockOutOfRange)]
#[case::blank_category(|f: &mut ProductFields| f.category = Some(" ".into()), ProductValidationError::EmptyCategory)]
fn draft_rejects_invalid_fields(
    mut fields: ProductFields,
    #[case] mutate: fn(&mut ProductFields),
    #[case] expected: ProductValidationError,
) {
    mutate(&mut fields);
    let err = ProductDraft::try_new(fields).expect_err("invalid draft");
    assert_eq!(err, expected);
}

#[rstest]
fn draft_rejects_bad_image_url(mut fields: ProductFields) {
    fields.image = Some("not a url".to_owned());
    let err = ProductDraft::try_new(fields).expect_err("invalid image");
    assert_eq!(err.field(), "image");
}

#[rstest]
fn draft_rounds_price_to_cents(mut fields: ProductFields) {
    fields.price = Decimal::new(19_999, 3);
    let draft = ProductDraft::try_new(fields).expect("valid draft");
    assert_eq!(draft.price(), Decimal::new(2000, 2));
}

#[rstest]
fn patch_keeps_unspecified_fields(stored: Product) {
    let patch = ProductPatch::try_new(ProductPatchFields {
        stock: Some(9),
        ..ProductPatchFields::default()
    })
    .expect("valid patch");

    let merged = patch.apply_to(&stored);
    assert_eq!(merged.stock(), 9);
    assert_eq!(merged.name(), stored.name);
    assert_eq!(merged.price(), stored.price);
    assert_eq!(merged.category(), stored.category.as_deref());
}

#[rstest]
fn patch_clears_category_and_image_on_explicit_null(mut stored: Product) {
    stored.image = Some(ImageUrl::new("https://cdn.example.com/lamp.png").expect("url"));
    let patch = ProductPatch::try_new(ProductPatchFields {
        category: Some(None),
        image: Some(None),
        ..ProductPatchFields::default()
    })
    .expect("valid patch");

    let merged = patch.apply_to(&stored);
    assert_eq!(merged.category(), None);
    assert_eq!(merged.image(), None);
    assert_eq!(merged.name(), stored.name);
}

#[rstest]
fn patch_still_rejects_blank_category() {
    let err = ProductPatch::try_new(ProductPatchFields {
        category: Some(Some("   ".into())),
        ..ProductPatchFields::default()
    })
    .expect_err("blank category");
    assert_eq!(err, ProductValidationError::EmptyCategory);
}

#[rstest]
fn drafts_accept_values_beyond_typical_sizes(mut fields: ProductFields) {
    fields.name = "n".repeat(300);
    fields.category = Some("c".repeat(300));
    fields.price = Decimal::new(1_000_000_000_000, 0);
    let draft = ProductDraft::try_new(fields).expect("valid draft");
    assert_eq!(draft.name().len(), 300);
    assert_eq!(draft.price(), Decimal::new(1_000_000_000_000, 0));
}

#[rstest]
fn patch_validates_supplied_fields() {
    let err = ProductPatch::try_new(ProductPatchFields {
        price: Some(Decimal::NEGATIVE_ONE),
        ..ProductPatchFields::default()
    })
    .expect_err("invalid patch");
    assert_eq!(err, ProductValidationError::NonPositivePrice);
}

#[rstest]
fn empty_patch_is_detected() {
    let patch = ProductPatch::try_new(ProductPatchFields::default()).expect("valid patch");
    assert!(patch.is_empty());
}

#[rstest]
fn product_id_parses_uuid_strings() {
    assert!("3fa85f64-5717-4562-b3fc-2c963f66afa6".parse::<ProductId>().is_ok());
    assert_eq!(
        "42".parse::<ProductId>().expect_err("not a uuid"),
        ProductValidationError::InvalidId
    );
}

#[rstest]
fn product_serialises_price_as_number(stored: Product) {
    let value = serde_json::to_value(&stored).expect("serialise");
    assert_eq!(value["price"], json!(19.99));
    assert_eq!(value["category"], json!("lighting"));
    assert_eq!(value["images"], json!([]));
    assert!(value.get("createdAt").is_some());
}

#[rstest]
fn liking_twice_keeps_a_single_entry(stored: Product) {
    let ada = user("ada");
    let mut liked = LikedProduct {
        product: stored,
        likers: Vec::new(),
    };

    assert!(liked.add_liker(ada.clone()));
    assert!(!liked.add_liker(ada));
    assert_eq!(liked.likers.len(), 1);
}

#[rstest]
fn liked_product_flattens_product_fields(stored: Product) {
    let id = stored.id;
    let liked = LikedProduct {
        product: stored,
        likers: vec![user("ada")],
    };
    let value = serde_json::to_value(&liked).expect("serialise");
    assert_eq!(value["id"], json!(id.to_string()));
    assert_eq!(value["likers"][0]["username"], json!("ada"));
}
