//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! Images and likers are loaded with explicit follow-up queries rather than
//! joins on the product page, so every page costs exactly two round trips.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::AsyncPgConnection;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{
    Image, ImageUrl, LikedProduct, Product, ProductDraft, ProductId, ProductListQuery, User,
    UserId,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_image_repository::row_to_image;
use super::diesel_user_repository::row_to_user;
use super::models::{
    ImageRow, NewProductLikeRow, NewProductRow, ProductChangeset, ProductRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{images, product_likes, products, users};

type Connection<'a> = PooledConnection<'a, AsyncPgConnection>;

/// Diesel-backed implementation of the product repository port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    map_basic_pool_error(error, ProductRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_basic_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

fn to_changeset(draft: &ProductDraft) -> ProductChangeset<'_> {
    ProductChangeset {
        name: draft.name(),
        description: draft.description(),
        price: draft.price(),
        stock: draft.stock(),
        category: draft.category(),
        image_url: draft.image().map(AsRef::as_ref),
    }
}

/// Build a domain product from its row and already-loaded images.
fn row_to_product(row: ProductRow, images: Vec<Image>) -> Result<Product, ProductRepositoryError> {
    let image = row
        .image_url
        .as_deref()
        .map(ImageUrl::new)
        .transpose()
        .map_err(|err| ProductRepositoryError::query(format!("stored image url invalid: {err}")))?;
    Ok(Product {
        id: ProductId::from(row.id),
        name: row.name,
        description: row.description,
        price: row.price,
        stock: row.stock,
        category: row.category,
        image,
        images,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Group image rows by owning product, keeping query order within a group.
fn group_images(rows: Vec<ImageRow>) -> Result<HashMap<Uuid, Vec<Image>>, ProductRepositoryError> {
    let mut grouped: HashMap<Uuid, Vec<Image>> = HashMap::new();
    for row in rows {
        let product_id = row.product_id;
        let image = row_to_image(row).map_err(ProductRepositoryError::query)?;
        grouped.entry(product_id).or_default().push(image);
    }
    Ok(grouped)
}

async fn load_images(
    conn: &mut Connection<'_>,
    product_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Image>>, ProductRepositoryError> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = images::table
        .filter(images::product_id.eq_any(product_ids))
        .order((images::created_at.asc(), images::id.asc()))
        .select(ImageRow::as_select())
        .load::<ImageRow>(conn)
        .await
        .map_err(map_diesel_error)?;
    group_images(rows)
}

async fn attach_images(
    conn: &mut Connection<'_>,
    rows: Vec<ProductRow>,
) -> Result<Vec<Product>, ProductRepositoryError> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut grouped = load_images(conn, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let images = grouped.remove(&row.id).unwrap_or_default();
            row_to_product(row, images)
        })
        .collect()
}

async fn load_product(
    conn: &mut Connection<'_>,
    id: &ProductId,
) -> Result<Option<Product>, ProductRepositoryError> {
    let row = products::table
        .filter(products::id.eq(id.as_uuid()))
        .select(ProductRow::as_select())
        .first::<ProductRow>(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    match row {
        Some(row) => Ok(attach_images(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list(
        &self,
        query: &ProductListQuery,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = products::table
            .select(ProductRow::as_select())
            .order((products::created_at.asc(), products::id.asc()))
            .limit(query.page.sql_limit())
            .offset(query.page.sql_offset())
            .into_boxed();
        if let Some(category) = query.category.as_deref() {
            statement = statement.filter(products::category.eq(category));
        }

        let rows = statement
            .load::<ProductRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(count = rows.len(), "loaded product page");

        attach_images(&mut conn, rows).await
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_product(&mut conn, id).await
    }

    async fn insert(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: *id.as_uuid(),
                name: draft.name(),
                description: draft.description(),
                price: draft.price(),
                stock: draft.stock(),
                category: draft.category(),
                image_url: draft.image().map(AsRef::as_ref),
            })
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_product(row, Vec::new())
    }

    async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(products::table.filter(products::id.eq(id.as_uuid())))
            .set((to_changeset(draft), products::updated_at.eq(diesel::dsl::now)))
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => Ok(attach_images(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(products::table.filter(products::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn find_with_likers(
        &self,
        id: &ProductId,
    ) -> Result<Option<LikedProduct>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(product) = load_product(&mut conn, id).await? else {
            return Ok(None);
        };

        let liker_rows = product_likes::table
            .inner_join(users::table)
            .filter(product_likes::product_id.eq(id.as_uuid()))
            .order((product_likes::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let likers = liker_rows
            .iter()
            .map(row_to_user)
            .collect::<Result<Vec<User>, _>>()
            .map_err(|err| ProductRepositoryError::query(err.to_string()))?;

        Ok(Some(LikedProduct { product, likers }))
    }

    async fn add_like(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
    ) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(product_likes::table)
            .values(&NewProductLikeRow {
                user_id: *user_id.as_uuid(),
                product_id: *product_id.as_uuid(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }
}
