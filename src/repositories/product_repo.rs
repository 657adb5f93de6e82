//! Product repository for async database operations.
//!
//! Every read is confined to one lifecycle scope. Archive and restore only
//! match rows in the opposite scope, so a repeated transition finds nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{LifecycleState, NewProduct, Product, ProductFilter, Scope, UpdateProduct};
use crate::repositories::{contains_pattern, page_offset};
use crate::schema::products;

/// Persistence boundary for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: i32, scope: Scope) -> AppResult<Option<Product>>;

    /// Returns one page of matching products and the total match count.
    async fn find_all_paged(
        &self,
        filter: &ProductFilter,
        scope: Scope,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Product>, i64)>;

    async fn create(&self, new_product: NewProduct) -> AppResult<Product>;

    /// Updates an active product. `None` when no active product has the id.
    async fn update(&self, id: i32, changes: UpdateProduct) -> AppResult<Option<Product>>;

    /// Marks an active product archived. `None` when no active product has the id.
    async fn archive(&self, id: i32) -> AppResult<Option<Product>>;

    /// Clears the archive marker. `None` when no archived product has the id.
    async fn restore(&self, id: i32) -> AppResult<Option<Product>>;
}

/// Product repository holding an async connection pool.
#[derive(Clone)]
pub struct ProductRepository {
    pool: AsyncDbPool,
}

impl ProductRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    fn in_scope(scope: Scope) -> Box<dyn BoxableExpression<products::table, Pg, SqlType = Bool>> {
        match scope {
            Scope::Active => Box::new(products::deleted_at.is_null()),
            Scope::Archived => Box::new(products::deleted_at.is_not_null()),
        }
    }

    fn scoped(scope: Scope) -> products::BoxedQuery<'static, Pg> {
        products::table.into_boxed().filter(Self::in_scope(scope))
    }

    fn filtered(filter: &ProductFilter, scope: Scope) -> products::BoxedQuery<'static, Pg> {
        let mut query = Self::scoped(scope);

        if let Some(title) = &filter.title {
            query = query.filter(products::title.ilike(contains_pattern(title)));
        }
        if let Some(slug) = &filter.slug {
            query = query.filter(products::slug.eq(slug.clone()));
        }
        if let Some(status) = filter.status {
            query = query.filter(products::status.eq(status));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(products::user_id.eq(user_id));
        }

        query
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_by_id(&self, id: i32, scope: Scope) -> AppResult<Option<Product>> {
        let mut conn = self.pool.get().await?;

        Self::scoped(scope)
            .filter(products::id.eq(id))
            .select(Product::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_all_paged(
        &self,
        filter: &ProductFilter,
        scope: Scope,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Product>, i64)> {
        let mut conn = self.pool.get().await?;

        let total: i64 = Self::filtered(filter, scope)
            .count()
            .get_result(&mut conn)
            .await?;

        let items = Self::filtered(filter, scope)
            .select(Product::as_select())
            .order(products::id.asc())
            .limit(limit)
            .offset(page_offset(page, limit))
            .load(&mut conn)
            .await?;

        Ok((items, total))
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(products::table)
            .values(&new_product)
            .returning(Product::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, changes: UpdateProduct) -> AppResult<Option<Product>> {
        if changes.is_empty() {
            return self.find_by_id(id, Scope::Active).await;
        }

        let mut conn = self.pool.get().await?;

        diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(Self::in_scope(Scope::Active)),
        )
        .set(&changes)
        .returning(Product::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(AppError::from)
    }

    async fn archive(&self, id: i32) -> AppResult<Option<Product>> {
        let mut conn = self.pool.get().await?;

        diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(Self::in_scope(LifecycleState::archive_requires())),
        )
        .set(products::deleted_at.eq(Some(Utc::now())))
        .returning(Product::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(AppError::from)
    }

    async fn restore(&self, id: i32) -> AppResult<Option<Product>> {
        let mut conn = self.pool.get().await?;

        diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(Self::in_scope(LifecycleState::restore_requires())),
        )
        .set(products::deleted_at.eq(None::<DateTime<Utc>>))
        .returning(Product::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(AppError::from)
    }
}
