//! Product service: permission gate, read-through cache and invalidation
//! around the product store.
//!
//! Every method authorizes first. A denied caller never reaches the cache or
//! the store.

use std::sync::Arc;

use crate::authz::{AuthUser, AuthorizationGate, permission};
use crate::cache::{CacheKey, CacheManager, Cached, Invalidator, ReadThrough, WriteOp};
use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, Page, Product, ProductQuery, Scope, UpdateProduct};
use crate::repositories::ProductStore;
use crate::services::ActionInput;

/// Cache resource name. Every product key starts with it.
pub const PRODUCTS_RESOURCE: &str = "products";

/// Key base for archived listings, still under the `products*` pattern.
pub const ARCHIVED_PRODUCTS_RESOURCE: &str = "products:archived";

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductStore>,
    cache: CacheManager,
    gate: AuthorizationGate,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductStore>, cache: CacheManager, gate: AuthorizationGate) -> Self {
        Self { repo, cache, gate }
    }

    /// Active products, cached under `products[:{query}]`.
    pub async fn list(
        &self,
        caller: &AuthUser,
        query: impl ActionInput<ProductQuery>,
    ) -> AppResult<Cached<Page<Product>>> {
        self.gate.authorize(caller, permission::PRODUCTS_INDEX)?;
        let query = query.checked()?;
        self.list_scoped(PRODUCTS_RESOURCE, Scope::Active, &query).await
    }

    /// Archived products, cached under `products:archived[:{query}]`.
    pub async fn list_archived(
        &self,
        caller: &AuthUser,
        query: impl ActionInput<ProductQuery>,
    ) -> AppResult<Cached<Page<Product>>> {
        self.gate.authorize(caller, permission::PRODUCTS_ARCHIVED)?;
        let query = query.checked()?;
        self.list_scoped(ARCHIVED_PRODUCTS_RESOURCE, Scope::Archived, &query)
            .await
    }

    async fn list_scoped(
        &self,
        resource: &str,
        scope: Scope,
        query: &ProductQuery,
    ) -> AppResult<Cached<Page<Product>>> {
        let key = CacheKey::with_params(resource, query)?;
        let (page, limit) = query.paging();
        let filter = query.filter();
        let repo = &self.repo;

        ReadThrough::new(&self.cache)
            .fetch(&key, || async move {
                let (items, total) = repo.find_all_paged(&filter, scope, page, limit).await?;
                Ok(Page::new(items, total, page, limit))
            })
            .await
    }

    /// One active product, cached under `products:{id}`.
    pub async fn get(&self, caller: &AuthUser, id: i32) -> AppResult<Cached<Product>> {
        self.gate.authorize(caller, permission::PRODUCTS_SHOW)?;

        let key = CacheKey::record(PRODUCTS_RESOURCE, id);
        let repo = &self.repo;

        ReadThrough::new(&self.cache)
            .fetch(&key, || async move {
                repo.find_by_id(id, Scope::Active)
                    .await?
                    .ok_or_else(|| AppError::not_found("product", id))
            })
            .await
    }

    /// Creates a product owned by the caller.
    pub async fn create(
        &self,
        caller: &AuthUser,
        new_product: impl ActionInput<NewProduct>,
    ) -> AppResult<Product> {
        self.gate.authorize(caller, permission::PRODUCTS_CREATE)?;

        let mut new_product = new_product.checked()?;
        new_product.user_id = caller.user_id;
        let product = self.repo.create(new_product).await?;

        tracing::info!(product_id = product.id, user_id = caller.user_id, "Product created");
        Invalidator::new(&self.cache)
            .after_bulk_write(WriteOp::Create, PRODUCTS_RESOURCE)
            .await;

        Ok(product)
    }

    pub async fn update(
        &self,
        caller: &AuthUser,
        id: i32,
        changes: impl ActionInput<UpdateProduct>,
    ) -> AppResult<Product> {
        self.gate.authorize(caller, permission::PRODUCTS_UPDATE)?;
        let changes = changes.checked()?;

        let product = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("product", id))?;

        Invalidator::new(&self.cache)
            .after_write(WriteOp::Update, PRODUCTS_RESOURCE, id)
            .await;

        Ok(product)
    }

    /// Soft delete: active → archived.
    pub async fn archive(&self, caller: &AuthUser, id: i32) -> AppResult<Product> {
        self.gate.authorize(caller, permission::PRODUCTS_ARCHIVE)?;

        let product = self
            .repo
            .archive(id)
            .await?
            .ok_or_else(|| AppError::not_found("product", id))?;

        Invalidator::new(&self.cache)
            .after_write(WriteOp::Archive, PRODUCTS_RESOURCE, id)
            .await;

        Ok(product)
    }

    /// archived → active.
    pub async fn restore(&self, caller: &AuthUser, id: impl ActionInput<i32>) -> AppResult<Product> {
        self.gate.authorize(caller, permission::PRODUCTS_RESTORE)?;
        let id = id.checked()?;

        let product = self
            .repo
            .restore(id)
            .await?
            .ok_or_else(|| AppError::not_found("product", id))?;

        Invalidator::new(&self.cache)
            .after_write(WriteOp::Restore, PRODUCTS_RESOURCE, id)
            .await;

        Ok(product)
    }

    /// Purges cached product reads: one record and every listing when `id` is
    /// given, every product key otherwise.
    pub async fn clear_cache(&self, caller: &AuthUser, id: Option<i32>) -> AppResult<()> {
        self.gate.authorize(caller, permission::PRODUCTS_CLEAR_CACHE)?;

        let invalidator = Invalidator::new(&self.cache);
        match id {
            Some(id) => {
                invalidator
                    .after_write(WriteOp::ClearCache, PRODUCTS_RESOURCE, id)
                    .await
            }
            None => {
                invalidator
                    .after_bulk_write(WriteOp::ClearCache, PRODUCTS_RESOURCE)
                    .await
            }
        }

        Ok(())
    }
}
