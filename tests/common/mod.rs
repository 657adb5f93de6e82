//! Shared fixtures: in-memory stores and a call-counting cache.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;

use emporium::authz::{AuthUser, AuthorizationGate, RolePermissions, permission};
use emporium::cache::memory::MemoryStore;
use emporium::cache::{CacheError, CacheManager, CacheStore, InvalidationPattern};
use emporium::config::JwtConfig;
use emporium::error::{AppError, AppResult};
use emporium::models::{
    LifecycleState, NewProduct, NewUser, Product, ProductFilter, ProductStatus, Scope, UpdateProduct,
    UpdateUser, User, UserFilter,
};
use emporium::repositories::{ProductStore, Repositories, UserStore};
use emporium::state::AppState;
use emporium::utils::password::hash_password;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_PASSWORD: &str = "Sup3rSecret!";

// ============================================================================
// Stores
// ============================================================================

#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
    finds: AtomicUsize,
}

impl InMemoryProducts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read calls that reached the store.
    pub fn reads(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    fn next_id(rows: &[Product]) -> i32 {
        rows.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}

#[async_trait]
impl ProductStore for InMemoryProducts {
    async fn find_by_id(&self, id: i32, scope: Scope) -> AppResult<Option<Product>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|p| p.id == id && scope.includes(p.lifecycle_state()))
            .cloned())
    }

    async fn find_all_paged(
        &self,
        filter: &ProductFilter,
        scope: Scope,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Product>, i64)> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let matching: Vec<Product> = rows
            .iter()
            .filter(|p| scope.includes(p.lifecycle_state()) && filter.matches(p))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.slug == new_product.slug) {
            return Err(AppError::Duplicate {
                entity: "products".to_string(),
                field: "slug".to_string(),
                value: new_product.slug,
            });
        }

        let now = Utc::now();
        let product = Product {
            id: Self::next_id(&rows),
            title: new_product.title,
            description: new_product.description,
            slug: new_product.slug,
            status: new_product.status,
            price: new_product.price,
            user_id: new_product.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: i32, changes: UpdateProduct) -> AppResult<Option<Product>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(product) = rows.iter_mut().find(|p| p.id == id && !p.is_archived()) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            product.title = title;
        }
        if let Some(description) = changes.description {
            product.description = Some(description);
        }
        if let Some(slug) = changes.slug {
            product.slug = slug;
        }
        if let Some(status) = changes.status {
            product.status = status;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn archive(&self, id: i32) -> AppResult<Option<Product>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|p| {
                p.id == id && LifecycleState::archive_requires().includes(p.lifecycle_state())
            })
            .map(|p| {
                p.deleted_at = Some(Utc::now());
                p.clone()
            }))
    }

    async fn restore(&self, id: i32) -> AppResult<Option<Product>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|p| {
                p.id == id && LifecycleState::restore_requires().includes(p.lifecycle_state())
            })
            .map(|p| {
                p.deleted_at = None;
                p.clone()
            }))
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with [`TEST_PASSWORD`] and return it.
    pub fn seed(&self, id: i32, email: &str, role: &str) -> User {
        let now = Utc::now();
        let user = User {
            id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: hash_password(TEST_PASSWORD).unwrap(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(user.clone());
        user
    }

    pub fn get(&self, id: i32) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all_paged(
        &self,
        filter: &UserFilter,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let rows = self.rows.lock().unwrap();
        let matching: Vec<User> = rows.iter().filter(|u| filter.matches(u)).cloned().collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: new_user.email,
            });
        }

        let now = Utc::now();
        let user = User {
            id: rows.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password: new_user.password,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, changes: UpdateUser) -> AppResult<Option<User>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(user) = rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = changes.password {
            user.password = password;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() < before)
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Memory store that counts every operation.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub deletes: AtomicUsize,
    pub pattern_deletes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ops(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
            + self.sets.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.pattern_deletes.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

#[async_trait]
impl CacheStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }

    async fn delete_pattern(&self, pattern: &InvalidationPattern) -> Result<u64, CacheError> {
        self.pattern_deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_pattern(pattern).await
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.inner.clear().await
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}

/// Cache backend that is down: every operation fails with a connection error.
#[derive(Default)]
pub struct FailingStore {
    pub attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn refuse<T>(&self) -> Result<T, CacheError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Connection("connection refused".to_string()))
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.refuse()
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), CacheError> {
        self.refuse()
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        self.refuse()
    }

    async fn delete_pattern(&self, _pattern: &InvalidationPattern) -> Result<u64, CacheError> {
        self.refuse()
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.refuse()
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.refuse()
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

// ============================================================================
// Callers and wiring
// ============================================================================

pub fn roles() -> BTreeMap<String, Vec<String>> {
    let mut roles = BTreeMap::new();
    roles.insert(
        "admin".to_string(),
        permission::ALL.iter().map(|p| p.to_string()).collect(),
    );
    roles.insert(
        "viewer".to_string(),
        vec![
            permission::PRODUCTS_INDEX.to_string(),
            permission::PRODUCTS_SHOW.to_string(),
        ],
    );
    roles.insert("nobody".to_string(), Vec::new());
    roles
}

pub fn gate() -> AuthorizationGate {
    AuthorizationGate::new(Arc::new(RolePermissions::new(&roles())))
}

pub fn caller(user_id: i32, role: &str) -> AuthUser {
    AuthUser {
        user_id,
        email: format!("user{}@example.com", user_id),
        role: role.to_string(),
    }
}

pub fn admin() -> AuthUser {
    caller(1, "admin")
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiration: 1,
    }
}

pub fn new_product(slug: &str) -> NewProduct {
    NewProduct {
        title: format!("Product {}", slug),
        description: None,
        slug: slug.to_string(),
        status: ProductStatus::Published,
        price: BigDecimal::from_str("19.99").unwrap(),
        user_id: 0,
    }
}

/// State over in-memory stores and a cache backend that is down.
pub fn state_with_failing_cache() -> (Arc<InMemoryProducts>, Arc<FailingStore>, AppState) {
    let products = Arc::new(InMemoryProducts::new());
    let users = Arc::new(InMemoryUsers::new());
    let store = Arc::new(FailingStore::new());

    let repos = Repositories::from_stores(products.clone(), users);
    let cache = CacheManager::from_store(store.clone());
    let state = AppState::from_parts(repos, cache, gate(), jwt_config());
    (products, store, state)
}

/// Everything a test needs to observe the stores and the cache.
pub struct Harness {
    pub products: Arc<InMemoryProducts>,
    pub users: Arc<InMemoryUsers>,
    pub store: Arc<CountingStore>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let products = Arc::new(InMemoryProducts::new());
        let users = Arc::new(InMemoryUsers::new());
        let store = Arc::new(CountingStore::new());

        let repos = Repositories::from_stores(products.clone(), users.clone());
        let cache = CacheManager::from_store(store.clone());
        let state = AppState::from_parts(repos, cache, gate(), jwt_config());

        Self {
            products,
            users,
            store,
            state,
        }
    }
}
