//! User service for administrative and profile operations.
//!
//! Admin operations are permission-gated and cached like products. Profile
//! operations act on the authenticated caller only and need no permission.

use std::sync::Arc;

use crate::authz::{AuthUser, AuthorizationGate, permission};
use crate::cache::{CacheKey, CacheManager, Cached, Invalidator, ReadThrough, WriteOp};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Page, UpdateUser, User, UserQuery};
use crate::repositories::UserStore;
use crate::services::ActionInput;
use crate::utils::password::{hash_password, verify_password};

pub const USERS_RESOURCE: &str = "users";

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserStore>,
    cache: CacheManager,
    gate: AuthorizationGate,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserStore>, cache: CacheManager, gate: AuthorizationGate) -> Self {
        Self { repo, cache, gate }
    }

    pub async fn list(
        &self,
        caller: &AuthUser,
        query: impl ActionInput<UserQuery>,
    ) -> AppResult<Cached<Page<User>>> {
        self.gate.authorize(caller, permission::USERS_INDEX)?;
        let query = query.checked()?;

        let key = CacheKey::with_params(USERS_RESOURCE, &query)?;
        let (page, limit) = query.paging();
        let filter = query.filter();
        let repo = &self.repo;

        ReadThrough::new(&self.cache)
            .fetch(&key, || async move {
                let (items, total) = repo.find_all_paged(&filter, page, limit).await?;
                Ok(Page::new(items, total, page, limit))
            })
            .await
    }

    pub async fn get(&self, caller: &AuthUser, id: i32) -> AppResult<Cached<User>> {
        self.gate.authorize(caller, permission::USERS_SHOW)?;

        let key = CacheKey::record(USERS_RESOURCE, id);
        let repo = &self.repo;

        ReadThrough::new(&self.cache)
            .fetch(&key, || async move {
                repo.find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("user", id))
            })
            .await
    }

    /// Creates a user. `new_user.password` is the plain password and is
    /// hashed before it is stored.
    pub async fn create(
        &self,
        caller: &AuthUser,
        new_user: impl ActionInput<NewUser>,
    ) -> AppResult<User> {
        self.gate.authorize(caller, permission::USERS_CREATE)?;

        let mut new_user = new_user.checked()?;
        new_user.password = hash_password(&new_user.password)?;
        let user = self.repo.create(new_user).await?;

        tracing::info!(user_id = user.id, created_by = caller.user_id, "User created");
        self.invalidate(WriteOp::Create, None).await;

        Ok(user)
    }

    /// Partial update. The password is only re-hashed when one is supplied.
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: i32,
        changes: impl ActionInput<UpdateUser>,
    ) -> AppResult<User> {
        self.gate.authorize(caller, permission::USERS_UPDATE)?;

        let mut changes = changes.checked()?;

        if let Some(password) = changes.password.take() {
            changes.password = Some(hash_password(&password)?);
        }

        let user = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("user", id))?;

        self.invalidate(WriteOp::Update, Some(id)).await;
        Ok(user)
    }

    /// Hard delete.
    pub async fn delete(&self, caller: &AuthUser, id: i32) -> AppResult<()> {
        self.gate.authorize(caller, permission::USERS_DESTROY)?;

        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("user", id));
        }

        tracing::info!(user_id = id, deleted_by = caller.user_id, "User deleted");
        self.invalidate(WriteOp::Delete, Some(id)).await;
        Ok(())
    }

    /// Resolves the holder of a verified token from the current user row.
    ///
    /// Role and email come from the store on every call and are never cached,
    /// so a demoted or deleted user loses access on the next request.
    pub async fn authenticate(&self, user_id: i32) -> AppResult<AuthUser> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Token subject no longer exists".to_string(),
            })?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }

    /// The caller's own record, always read from the store.
    pub async fn me(&self, caller: &AuthUser) -> AppResult<User> {
        self.repo
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", caller.user_id))
    }

    pub async fn update_profile(
        &self,
        caller: &AuthUser,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<User> {
        let changes = UpdateUser {
            first_name,
            last_name,
            ..Default::default()
        };
        self.update_own(caller, changes).await
    }

    pub async fn change_email(
        &self,
        caller: &AuthUser,
        current_password: &str,
        new_email: String,
    ) -> AppResult<User> {
        self.verify_current_password(caller, current_password).await?;

        if let Some(existing) = self.repo.find_by_email(&new_email).await?
            && existing.id != caller.user_id
        {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: new_email,
            });
        }

        let changes = UpdateUser {
            email: Some(new_email),
            ..Default::default()
        };
        self.update_own(caller, changes).await
    }

    pub async fn change_password(
        &self,
        caller: &AuthUser,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        self.verify_current_password(caller, current_password).await?;

        let changes = UpdateUser {
            password: Some(hash_password(new_password)?),
            ..Default::default()
        };
        self.update_own(caller, changes).await?;
        Ok(())
    }

    async fn verify_current_password(&self, caller: &AuthUser, password: &str) -> AppResult<()> {
        let user = self.me(caller).await?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::Validation {
                field: "current_password".to_string(),
                reason: "Current password is incorrect".to_string(),
            });
        }

        Ok(())
    }

    async fn update_own(&self, caller: &AuthUser, changes: UpdateUser) -> AppResult<User> {
        let user = self
            .repo
            .update(caller.user_id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("user", caller.user_id))?;

        self.invalidate(WriteOp::Update, Some(caller.user_id)).await;
        Ok(user)
    }

    async fn invalidate(&self, op: WriteOp, id: Option<i32>) {
        let invalidator = Invalidator::new(&self.cache);
        match id {
            Some(id) => invalidator.after_write(op, USERS_RESOURCE, id).await,
            None => invalidator.after_bulk_write(op, USERS_RESOURCE).await,
        }
    }
}
