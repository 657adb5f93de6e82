//! User repository for async database operations.
//!
//! Users have no archive state; `delete` removes the row.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User, UserFilter};
use crate::repositories::{contains_pattern, page_offset};
use crate::schema::users;

/// Persistence boundary for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_all_paged(
        &self,
        filter: &UserFilter,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)>;

    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// `None` when no user has the id.
    async fn update(&self, id: i32, changes: UpdateUser) -> AppResult<Option<User>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// User repository holding an async connection pool.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    fn filtered(filter: &UserFilter) -> users::BoxedQuery<'static, Pg> {
        let mut query = users::table.into_boxed();

        if let Some(email) = &filter.email {
            query = query.filter(users::email.ilike(contains_pattern(email)));
        }
        if let Some(role) = &filter.role {
            query = query.filter(users::role.eq(role.clone()));
        }

        query
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(email.eq(user_email))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_all_paged(
        &self,
        filter: &UserFilter,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let mut conn = self.pool.get().await?;

        let total: i64 = Self::filtered(filter).count().get_result(&mut conn).await?;

        let items = Self::filtered(filter)
            .select(User::as_select())
            .order(users::id.asc())
            .limit(limit)
            .offset(page_offset(page, limit))
            .load(&mut conn)
            .await?;

        Ok((items, total))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<Option<User>> {
        if changes.is_empty() {
            return self.find_by_id(user_id).await;
        }

        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn delete(&self, user_id: i32) -> AppResult<bool> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(users.filter(id.eq(user_id)))
            .execute(&mut conn)
            .await?;

        Ok(affected > 0)
    }
}
