//! Token command handler.
//!
//! Issues an access token for an existing user so operators can call the
//! admin API without a separate login service.

use crate::config::settings::Settings;
use crate::db::establish_async_connection_pool;
use crate::error::{AppError, AppResult};
use crate::repositories::{UserRepository, UserStore};
use crate::utils::jwt::generate_access_token;

pub struct TokenCommandHandler {
    config: Settings,
}

impl TokenCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, user_id: i32) -> AppResult<()> {
        let pool = establish_async_connection_pool(&self.config.database).await?;
        let user = UserRepository::new(pool)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))?;

        let token = generate_access_token(user.id, user.email, user.role, &self.config.jwt)?;
        tracing::info!(user_id, "Issued access token");
        println!("{}", token);
        Ok(())
    }
}
