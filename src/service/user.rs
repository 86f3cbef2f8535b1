//! User service

use crate::domain::{CreateUserInput, StringUuid, User};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use std::sync::Arc;
use validator::Validate;

/// Service for managing users
pub struct UserService<UR>
where
    UR: UserRepository,
{
    user_repo: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(user_repo: Arc<UR>) -> Self {
        Self { user_repo }
    }

    /// Register a new user
    pub async fn create(&self, input: CreateUserInput) -> Result<User> {
        input.validate()?;

        let user = self.user_repo.create(&input).await?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: StringUuid) -> Result<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// List users
    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<User>, i64)> {
        let offset = (page - 1) * per_page;
        let users = self.user_repo.list(offset, per_page).await?;
        let total = self.user_repo.count().await?;
        Ok((users, total))
    }
}
