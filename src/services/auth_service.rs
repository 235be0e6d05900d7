use crate::config::AdminConfig;
use crate::entities::{Role, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{CredentialsForm, UserResponse};
use crate::services::user_service::validate_username;
use crate::utils::{hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const USERNAME_TAKEN: &str = "A user with this username already exists";

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Creates a client-role account. Duplicate usernames are rejected
    /// without touching the existing row.
    pub async fn register(&self, form: &CredentialsForm) -> AppResult<UserResponse> {
        let username = form.username.trim();
        validate_username(username)?;
        validate_password(&form.password)?;

        // 检查用户名是否已注册
        if self.find_by_username(username).await?.is_some() {
            return Err(AppError::ValidationError(USERNAME_TAKEN.to_string()));
        }

        let user = self
            .insert_user(username, &form.password, Role::Client)
            .await?;
        log::info!("Registered user {} ({})", user.id, user.username);
        Ok(user.into())
    }

    pub async fn login(&self, form: &CredentialsForm) -> AppResult<UserResponse> {
        let user = self
            .find_by_username(form.username.trim())
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

        // 验证密码
        if !verify_password(&form.password, &user.password_hash).await? {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user.into())
    }

    /// Creates the configured admin account if the username is free.
    /// Returns whether a row was inserted.
    pub async fn ensure_admin(&self, admin: &AdminConfig) -> AppResult<bool> {
        let username = admin.username.trim();
        validate_username(username)?;
        validate_password(&admin.password)?;

        if let Some(existing) = self.find_by_username(username).await? {
            if existing.role != Role::Admin {
                log::warn!(
                    "Configured admin username {} belongs to a {} account, leaving it unchanged",
                    username,
                    existing.role
                );
            }
            return Ok(false);
        }

        let user = self.insert_user(username, &admin.password, Role::Admin).await?;
        log::info!("Created admin account {} ({})", user.id, user.username);
        Ok(true)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> AppResult<users::Model> {
        let password_hash = hash_password(password).await?;
        let now = Utc::now();

        let inserted = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            // lost a race against a concurrent registration
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::ValidationError(USERNAME_TAKEN.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
