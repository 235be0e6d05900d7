use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::{UpdateProfileForm, UserResponse};
use crate::utils::{hash_password, non_blank, validate_email, validate_password, validate_phone, verify_password};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

pub(crate) const MAX_USERNAME_LEN: usize = 64;

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Public view of a user, `None` when the id no longer exists.
    pub async fn find_public(&self, user_id: i64) -> AppResult<Option<UserResponse>> {
        let user = users::Entity::find_by_id(user_id).one(&self.pool).await?;
        Ok(user.map(UserResponse::from))
    }

    /// 获取用户个人资料
    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        self.find_public(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// 更新用户Profile
    ///
    /// Blank fields are left untouched. A new password is only accepted
    /// together with the correct current one.
    pub async fn update_profile(
        &self,
        user_id: i64,
        form: UpdateProfileForm,
    ) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let new_password = form.new_password.filter(|p| !p.is_empty());
        let password_hash = match new_password {
            Some(new_password) => {
                let current = form.current_password.unwrap_or_default();
                if current.is_empty() || !verify_password(&current, &user.password_hash).await? {
                    return Err(AppError::ValidationError(
                        "Current password is incorrect".to_string(),
                    ));
                }
                validate_password(&new_password)?;
                Some(hash_password(&new_password).await?)
            }
            None => None,
        };

        let username = non_blank(form.username.as_deref()).filter(|u| *u != user.username);
        if let Some(username) = &username {
            validate_username(username)?;
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .one(&self.pool)
                .await?
                .is_some();
            if taken {
                return Err(AppError::ValidationError(
                    "Username is already taken".to_string(),
                ));
            }
        }

        let email = non_blank(form.email.as_deref());
        if let Some(email) = &email {
            validate_email(email)?;
        }
        let phone = non_blank(form.phone.as_deref());
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        let birth_date = non_blank(form.birth_date.as_deref())
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    AppError::ValidationError("Invalid birth date format".to_string())
                })
            })
            .transpose()?;

        let mut model = user.into_active_model();
        if let Some(username) = username {
            model.username = Set(username);
        }
        if let Some(hash) = password_hash {
            model.password_hash = Set(hash);
        }
        if let Some(v) = non_blank(form.first_name.as_deref()) {
            model.first_name = Set(Some(v));
        }
        if let Some(v) = non_blank(form.last_name.as_deref()) {
            model.last_name = Set(Some(v));
        }
        if let Some(v) = email {
            model.email = Set(Some(v));
        }
        if let Some(v) = phone {
            model.phone = Set(Some(v));
        }
        if let Some(d) = birth_date {
            model.birth_date = Set(Some(d));
        }
        if let Some(v) = non_blank(form.gender.as_deref()) {
            model.gender = Set(Some(v));
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(&self.pool).await?;
        log::info!("Profile updated for user {}", updated.id);
        Ok(updated.into())
    }
}

pub(crate) fn validate_username(username: &str) -> AppResult<()> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::ValidationError(format!(
            "Username must be between 1 and {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::models::CredentialsForm;
    use crate::services::AuthService;

    async fn register(pool: &DatabaseConnection, username: &str, password: &str) -> UserResponse {
        AuthService::new(pool.clone())
            .register(&CredentialsForm {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_find_public_missing_user() {
        let service = UserService::new(memory_pool().await);
        assert!(service.find_public(99).await.unwrap().is_none());
        assert!(matches!(
            service.get_profile(99).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_fields() {
        let pool = memory_pool().await;
        let alice = register(&pool, "alice", "pw1").await;
        let service = UserService::new(pool);

        let updated = service
            .update_profile(
                alice.id,
                UpdateProfileForm {
                    first_name: Some("Alice".to_string()),
                    email: Some("alice@example.com".to_string()),
                    birth_date: Some("1990-05-01".to_string()),
                    phone: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "alice");
        assert_eq!(updated.first_name.as_deref(), Some("Alice"));
        assert_eq!(updated.email.as_deref(), Some("alice@example.com"));
        assert_eq!(updated.birth_date.as_deref(), Some("1990-05-01"));
        assert!(updated.phone.is_none());
    }

    #[tokio::test]
    async fn test_password_change_requires_current_password() {
        let pool = memory_pool().await;
        let alice = register(&pool, "alice", "pw1").await;
        let service = UserService::new(pool.clone());

        let err = service
            .update_profile(
                alice.id,
                UpdateProfileForm {
                    current_password: Some("wrong".to_string()),
                    new_password: Some("pw2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Current password is incorrect");

        service
            .update_profile(
                alice.id,
                UpdateProfileForm {
                    current_password: Some("pw1".to_string()),
                    new_password: Some("pw2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let auth = AuthService::new(pool);
        let login = |password: &str| CredentialsForm {
            username: "alice".to_string(),
            password: password.to_string(),
        };
        assert!(auth.login(&login("pw1")).await.is_err());
        assert!(auth.login(&login("pw2")).await.is_ok());
    }

    #[tokio::test]
    async fn test_username_change_keeps_uniqueness() {
        let pool = memory_pool().await;
        register(&pool, "alice", "pw1").await;
        let bob = register(&pool, "bob", "pw1").await;
        let service = UserService::new(pool);

        let err = service
            .update_profile(
                bob.id,
                UpdateProfileForm {
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Username is already taken");

        let renamed = service
            .update_profile(
                bob.id,
                UpdateProfileForm {
                    username: Some("robert".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.username, "robert");
    }
}
