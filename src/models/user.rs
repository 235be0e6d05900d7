use crate::entities::{Role, user_entity as users};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User as exposed to handlers and views. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            birth_date: user.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
            gender: user.gender,
            created_at: user.created_at,
        }
    }
}

/// `POST /login` and `POST /register` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /profile/update` body. Absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileForm {
    pub username: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
}
