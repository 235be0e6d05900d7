use actix_web::web;
use bcrypt::{hash, verify, DEFAULT_COST};
use crate::error::{AppError, AppResult};

// bcrypt only looks at the first 72 bytes
const MAX_PASSWORD_BYTES: usize = 72;

#[cfg(not(test))]
const HASH_COST: u32 = DEFAULT_COST;
#[cfg(test)]
const HASH_COST: u32 = 4;

/// 验证密码
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::ValidationError(
            "Password must not be empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// 对密码进行哈希 (runs on the blocking pool)
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    web::block(move || hash(password, HASH_COST))
        .await
        .map_err(|e| AppError::InternalError(format!("password hashing aborted: {}", e)))?
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {}", e)))
}

pub async fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    web::block(move || verify(password, &hash))
        .await
        .map_err(|e| AppError::InternalError(format!("password verification aborted: {}", e)))?
        .map_err(|e| AppError::InternalError(format!("password verification failed: {}", e)))
}
