use regex::Regex;
use std::sync::OnceLock;
use crate::error::{AppError, AppResult};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("valid email regex")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| {
        Regex::new(r"^\+?[0-9 ()\-]{5,20}$").expect("valid phone regex")
    })
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !email_regex().is_match(email) {
        return Err(AppError::ValidationError("Invalid email format".to_string()));
    }
    Ok(())
}

/// Loose phone check: digits, spaces, dashes, parentheses, optional leading `+`.
pub fn validate_phone(phone: &str) -> AppResult<()> {
    if !phone_regex().is_match(phone) {
        return Err(AppError::ValidationError("Invalid phone format".to_string()));
    }
    Ok(())
}

/// Trims a form value; blank becomes `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
