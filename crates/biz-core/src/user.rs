//! User accounts

use crate::{check_len, CoreError, CoreResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 100;
pub const MAX_NAME_LEN: usize = 100;

/// A registered account. Accounts are soft-deleted, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// PHC-formatted password hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(registration: &Registration, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: registration.email.clone(),
            password_hash,
            name: registration.name.clone(),
            is_active: true,
            is_verified: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Usable for authentication: active and not soft-deleted.
    pub fn can_sign_in(&self) -> bool {
        self.is_active && !self.is_deleted()
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// Validated registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl Registration {
    pub fn new(email: &str, password: &str, name: Option<&str>) -> CoreResult<Self> {
        let email = normalize_email(email);
        if !EMAIL_RE.is_match(&email) {
            return Err(CoreError::validation("email is not a valid address"));
        }
        check_len("password", password, MIN_PASSWORD_LEN, Some(MAX_PASSWORD_LEN))?;

        let name = name.map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = name {
            check_len("name", name, 1, Some(MAX_NAME_LEN))?;
        }

        Ok(Self {
            email,
            password: password.to_string(),
            name: name.map(str::to_string),
        })
    }
}

/// Emails compare case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_normalizes_email() {
        let reg = Registration::new("  Founder@Example.COM ", "correct-horse", Some("Kim")).unwrap();
        assert_eq!(reg.email, "founder@example.com");
        assert_eq!(reg.name.as_deref(), Some("Kim"));
    }

    #[test]
    fn test_registration_rejects_bad_input() {
        assert!(Registration::new("not-an-email", "correct-horse", None).is_err());
        assert!(Registration::new("a@b.io", "short", None).is_err());
        assert!(Registration::new("a@b.io", &"x".repeat(101), None).is_err());
        assert!(Registration::new("a@b.io", "correct-horse", Some(&"n".repeat(101))).is_err());
    }

    #[test]
    fn test_blank_name_is_dropped() {
        let reg = Registration::new("a@b.io", "correct-horse", Some("   ")).unwrap();
        assert!(reg.name.is_none());
    }

    #[test]
    fn test_soft_delete_blocks_sign_in() {
        let reg = Registration::new("a@b.io", "correct-horse", None).unwrap();
        let mut user = User::new(&reg, "hash".into());
        assert!(user.can_sign_in());
        user.soft_delete();
        assert!(!user.can_sign_in());
    }

    #[test]
    fn test_hash_is_not_serialized() {
        let reg = Registration::new("a@b.io", "correct-horse", None).unwrap();
        let user = User::new(&reg, "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
