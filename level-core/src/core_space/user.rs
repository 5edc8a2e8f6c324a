//! User accounts

use super::space::SpaceError;
use super::types::{ActiveState, Timestamp, UserId};
use crate::validation::{ValidationErrors, INVALID_FORMAT};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A Level account. Emails are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,

    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub state: ActiveState,
    pub inserted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Build a new account, hashing the plain-text password
    pub fn new(params: NewUser) -> Result<Self, SpaceError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(params.password.as_bytes(), &salt)
            .map_err(|e| SpaceError::PasswordHash(e.to_string()))?
            .to_string();

        let now = Timestamp::now();
        Ok(User {
            id: UserId::generate(),
            email: params.email.trim().to_string(),
            first_name: params.first_name,
            last_name: params.last_name,
            password_hash,
            state: ActiveState::Active,
            inserted_at: now,
            updated_at: now,
        })
    }

    /// Check a plain-text password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|hash| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &hash)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Parameters for creating a User
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if errors.require("email", &self.email) && !looks_like_email(self.email.trim()) {
            errors.add("email", INVALID_FORMAT);
        }
        errors.require("first_name", &self.first_name);
        errors.require("last_name", &self.last_name);

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("should be at least {} character(s)", MIN_PASSWORD_LENGTH),
            );
        }

        errors
    }
}

/// One `@` with something on both sides and no whitespace
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
