//! Space data structures and operations

use super::types::{ActiveState, SpaceId, SpaceRole, SpaceUserId, Timestamp, UserId};
use crate::storage::StorageError;
use crate::validation::{Step, ValidationErrors, INVALID_FORMAT};
use serde::{Deserialize, Serialize};

/// A Space is the tenant container every other record is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,

    /// Human-readable name
    pub name: String,

    /// URL handle, unique across all spaces ignoring case
    pub slug: String,

    pub state: ActiveState,

    pub inserted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Space {
    /// Build a new, active Space from validated parameters
    pub fn new(params: NewSpace) -> Self {
        let now = Timestamp::now();
        Space {
            id: SpaceId::generate(),
            name: params.name,
            slug: params.slug,
            state: ActiveState::Active,
            inserted_at: now,
            updated_at: now,
        }
    }
}

/// Parameters for creating a Space
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSpace {
    pub name: String,
    pub slug: String,
}

impl NewSpace {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        if errors.require("slug", &self.slug) && !is_valid_slug(&self.slug) {
            errors.add("slug", INVALID_FORMAT);
        }
        errors
    }
}

/// Slugs are lower-case letters, digits and dashes, not starting with a dash
fn is_valid_slug(slug: &str) -> bool {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => chars
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
        _ => false,
    }
}

/// A user's identity inside one Space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceUser {
    pub id: SpaceUserId,
    pub space_id: SpaceId,
    pub user_id: UserId,
    pub role: SpaceRole,
    pub state: ActiveState,
    pub inserted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpaceUser {
    pub fn new(space_id: SpaceId, user_id: UserId, role: SpaceRole) -> Self {
        let now = Timestamp::now();
        SpaceUser {
            id: SpaceUserId::generate(),
            space_id,
            user_id,
            role,
            state: ActiveState::Active,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Check if the member has admin privileges (Owner or Admin)
    pub fn is_admin(&self) -> bool {
        matches!(self.role, SpaceRole::Owner | SpaceRole::Admin)
    }
}

/// Space, user and membership errors
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("Space not found")]
    SpaceNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("The user is not a member of the space")]
    SpaceUserNotFound,

    #[error("Invalid {step}: {errors}")]
    ValidationFailed {
        step: Step,
        errors: ValidationErrors,
    },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SpaceError {
    pub(crate) fn invalid(step: Step, field: &'static str, message: &str) -> Self {
        SpaceError::ValidationFailed {
            step,
            errors: ValidationErrors::single(field, message),
        }
    }

    /// Field errors, when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            SpaceError::ValidationFailed { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
