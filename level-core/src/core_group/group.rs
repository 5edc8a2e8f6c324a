//! Group data structures

use crate::core_space::space::SpaceUser;
use crate::core_space::types::{GroupId, GroupUserId, SpaceId, SpaceUserId, Timestamp};
use crate::storage::StorageError;
use crate::validation::{Step, ValidationErrors};
use serde::{Deserialize, Serialize};

text_enum!(
    /// Group lifecycle. OPEN -> CLOSED is the only transition.
    GroupState {
        Open => "OPEN",
        Closed => "CLOSED",
    }
);

/// A named, visibility-controlled collection of members inside a Space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,

    /// Parent Space identifier
    pub space_id: SpaceId,

    /// Space user who created the group
    pub creator_id: SpaceUserId,

    /// Unique per space (ignoring case) while the group is open
    pub name: String,

    pub description: Option<String>,

    /// Private groups are only visible to their members
    pub is_private: bool,

    pub state: GroupState,

    pub inserted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Group {
    /// Build an open group in the requester's space
    pub fn new(creator: &SpaceUser, params: NewGroup) -> Self {
        let now = Timestamp::now();
        Group {
            id: GroupId::generate(),
            space_id: creator.space_id,
            creator_id: creator.id,
            name: params.name,
            description: params.description,
            is_private: params.is_private,
            state: GroupState::Open,
            inserted_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == GroupState::Open
    }

    /// Move the group to CLOSED.
    ///
    /// Returns `false` when it was already closed.
    pub fn close(&mut self) -> bool {
        if self.state == GroupState::Closed {
            return false;
        }
        self.state = GroupState::Closed;
        self.updated_at = Timestamp::now();
        true
    }
}

/// Parameters for creating a Group
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

impl NewGroup {
    pub fn new(name: impl Into<String>) -> Self {
        NewGroup {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors
    }
}

/// Membership of a space user in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUser {
    pub id: GroupUserId,
    pub space_id: SpaceId,
    pub group_id: GroupId,
    pub space_user_id: SpaceUserId,
    pub inserted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GroupUser {
    pub fn new(group: &Group, space_user: &SpaceUser) -> Self {
        let now = Timestamp::now();
        GroupUser {
            id: GroupUserId::generate(),
            space_id: group.space_id,
            group_id: group.id,
            space_user_id: space_user.id,
            inserted_at: now,
            updated_at: now,
        }
    }
}

/// Group operation errors
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// Absent, in another space, or private without membership
    #[error("Group not found")]
    NotFound,

    #[error("The user is a not a group member")]
    NotAMember,

    #[error("Invalid {step}: {errors}")]
    ValidationFailed {
        step: Step,
        errors: ValidationErrors,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl GroupError {
    pub(crate) fn invalid(step: Step, field: &'static str, message: &str) -> Self {
        GroupError::ValidationFailed {
            step,
            errors: ValidationErrors::single(field, message),
        }
    }

    /// Field errors, when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            GroupError::ValidationFailed { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
