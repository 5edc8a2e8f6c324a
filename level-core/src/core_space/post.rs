//! Posts authored by space members

use super::space::SpaceUser;
use super::types::{PostId, SpaceId, SpaceUserId, Timestamp};
use crate::storage::StorageError;
use crate::validation::{Step, ValidationErrors};
use serde::{Deserialize, Serialize};

text_enum!(
    /// Post lifecycle state
    PostState {
        Open => "OPEN",
        Closed => "CLOSED",
    }
);

/// A message scoped to a Space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub space_id: SpaceId,

    /// Authoring space user
    pub space_user_id: SpaceUserId,

    pub body: String,
    pub state: PostState,
    pub inserted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Post {
    pub fn new(author: &SpaceUser, params: NewPost) -> Self {
        let now = Timestamp::now();
        Post {
            id: PostId::generate(),
            space_id: author.space_id,
            space_user_id: author.id,
            body: params.body,
            state: PostState::Open,
            inserted_at: now,
            updated_at: now,
        }
    }
}

/// Parameters for creating a Post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub body: String,
}

impl NewPost {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("body", &self.body);
        errors
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Invalid {step}: {errors}")]
    ValidationFailed {
        step: Step,
        errors: ValidationErrors,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_space::types::{SpaceRole, UserId};
    use crate::validation::BLANK;

    #[test]
    fn test_post_is_scoped_to_author_space() {
        let author = SpaceUser::new(SpaceId::generate(), UserId::generate(), SpaceRole::Member);
        let post = Post::new(
            &author,
            NewPost {
                body: "Hello world".to_string(),
            },
        );

        assert_eq!(post.space_id, author.space_id);
        assert_eq!(post.space_user_id, author.id);
        assert_eq!(post.state, PostState::Open);
    }

    #[test]
    fn test_blank_body_rejected() {
        let params = NewPost {
            body: "   ".to_string(),
        };
        assert_eq!(params.validate().get("body"), Some(BLANK));
    }
}
