//! Field-level validation errors
//!
//! Domain operations collect every problem with their input before touching
//! the database, and translate uniqueness violations raised by the database
//! into the same shape. A failure always names the transaction step it
//! belongs to, so callers can tell a rejected group apart from a rejected
//! membership created in the same transaction.

use serde::Serialize;
use std::fmt;

/// Message for a missing or whitespace-only value
pub const BLANK: &str = "can't be blank";
/// Message for a value that collides with a uniqueness constraint
pub const TAKEN: &str = "has already been taken";
/// Message for a duplicate membership
pub const ALREADY_MEMBER: &str = "is already a member";
/// Message for a value that does not match its expected shape
pub const INVALID_FORMAT: &str = "has invalid format";
/// Message when a membership would cross space boundaries
pub const NOT_IN_SPACE: &str = "is not a member of the space";

/// The unit of work a validation failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    User,
    Space,
    SpaceUser,
    Group,
    GroupUser,
    Post,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::User => "user",
            Step::Space => "space",
            Step::SpaceUser => "space_user",
            Step::Group => "group",
            Step::GroupUser => "group_user",
            Step::Post => "post",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message attached to an input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered collection of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a collection holding exactly one error
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// First message recorded for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Record `BLANK` for `field` when `value` is empty after trimming.
    ///
    /// Returns whether the value was present.
    pub fn require(&mut self, field: &'static str, value: &str) -> bool {
        if is_blank(value) {
            self.add(field, BLANK);
            false
        } else {
            true
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Comparison key for values unique ignoring case.
///
/// SQLite's `lower()` only folds ASCII, so keys are computed here and stored
/// alongside the original value.
pub fn case_key(value: &str) -> String {
    value.to_lowercase()
}
