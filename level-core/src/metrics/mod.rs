//! Metric names for domain operations
//!
//! Counters are recorded through the `metrics` facade. Nothing is exported
//! unless the embedding binary installs a recorder.

use metrics::{counter, describe_counter};

pub const GROUPS_CREATED: &str = "groups.created";
pub const GROUPS_CLOSED: &str = "groups.closed";
pub const GROUP_MEMBERSHIPS_CREATED: &str = "groups.memberships.created";
pub const GROUP_VALIDATION_FAILED: &str = "groups.validation.failed";
pub const SPACES_CREATED: &str = "spaces.created";
pub const USERS_CREATED: &str = "users.created";
pub const POSTS_CREATED: &str = "posts.created";

/// Register descriptions for every counter
pub fn describe_counters() {
    describe_counter!(GROUPS_CREATED, "Number of groups created");
    describe_counter!(GROUPS_CLOSED, "Number of groups moved to CLOSED");
    describe_counter!(GROUP_MEMBERSHIPS_CREATED, "Number of group memberships created");
    describe_counter!(
        GROUP_VALIDATION_FAILED,
        "Number of group operations rejected by validation"
    );
    describe_counter!(SPACES_CREATED, "Number of spaces created");
    describe_counter!(USERS_CREATED, "Number of user accounts created");
    describe_counter!(POSTS_CREATED, "Number of posts created");
}

/// Increment a counter by one
pub(crate) fn increment(name: &'static str) {
    counter!(name).increment(1);
}
