//! Group management
//!
//! Groups are named collections of space members. This module provides the
//! group data structures, the visibility-scoped query builder and the
//! operations that create, look up, close and join groups.
//!
//! ## Visibility
//!
//! A space user sees a group when it belongs to the same space and is either
//! public or joined by that user. Lookups that fail this check report
//! `NotFound`, exactly like a group that does not exist, so private groups
//! never leak their existence.
//!
//! ## Naming
//!
//! Group names are unique within a space, ignoring case, among OPEN groups
//! only. Closing a group releases its name.

pub mod async_manager;
pub mod group;
pub mod manager;
pub mod manager_impl;
pub mod query;

pub use async_manager::AsyncGroupManager;
pub use group::{Group, GroupError, GroupState, GroupUser, NewGroup};
pub use manager::GroupManager;
pub use manager_impl::GroupManagerImpl;
pub use query::{GroupOrder, GroupQuery, VisibilityFilter};
