//! Test utilities for Level
//!
//! Fixtures that seed a store with users and spaces so tests can start from a
//! realistic tenant instead of building rows by hand.

pub mod fixtures;

pub use fixtures::*;
