//! Core types for Quince.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod owner;

pub use id::*;
pub use owner::{CartOwner, OwnerConflictError};
