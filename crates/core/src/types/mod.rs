//! Core types for the school portal.
//!
//! This module provides type-safe wrappers for the portal's domain concepts.

pub mod email;
pub mod id;
pub mod records;
pub mod role;
pub mod view;

pub use email::{Email, EmailError};
pub use id::*;
pub use records::*;
pub use role::{ParseRoleError, Role};
pub use view::{ParseViewError, View};
