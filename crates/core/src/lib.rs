//! School Portal Core - Shared types library.
//!
//! This crate provides the types shared by the portal components:
//! - `school-portal` - Session, access guard, API client and loaders
//! - `portal-cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Anything that talks to the outside world lives in `school-portal`.
//!
//! # Modules
//!
//! - [`types`] - Roles, views, record IDs, email addresses and API records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
