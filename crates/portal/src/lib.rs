//! School portal client library.
//!
//! Keeps the signed-in session in a key-value store, decides which view
//! each role may open, and drives a [`Presenter`] with views, menus and data
//! fetched from the portal REST API.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use school_portal::{FileStore, PageState, Portal, PortalConfig};
//! use school_portal_core::View;
//!
//! # async fn demo() -> Result<(), school_portal::PortalError> {
//! let config = PortalConfig::from_env()?;
//! let store = FileStore::open(&config.state_file)?;
//! let portal = Portal::new(&config, store, Arc::new(PageState::standard()))?;
//! let startup = portal.start();
//! portal.navigate(View::Timetable);
//! # let _ = startup;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod loaders;
pub mod nav;
pub mod policy;
pub mod portal;
pub mod presenter;
pub mod router;
pub mod session;
pub mod slider;
pub mod storage;
pub mod views;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, Authenticator, Credentials, LoginOutcome};
pub use config::{ApiConfig, ConfigError, PortalConfig};
pub use error::PortalError;
pub use loaders::{LoadOutcome, Loaders, SelectSource};
pub use policy::RolePolicy;
pub use portal::{Portal, Startup};
pub use presenter::{PageSnapshot, PageState, Presenter, Tone};
pub use router::{Navigation, NavigationToken, ViewRouter};
pub use session::{Session, SessionStore};
pub use slider::{HeroSlider, SliderHandle};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
