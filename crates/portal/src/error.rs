//! Top-level error type.

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Any failure surfaced by the [`crate::Portal`] facade.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Login failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}
