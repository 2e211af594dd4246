//! Sign-in against the portal API with an offline demo fallback.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, instrument, warn};

use school_portal_core::Role;

use crate::api::{ApiClient, ApiError};

/// Accounts accepted when the API cannot be reached, as `(role, password)`.
///
/// Matched on role and password only; the typed username is kept as is.
pub const DEMO_ACCOUNTS: [(Role, &str); 4] = [
    (Role::Admin, "admin123"),
    (Role::Teacher, "teacher123"),
    (Role::Student, "student123"),
    (Role::Parent, "parent123"),
];

/// What the user typed into the login form.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub role: Role,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            role,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// How a login succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The API accepted the credentials; holds its response.
    Remote(Value),
    /// The API was unreachable and a demo account matched.
    Demo(Value),
}

impl LoginOutcome {
    /// User blob to persist with the session.
    #[must_use]
    pub const fn user(&self) -> &Value {
        match self {
            Self::Remote(user) | Self::Demo(user) => user,
        }
    }

    #[must_use]
    pub const fn is_demo(&self) -> bool {
        matches!(self, Self::Demo(_))
    }
}

/// Login failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API answered with an error message.
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The API failed in a way that is neither a rejection nor unreachability.
    #[error("Login failed: {0}")]
    Api(ApiError),
}

/// Checks credentials against the API.
#[derive(Debug, Clone)]
pub struct Authenticator {
    api: ApiClient,
    demo_login: bool,
}

impl Authenticator {
    pub const fn new(api: ApiClient, demo_login: bool) -> Self {
        Self { api, demo_login }
    }

    /// Sign in remotely, falling back to [`DEMO_ACCOUNTS`] on transport failure.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the API's message, or
    /// `AuthError::InvalidCredentials` when the API is unreachable and no demo
    /// account matches.
    #[instrument(skip(self, credentials), fields(username = %credentials.username, role = %credentials.role))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        match self.api.login(credentials).await {
            Ok(user) => {
                info!("Signed in");
                Ok(LoginOutcome::Remote(user))
            }
            Err(ApiError::Application(message)) => Err(AuthError::Rejected(message)),
            Err(err) if err.is_transport() => {
                if !self.demo_login {
                    warn!(error = %err, "Login API unreachable and demo login disabled");
                    return Err(AuthError::InvalidCredentials);
                }
                demo_login(credentials).ok_or(AuthError::InvalidCredentials)
            }
            Err(err) => Err(AuthError::Api(err)),
        }
    }
}

/// Match `credentials` against the demo table.
#[must_use]
pub fn demo_login(credentials: &Credentials) -> Option<LoginOutcome> {
    let matched = DEMO_ACCOUNTS.iter().any(|(role, password)| {
        *role == credentials.role && *password == credentials.password.expose_secret()
    });
    if !matched {
        return None;
    }

    warn!(role = %credentials.role, "API unreachable, signed in with demo account");
    Some(LoginOutcome::Demo(json!({
        "username": credentials.username,
        "role": credentials.role,
        "demo": true,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_login_matches_role_and_password() {
        let outcome = demo_login(&Credentials::new("mrs.okafor", "teacher123", Role::Teacher)).unwrap();
        assert!(outcome.is_demo());
        assert_eq!(outcome.user()["username"], "mrs.okafor");
        assert_eq!(outcome.user()["role"], "teacher");
    }

    #[test]
    fn test_demo_login_rejects_password_of_other_role() {
        assert!(demo_login(&Credentials::new("x", "admin123", Role::Parent)).is_none());
        assert!(demo_login(&Credentials::new("x", "wrong", Role::Admin)).is_none());
    }

    #[test]
    fn test_every_demo_account_signs_in() {
        for (role, password) in DEMO_ACCOUNTS {
            assert!(demo_login(&Credentials::new(role.as_str(), password, role)).is_some());
        }
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("ada", "student123", Role::Student);
        let debug_output = format!("{credentials:?}");
        assert!(debug_output.contains("ada"));
        assert!(!debug_output.contains("student123"));
    }
}
