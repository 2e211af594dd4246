//! Command implementations.
//!
//! Each command runs against a [`Portal`] over the persisted session file and
//! an in-process [`PageState`], then logs what the page would show.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use school_portal::{FileStore, PageSnapshot, PageState, Portal, PortalConfig, PortalError};
use school_portal_core::View;

pub mod admin;
pub mod data;
pub mod session;

/// Errors that end a command with a non-zero exit.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    /// The access guard sent the user elsewhere.
    #[error("Not permitted to open {requested} (showing {shown} instead)")]
    AccessDenied { requested: View, shown: View },
}

/// Portal wired to the configured state file.
pub struct Context {
    pub portal: Portal<FileStore, PageState>,
}

impl Context {
    /// Open the session file and build the portal.
    ///
    /// # Errors
    ///
    /// Returns error if the state file is unreadable or the API client cannot
    /// be built.
    pub fn open(config: &PortalConfig) -> Result<Self, CommandError> {
        let store = FileStore::open(&config.state_file).map_err(PortalError::from)?;
        let portal = Portal::new(config, store, Arc::new(PageState::standard()))?;

        let session = portal.session();
        portal.update_user_profile(
            session.as_ref().map(|s| s.username.as_str()),
            session.as_ref().map(|s| s.role.as_str()),
        );
        Ok(Self { portal })
    }

    /// Navigate to `view`, failing if the guard redirects.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::AccessDenied` when another view was rendered.
    pub fn enter(&self, view: View) -> Result<(), CommandError> {
        let nav = self.portal.navigate(view);
        if nav.view == view {
            Ok(())
        } else {
            render(&self.snapshot());
            Err(CommandError::AccessDenied {
                requested: view,
                shown: nav.view,
            })
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.portal.presenter().snapshot()
    }
}

/// Log a page snapshot.
pub fn render(page: &PageSnapshot) {
    for view in &page.active_views {
        info!(view = %view, "Active view");
    }
    if let Some(heading) = &page.heading {
        info!("{} | {}", heading.title, heading.subtitle);
    }
    if let Some(profile) = &page.profile {
        info!(username = %profile.username, role = %profile.role_label, "Signed in");
    }
    for (region, message) in &page.messages {
        if !message.text.is_empty() {
            info!(region = %region, tone = ?message.tone, "{}", message.text);
        }
    }
    for (region, items) in &page.lists {
        info!(region = %region, count = items.len(), "List");
        for item in items {
            info!("  {item}");
        }
    }
}
