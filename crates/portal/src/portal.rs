//! Application facade tying session, router, loaders and slider together.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use school_portal_core::{Role, View};

use crate::api::ApiClient;
use crate::auth::{Authenticator, Credentials};
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::loaders::{Loaders, SelectSource};
use crate::presenter::{Presenter, Profile, Tone, elements};
use crate::router::{Navigation, NavigationToken, ViewRouter};
use crate::session::{Session, SessionStore};
use crate::slider::{HeroSlider, SliderHandle};
use crate::storage::KeyValueStore;

/// What [`Portal::start`] kicked off.
#[derive(Debug)]
pub struct Startup {
    /// Session found in storage, if any.
    pub session: Option<Session>,
    pub classes: JoinHandle<SelectSource>,
    pub subjects: JoinHandle<SelectSource>,
}

/// The school portal client.
#[derive(Debug)]
pub struct Portal<S, P> {
    router: ViewRouter<S, P>,
    loaders: Loaders<P>,
    auth: Authenticator,
    slider: HeroSlider,
}

impl<S: KeyValueStore, P: Presenter + 'static> Portal<S, P> {
    /// Build a portal from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API client cannot be built.
    pub fn new(config: &PortalConfig, store: S, presenter: Arc<P>) -> Result<Self, PortalError> {
        let api = ApiClient::new(&config.api)?;
        let router = ViewRouter::new(SessionStore::new(store), presenter);
        Ok(Self::from_parts(router, api, config.demo_login, HeroSlider::new(config.hero_interval)))
    }

    /// Build a portal around an existing router, e.g. one with a custom policy.
    pub fn from_parts(router: ViewRouter<S, P>, api: ApiClient, demo_login: bool, slider: HeroSlider) -> Self {
        let loaders = Loaders::new(api.clone(), Arc::clone(router.presenter()));
        Self {
            router,
            loaders,
            auth: Authenticator::new(api, demo_login),
            slider,
        }
    }

    pub const fn router(&self) -> &ViewRouter<S, P> {
        &self.router
    }

    pub const fn loaders(&self) -> &Loaders<P> {
        &self.loaders
    }

    pub fn presenter(&self) -> &Arc<P> {
        self.router.presenter()
    }

    /// Current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.router.sessions().restore()
    }

    /// Token for loads started on behalf of the current view.
    #[must_use]
    pub fn token(&self) -> NavigationToken {
        self.router.token()
    }

    /// Restore the stored session, show it, and start the dropdown loads.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> Startup {
        let session = self.session();
        match &session {
            Some(session) => {
                info!(username = %session.username, role = %session.role, "Restored session");
                self.update_user_profile(Some(session.username.as_str()), Some(session.role.as_str()));
            }
            None => self.update_user_profile(None, None),
        }

        let (classes, subjects) = self.loaders.spawn_select_loads();
        Startup {
            session,
            classes,
            subjects,
        }
    }

    /// Sign in, persist the session and open the role's dashboard.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are refused or the session cannot be
    /// stored. The message is also shown in the login status region.
    #[instrument(skip(self, credentials), fields(username = %credentials.username, role = %credentials.role))]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Navigation, PortalError> {
        let presenter = Arc::clone(self.router.presenter());

        let outcome = match self.auth.login(credentials).await {
            Ok(outcome) => outcome,
            Err(err) => {
                presenter.show_message(elements::LOGIN_MSG, &err.to_string(), Tone::Error);
                return Err(err.into());
            }
        };

        let session = match self.router.sessions_mut().save(
            &credentials.username,
            credentials.role.as_str(),
            outcome.user(),
        ) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "Could not store session");
                presenter.show_message(
                    elements::LOGIN_MSG,
                    "Signed in, but the session could not be saved. Please try again.",
                    Tone::Error,
                );
                return Err(err.into());
            }
        };

        let text = if outcome.is_demo() {
            "Login successful (offline demo account)"
        } else {
            "Login successful"
        };
        presenter.show_message(elements::LOGIN_MSG, text, Tone::Success);
        self.update_user_profile(Some(session.username.as_str()), Some(session.role.as_str()));
        Ok(self.router.navigate_to(credentials.role.dashboard()))
    }

    /// Forget the session and return to the home view.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be removed from storage.
    pub fn logout(&mut self) -> Result<Navigation, PortalError> {
        self.router.sessions_mut().clear()?;
        info!("Signed out");
        self.update_user_profile(None, None);
        Ok(self.router.navigate_to(View::Home))
    }

    /// Open a view, subject to the access guard.
    pub fn navigate(&self, view: View) -> Navigation {
        self.router.navigate_to(view)
    }

    /// Show the user badge and the role's menu, or hide both.
    ///
    /// A role string the policy does not know still hides `login`, but only
    /// the public links are shown.
    pub fn update_user_profile(&self, username: Option<&str>, role: Option<&str>) {
        let presenter = self.router.presenter();
        let identity = username
            .filter(|name| !name.is_empty())
            .zip(role.filter(|role| !role.is_empty()));

        let Some((username, role)) = identity else {
            presenter.show_profile(None);
            self.router.update_menu_for_role(None);
            return;
        };

        presenter.show_profile(Some(&Profile {
            username: username.to_owned(),
            role_label: capitalize(role),
        }));

        if role.parse::<Role>().is_err() {
            warn!(%role, "Unknown role, showing public links only");
        }
        self.router.update_menu_for_role(Some(role));
    }

    /// Start the hero slideshow over `slide_count` slides.
    pub fn start_hero_slider(&self, slide_count: usize) -> Option<SliderHandle> {
        self.slider
            .start(Arc::clone(self.router.presenter()), slide_count)
    }

    /// Display name of the current session.
    pub fn username(&self) -> Option<String> {
        self.session().map(|session| session.username)
    }
}

/// Upper-case the first character.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::config::ApiConfig;
    use crate::presenter::PageState;
    use crate::storage::MemoryStore;

    fn portal(store: MemoryStore) -> Portal<MemoryStore, PageState> {
        let api = ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:9/api".parse().unwrap(),
            timeout: Some(Duration::from_secs(1)),
        })
        .unwrap();
        let router = ViewRouter::new(SessionStore::new(store), Arc::new(PageState::standard()));
        Portal::from_parts(router, api, true, HeroSlider::new(Duration::from_millis(8000)))
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("parent"), "Parent");
        assert_eq!(capitalize("élève"), "Élève");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_update_user_profile_shows_badge_and_menu() {
        let portal = portal(MemoryStore::new());
        portal.update_user_profile(Some("ada"), Some("student"));

        let page = portal.presenter().snapshot();
        let profile = page.profile.unwrap();
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.role_label, "Student");
        assert!(page.visible_links.contains(&View::Cbt));
        assert!(!page.visible_links.contains(&View::Login));
        assert!(page.nav_sections_visible);
    }

    #[test]
    fn test_update_user_profile_needs_both_fields() {
        let portal = portal(MemoryStore::new());
        portal.update_user_profile(Some("ada"), None);

        let page = portal.presenter().snapshot();
        assert_eq!(page.profile, None);
        assert!(page.visible_links.contains(&View::Login));
        assert!(!page.nav_sections_visible);
    }

    #[test]
    fn test_update_user_profile_with_unknown_role() {
        let portal = portal(MemoryStore::new());
        portal.update_user_profile(Some("x"), Some("janitor"));

        let page = portal.presenter().snapshot();
        assert_eq!(page.profile.unwrap().role_label, "Janitor");
        assert_eq!(page.visible_links.into_iter().collect::<Vec<_>>(), vec![View::Home]);
        assert!(page.nav_sections_visible);
    }

    #[test]
    fn test_logout_clears_session_and_goes_home() {
        let mut portal = portal(MemoryStore::new());
        portal
            .router
            .sessions_mut()
            .save("ada", "student", &json!({"id": 3}))
            .unwrap();
        assert_eq!(portal.username().as_deref(), Some("ada"));

        let nav = portal.logout().unwrap();
        assert_eq!(nav.view, View::Home);
        assert!(portal.session().is_none());
        assert_eq!(portal.presenter().snapshot().profile, None);
    }

    #[test]
    fn test_logout_surfaces_storage_failure() {
        let mut portal = portal(MemoryStore::new().fail_writes_to("userRole"));
        assert!(matches!(portal.logout(), Err(PortalError::Storage(_))));
    }
}
