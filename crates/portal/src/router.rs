//! View router and access guard.
//!
//! # Navigation
//!
//! [`ViewRouter::navigate_to`] resolves a requested view against the
//! current session and the role policy:
//!
//! 1. No usable session and the view is not public -> redirect to `login`.
//! 2. Signed in but the role may not open the view -> redirect to the role's
//!    own dashboard.
//! 3. Otherwise render the view.
//!
//! A session whose role string is unknown to the policy is treated as no
//! session. Redirects run in a loop bounded by [`MAX_REDIRECTS`]; a role
//! whose dashboard is missing from the registry or not permitted by the
//! policy fails closed to `login`.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, warn};

use school_portal_core::{Role, View};

use crate::nav::NavMenu;
use crate::policy::RolePolicy;
use crate::presenter::Presenter;
use crate::session::{Session, SessionStore};
use crate::storage::KeyValueStore;
use crate::views::ViewRegistry;

/// Redirects allowed before the router gives up and renders `login`.
pub const MAX_REDIRECTS: u8 = 2;

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// View that was asked for.
    pub requested: View,
    /// View that was rendered.
    pub view: View,
    /// Redirects taken between the two.
    pub redirects: u8,
}

impl Navigation {
    #[must_use]
    pub const fn was_redirected(&self) -> bool {
        self.redirects > 0
    }
}

/// What the guard decided for one candidate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Render,
    Redirect(View),
    FailClosed,
}

/// Who is asking, as far as permissions go.
#[derive(Clone, Copy)]
enum Access<'a> {
    Anonymous,
    Signed(Role, &'a BTreeSet<View>),
}

/// Monotonic counter bumped on every rendered navigation.
#[derive(Debug, Clone, Default)]
pub struct NavigationEpoch(Arc<AtomicU64>);

impl NavigationEpoch {
    /// Token bound to the current navigation.
    #[must_use]
    pub fn token(&self) -> NavigationToken {
        NavigationToken {
            epoch: Arc::clone(&self.0),
            issued_at: self.0.load(Ordering::Acquire),
        }
    }

    fn advance(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

/// Handed to a loader so it can tell whether the user has navigated away.
#[derive(Debug, Clone)]
pub struct NavigationToken {
    epoch: Arc<AtomicU64>,
    issued_at: u64,
}

impl NavigationToken {
    /// A token that never goes stale, for loads not tied to a view.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            epoch: Arc::new(AtomicU64::new(0)),
            issued_at: 0,
        }
    }

    /// Whether no navigation has happened since the token was issued.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.epoch.load(Ordering::Acquire) == self.issued_at
    }
}

/// Access guard and view switcher.
#[derive(Debug)]
pub struct ViewRouter<S, P> {
    sessions: SessionStore<S>,
    policy: RolePolicy,
    registry: ViewRegistry,
    menu: NavMenu,
    presenter: Arc<P>,
    epoch: NavigationEpoch,
}

impl<S: KeyValueStore, P: Presenter> ViewRouter<S, P> {
    /// Router over the standard policy, registry and menu.
    pub fn new(sessions: SessionStore<S>, presenter: Arc<P>) -> Self {
        Self {
            sessions,
            policy: RolePolicy::standard(),
            registry: ViewRegistry::standard(),
            menu: NavMenu::standard(),
            presenter,
            epoch: NavigationEpoch::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RolePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: ViewRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_menu(mut self, menu: NavMenu) -> Self {
        self.menu = menu;
        self
    }

    pub const fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    pub const fn sessions_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.sessions
    }

    pub const fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    pub const fn menu(&self) -> &NavMenu {
        &self.menu
    }

    pub fn presenter(&self) -> &Arc<P> {
        &self.presenter
    }

    /// Token for loaders started on behalf of the current view.
    #[must_use]
    pub fn token(&self) -> NavigationToken {
        self.epoch.token()
    }

    /// Show `requested`, or whatever view the guard redirects it to.
    pub fn navigate_to(&self, requested: View) -> Navigation {
        let session = self.sessions.restore();
        let (view, redirects) = self.resolve(session.as_ref(), requested);
        self.render(view, session.as_ref());

        if redirects > 0 {
            debug!(%requested, %view, redirects, "Navigation redirected");
        }
        Navigation {
            requested,
            view,
            redirects,
        }
    }

    /// Recompute nav-link and nav-section visibility for the stored `role`.
    ///
    /// With no role only `home` and `login` are shown. Any role hides the
    /// `login` link and shows the nav sections; a known role's other links
    /// follow the policy, an unknown one keeps only the public links.
    pub fn update_menu_for_role(&self, role: Option<&str>) {
        let role = role.filter(|role| !role.is_empty());
        let permitted = role.and_then(|role| self.policy.permitted_views(role));

        for link in self.menu.links() {
            let visible = if link.view == View::Login {
                role.is_none()
            } else if let Some(views) = permitted {
                views.contains(&link.view)
            } else {
                link.view.is_public()
            };
            self.presenter.set_link_visible(link.view, visible);
        }
        self.presenter.set_nav_sections_visible(role.is_some());
    }

    fn access<'a>(&'a self, session: Option<&Session>) -> Access<'a> {
        let Some(role) = session.and_then(Session::role) else {
            return Access::Anonymous;
        };
        self.policy
            .for_role(role)
            .map_or(Access::Anonymous, |views| Access::Signed(role, views))
    }

    fn decide(&self, access: Access<'_>, view: View) -> Decision {
        match access {
            Access::Anonymous if view.is_public() => Decision::Render,
            Access::Anonymous => Decision::Redirect(View::Login),
            Access::Signed(_, views) if views.contains(&view) => Decision::Render,
            Access::Signed(role, views) => {
                let dashboard = role.dashboard();
                if self.registry.contains(dashboard) && views.contains(&dashboard) {
                    Decision::Redirect(dashboard)
                } else {
                    warn!(%role, %dashboard, "Role dashboard unavailable, failing closed to login");
                    Decision::FailClosed
                }
            }
        }
    }

    fn resolve(&self, session: Option<&Session>, requested: View) -> (View, u8) {
        let access = self.access(session);
        let mut target = requested;

        for redirects in 0..=MAX_REDIRECTS {
            match self.decide(access, target) {
                Decision::Render => return (target, redirects),
                Decision::Redirect(next) => target = next,
                Decision::FailClosed => return (View::Login, redirects + 1),
            }
        }

        warn!(%requested, "Redirect limit exceeded, rendering login");
        (View::Login, MAX_REDIRECTS + 1)
    }

    fn render(&self, view: View, session: Option<&Session>) {
        let presenter = &self.presenter;

        presenter.deactivate_views();
        if !presenter.activate_view(view) {
            debug!(%view, "Page has no section for view");
        }

        presenter.clear_active_links();
        if self.menu.has_link_to(view) {
            presenter.mark_link_active(view);
        }

        let signed_in_as = session
            .filter(|s| !s.role.is_empty())
            .map(|s| s.username.as_str());
        if let Some(heading) = self.registry.heading(view, signed_in_as) {
            presenter.set_page_heading(&heading);
        }

        presenter.scroll_to_top();
        self.epoch.advance();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::presenter::PageState;
    use crate::storage::MemoryStore;

    fn router() -> ViewRouter<MemoryStore, PageState> {
        ViewRouter::new(
            SessionStore::new(MemoryStore::new()),
            Arc::new(PageState::standard()),
        )
    }

    fn signed_in(role: &str) -> ViewRouter<MemoryStore, PageState> {
        let mut router = router();
        router
            .sessions_mut()
            .save("tester", role, &json!({"role": role}))
            .unwrap();
        router
    }

    #[test]
    fn test_anonymous_is_sent_to_login() {
        let router = router();
        let nav = router.navigate_to(View::Reports);
        assert_eq!(nav.view, View::Login);
        assert_eq!(nav.redirects, 1);

        let page = router.presenter().snapshot();
        assert_eq!(page.active_views.iter().copied().collect::<Vec<_>>(), vec![View::Login]);
        assert_eq!(page.active_link, Some(View::Login));
        assert_eq!(page.heading.unwrap().title, "Sign In");
    }

    #[test]
    fn test_anonymous_may_open_public_views() {
        let router = router();
        assert_eq!(router.navigate_to(View::Home).view, View::Home);
        assert_eq!(router.navigate_to(View::Login).view, View::Login);

        router.navigate_to(View::Home);
        let heading = router.presenter().snapshot().heading.unwrap();
        assert_eq!(heading.subtitle, "Welcome to SchoolPortal");
    }

    #[test]
    fn test_parent_is_sent_to_own_dashboard() {
        let router = signed_in("parent");
        let nav = router.navigate_to(View::Assignments);
        assert_eq!(nav.view, View::Parent);
        assert_eq!(nav.redirects, 1);
        assert_eq!(
            router.presenter().snapshot().heading.unwrap().title,
            "Parent Dashboard"
        );
    }

    #[test]
    fn test_admin_may_open_payments() {
        let router = signed_in("admin");
        let nav = router.navigate_to(View::Payments);
        assert_eq!(nav.view, View::Payments);
        assert!(!nav.was_redirected());

        let page = router.presenter().snapshot();
        let heading = page.heading.unwrap();
        assert_eq!(heading.title, "Fee Payment");
        assert_eq!(heading.subtitle, "Manage school fee payments");
        assert_eq!(page.active_link, Some(View::Payments));
        assert_eq!(page.scroll_resets, 1);
    }

    #[test]
    fn test_signed_in_user_cannot_reopen_login() {
        let router = signed_in("teacher");
        let nav = router.navigate_to(View::Login);
        assert_eq!(nav.view, View::Teacher);
    }

    #[test]
    fn test_home_greets_signed_in_user() {
        let router = signed_in("student");
        router.navigate_to(View::Home);
        let heading = router.presenter().snapshot().heading.unwrap();
        assert_eq!(heading.subtitle, "Welcome back, tester!");
    }

    #[test]
    fn test_every_role_and_view_terminates_within_bound() {
        for role in Role::ALL {
            let router = signed_in(role.as_str());
            let permitted = router.policy().for_role(role).unwrap().clone();
            for view in View::ALL {
                let nav = router.navigate_to(view);
                assert!(nav.redirects <= MAX_REDIRECTS, "{role} -> {view}");
                assert!(
                    permitted.contains(&nav.view) || nav.view == role.dashboard(),
                    "{role} -> {view} ended on {}",
                    nav.view
                );
                assert_eq!(router.presenter().snapshot().active_views.len(), 1);
            }
        }
    }

    #[test]
    fn test_anonymous_private_views_always_end_on_login() {
        let router = router();
        for view in View::ALL.into_iter().filter(|v| !v.is_public()) {
            assert_eq!(router.navigate_to(view).view, View::Login, "{view}");
        }
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let router = signed_in("janitor");
        assert_eq!(router.navigate_to(View::Admin).view, View::Login);
        assert_eq!(router.navigate_to(View::Home).view, View::Home);

        let heading = router.presenter().snapshot().heading.unwrap();
        assert_eq!(heading.subtitle, "Welcome back, tester!");
    }

    #[test]
    fn test_dashboard_missing_from_registry_fails_closed() {
        let router = signed_in("parent").with_registry(ViewRegistry::standard().without(View::Parent));
        let nav = router.navigate_to(View::Notes);
        assert_eq!(nav.view, View::Login);
    }

    #[test]
    fn test_policy_without_own_dashboard_fails_closed() {
        let policy = RolePolicy::from_entries([(Role::Teacher, vec![View::Home, View::Notes])]);
        let router = signed_in("teacher").with_policy(policy);
        assert_eq!(router.navigate_to(View::Notes).view, View::Notes);

        let nav = router.navigate_to(View::Reports);
        assert_eq!(nav.view, View::Login);
        assert!(nav.redirects <= MAX_REDIRECTS + 1);
    }

    #[test]
    fn test_menu_for_anonymous() {
        let router = router();
        router.update_menu_for_role(None);
        let page = router.presenter().snapshot();
        assert_eq!(
            page.visible_links.into_iter().collect::<Vec<_>>(),
            vec![View::Home, View::Login]
        );
        assert!(!page.nav_sections_visible);
    }

    #[test]
    fn test_menu_for_parent() {
        let router = router();
        router.update_menu_for_role(Some("parent"));
        let page = router.presenter().snapshot();
        assert_eq!(
            page.visible_links.into_iter().collect::<Vec<_>>(),
            vec![View::Home, View::Parent, View::Timetable, View::Reports, View::Payments]
        );
        assert!(page.nav_sections_visible);
    }

    #[test]
    fn test_menu_hides_login_after_sign_in() {
        let router = router();
        router.update_menu_for_role(None);
        router.update_menu_for_role(Some("admin"));
        let page = router.presenter().snapshot();
        assert!(!page.visible_links.contains(&View::Login));
        assert!(page.visible_links.contains(&View::Payments));
    }

    #[test]
    fn test_menu_for_unknown_role() {
        let router = router();
        router.update_menu_for_role(Some("janitor"));
        let page = router.presenter().snapshot();
        assert_eq!(
            page.visible_links.into_iter().collect::<Vec<_>>(),
            vec![View::Home]
        );
        assert!(page.nav_sections_visible);
    }

    #[test]
    fn test_navigation_invalidates_tokens() {
        let router = router();
        let token = router.token();
        assert!(token.is_current());

        router.navigate_to(View::Home);
        assert!(!token.is_current());
        assert!(router.token().is_current());
        assert!(NavigationToken::detached().is_current());
    }
}
