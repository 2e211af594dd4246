//! Navigation menu registry.

use school_portal_core::View;

/// One rendered menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub view: View,
    pub label: &'static str,
}

/// The menu entries present on the page, in display order.
///
/// Visibility is not stored here; the router derives it from the session.
#[derive(Debug, Clone)]
pub struct NavMenu {
    links: Vec<NavLink>,
}

impl NavMenu {
    /// One link per portal view.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_links(View::ALL.into_iter().map(|view| NavLink {
            view,
            label: label_for(view),
        }))
    }

    pub fn from_links(links: impl IntoIterator<Item = NavLink>) -> Self {
        Self {
            links: links.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Whether some link targets `view`.
    #[must_use]
    pub fn has_link_to(&self, view: View) -> bool {
        self.links.iter().any(|link| link.view == view)
    }
}

impl Default for NavMenu {
    fn default() -> Self {
        Self::standard()
    }
}

const fn label_for(view: View) -> &'static str {
    match view {
        View::Home => "Home",
        View::Login => "Login",
        View::Admin => "Admin",
        View::Teacher => "Teacher",
        View::Student => "Student",
        View::Parent => "Parent",
        View::Timetable => "Timetable",
        View::Assignments => "Assignments",
        View::Notes => "Lesson Notes",
        View::Cbt => "CBT",
        View::Reports => "Reports",
        View::Payments => "Payments",
    }
}
