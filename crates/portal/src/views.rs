//! View registry: the page heading shown for each view.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

use school_portal_core::View;

/// Subtitle of the home view for anonymous visitors.
pub const ANONYMOUS_GREETING: &str = "Welcome to SchoolPortal";

/// Title and subtitle displayed above the active view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeading {
    pub title: Cow<'static, str>,
    pub subtitle: Cow<'static, str>,
}

impl PageHeading {
    #[must_use]
    pub fn new(title: impl Into<Cow<'static, str>>, subtitle: impl Into<Cow<'static, str>>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// The set of views the page can show, with their headings.
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    entries: BTreeMap<View, PageHeading>,
}

impl ViewRegistry {
    /// All twelve portal views.
    #[must_use]
    pub fn standard() -> Self {
        let entries = [
            (View::Home, "Dashboard", ANONYMOUS_GREETING),
            (View::Login, "Sign In", "Access your account"),
            (View::Admin, "Admin Panel", "Manage school accounts and settings"),
            (View::Teacher, "Teacher Dashboard", "Manage your classes and students"),
            (View::Student, "Student Dashboard", "View your academic progress"),
            (View::Parent, "Parent Dashboard", "Monitor your child's progress"),
            (View::Timetable, "Class Timetable", "View class schedules"),
            (View::Assignments, "Assignments", "View and manage assignments"),
            (View::Notes, "Lesson Notes", "Access teaching materials"),
            (View::Cbt, "CBT Exams", "Computer-Based Testing"),
            (View::Reports, "Report Cards", "View academic reports"),
            (View::Payments, "Fee Payment", "Manage school fee payments"),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(view, title, subtitle)| (view, PageHeading::new(title, subtitle)))
                .collect(),
        }
    }

    /// Drop a view from the registry.
    #[must_use]
    pub fn without(mut self, view: View) -> Self {
        self.entries.remove(&view);
        self
    }

    /// Whether the page has this view.
    #[must_use]
    pub fn contains(&self, view: View) -> bool {
        self.entries.contains_key(&view)
    }

    /// Heading for `view`.
    ///
    /// For the home view a signed-in user is greeted by name instead of the
    /// registered subtitle.
    #[must_use]
    pub fn heading(&self, view: View, signed_in_as: Option<&str>) -> Option<PageHeading> {
        let heading = self.entries.get(&view)?;
        match (view, signed_in_as) {
            (View::Home, Some(username)) => Some(PageHeading::new(
                heading.title.clone(),
                format!("Welcome back, {username}!"),
            )),
            _ => Some(heading.clone()),
        }
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_has_every_view() {
        let registry = ViewRegistry::standard();
        assert!(View::ALL.into_iter().all(|view| registry.contains(view)));
    }

    #[test]
    fn test_payments_heading() {
        let heading = ViewRegistry::standard().heading(View::Payments, None).unwrap();
        assert_eq!(heading.title, "Fee Payment");
        assert_eq!(heading.subtitle, "Manage school fee payments");
    }

    #[test]
    fn test_home_greeting() {
        let registry = ViewRegistry::standard();
        let anonymous = registry.heading(View::Home, None).unwrap();
        assert_eq!(anonymous.subtitle, ANONYMOUS_GREETING);

        let greeted = registry.heading(View::Home, Some("Ada")).unwrap();
        assert_eq!(greeted.title, "Dashboard");
        assert_eq!(greeted.subtitle, "Welcome back, Ada!");
    }

    #[test]
    fn test_without_removes_view() {
        let registry = ViewRegistry::standard().without(View::Parent);
        assert!(!registry.contains(View::Parent));
        assert!(registry.heading(View::Parent, None).is_none());
    }
}
