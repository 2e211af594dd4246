//! Presentation layer.
//!
//! The router and loaders never touch a concrete UI. They drive a
//! [`Presenter`], which a front end implements over its widgets. Writes to
//! targets the page does not have must be silent no-ops: a loader may finish
//! after the element it was filling has gone away.
//!
//! [`PageState`] is the in-process implementation used by the CLI and tests.
//! It records everything written to it and exposes a [`PageSnapshot`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use school_portal_core::View;

use crate::views::PageHeading;

/// Element IDs of the standard page.
pub mod elements {
    /// Class dropdowns filled from `GET /classes`.
    pub const CLASS_SELECTS: [&str; 4] = [
        "admin-teacher-class",
        "admin-student-class",
        "timetable-class",
        "notes-class",
    ];

    /// Subject dropdowns filled from `GET /subjects`.
    pub const SUBJECT_SELECTS: [&str; 4] = [
        "admin-teacher-subjects",
        "teacher-subject",
        "student-subject",
        "notes-subject",
    ];

    pub const LOGIN_MSG: &str = "login-msg";
    pub const ADMIN_MSG: &str = "admin-msg";
    pub const PAYMENT_MSG: &str = "payment-msg";

    /// List and status regions of the per-view feature loaders.
    pub const FEATURE_REGIONS: [&str; 10] = [
        "timetable-list",
        "timetable-msg",
        "assignments-list",
        "assignments-msg",
        "notes-list",
        "notes-msg",
        "cbt-list",
        "cbt-msg",
        "reports-list",
        "reports-msg",
    ];
}

/// Colour of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Info,
    Error,
}

/// A status message shown in a page region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

/// One `<option>` of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Signed-in user badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub username: String,
    /// Role as displayed (capitalized).
    pub role_label: String,
}

/// UI surface driven by the router and the loaders.
///
/// Methods that target an element by ID return `false` when the page has no
/// such element; the call is then a no-op.
pub trait Presenter: Send + Sync {
    /// Hide every view.
    fn deactivate_views(&self);

    /// Show `view`.
    fn activate_view(&self, view: View) -> bool;

    /// Remove the "active" marker from every nav link.
    fn clear_active_links(&self);

    /// Mark the nav link for `view` active.
    fn mark_link_active(&self, view: View);

    /// Show or hide the nav link for `view`.
    fn set_link_visible(&self, view: View, visible: bool);

    /// Show or hide the grouped nav sections.
    fn set_nav_sections_visible(&self, visible: bool);

    fn set_page_heading(&self, heading: &PageHeading);

    fn scroll_to_top(&self);

    /// Replace a dropdown's options with a placeholder followed by `options`.
    fn fill_select(&self, select_id: &str, placeholder: &str, options: &[SelectOption]) -> bool;

    fn show_message(&self, region: &str, text: &str, tone: Tone) -> bool;

    /// Replace the items of a list region.
    fn render_list(&self, region: &str, items: &[String]) -> bool;

    /// Show the signed-in user's badge and logout button, or hide both.
    fn show_profile(&self, profile: Option<&Profile>);

    /// Make hero slide `index` (of `total`) the visible one.
    fn show_slide(&self, index: usize, total: usize);
}

/// Everything a [`PageState`] has been told to display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub active_views: BTreeSet<View>,
    pub active_link: Option<View>,
    pub visible_links: BTreeSet<View>,
    pub nav_sections_visible: bool,
    pub heading: Option<PageHeading>,
    pub scroll_resets: usize,
    /// Dropdown contents, placeholder first.
    pub selects: BTreeMap<String, Vec<SelectOption>>,
    pub messages: BTreeMap<String, StatusMessage>,
    pub lists: BTreeMap<String, Vec<String>>,
    pub profile: Option<Profile>,
    pub slide: Option<usize>,
}

/// Recording presenter over a fixed set of element IDs.
#[derive(Debug)]
pub struct PageState {
    views: BTreeSet<View>,
    elements: BTreeSet<String>,
    state: Mutex<PageSnapshot>,
}

impl PageState {
    /// A page with every view and every standard element.
    #[must_use]
    pub fn standard() -> Self {
        let elements = elements::CLASS_SELECTS
            .into_iter()
            .chain(elements::SUBJECT_SELECTS)
            .chain(elements::FEATURE_REGIONS)
            .chain([elements::LOGIN_MSG, elements::ADMIN_MSG, elements::PAYMENT_MSG])
            .map(str::to_owned)
            .collect();

        Self {
            views: View::ALL.into_iter().collect(),
            elements,
            state: Mutex::new(PageSnapshot::default()),
        }
    }

    /// Remove an element, as if it had been taken off the page.
    #[must_use]
    pub fn without_element(mut self, id: &str) -> Self {
        self.elements.remove(id);
        self
    }

    /// Remove a view's section from the page.
    #[must_use]
    pub fn without_view(mut self, view: View) -> Self {
        self.views.remove(&view);
        self
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PageSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::standard()
    }
}

impl Presenter for PageState {
    fn deactivate_views(&self) {
        self.lock().active_views.clear();
    }

    fn activate_view(&self, view: View) -> bool {
        if !self.views.contains(&view) {
            return false;
        }
        self.lock().active_views.insert(view);
        true
    }

    fn clear_active_links(&self) {
        self.lock().active_link = None;
    }

    fn mark_link_active(&self, view: View) {
        self.lock().active_link = Some(view);
    }

    fn set_link_visible(&self, view: View, visible: bool) {
        let mut state = self.lock();
        if visible {
            state.visible_links.insert(view);
        } else {
            state.visible_links.remove(&view);
        }
    }

    fn set_nav_sections_visible(&self, visible: bool) {
        self.lock().nav_sections_visible = visible;
    }

    fn set_page_heading(&self, heading: &PageHeading) {
        self.lock().heading = Some(heading.clone());
    }

    fn scroll_to_top(&self) {
        self.lock().scroll_resets += 1;
    }

    fn fill_select(&self, select_id: &str, placeholder: &str, options: &[SelectOption]) -> bool {
        if !self.has_element(select_id) {
            return false;
        }
        let contents = std::iter::once(SelectOption::new("", placeholder))
            .chain(options.iter().cloned())
            .collect();
        self.lock().selects.insert(select_id.to_owned(), contents);
        true
    }

    fn show_message(&self, region: &str, text: &str, tone: Tone) -> bool {
        if !self.has_element(region) {
            return false;
        }
        self.lock().messages.insert(
            region.to_owned(),
            StatusMessage {
                text: text.to_owned(),
                tone,
            },
        );
        true
    }

    fn render_list(&self, region: &str, items: &[String]) -> bool {
        if !self.has_element(region) {
            return false;
        }
        self.lock().lists.insert(region.to_owned(), items.to_vec());
        true
    }

    fn show_profile(&self, profile: Option<&Profile>) {
        self.lock().profile = profile.cloned();
    }

    fn show_slide(&self, index: usize, _total: usize) {
        self.lock().slide = Some(index);
    }
}
