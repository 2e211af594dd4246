//! Data loaders that fetch from the API and fill the page.
//!
//! Each load is independent: no ordering between them, no retries, and the
//! last one to finish wins on shared targets. Per-view loaders take a
//! [`NavigationToken`] and drop their result if the user has navigated
//! since the load started.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use school_portal_core::{ClassId, PaymentReceipt, SchoolClass, Subject, SubjectId};

use crate::api::{ActionResponse, ApiClient, ApiError, NewStudent, NewTeacher, PaymentRequest};
use crate::presenter::{Presenter, SelectOption, Tone, elements};
use crate::router::NavigationToken;

pub const CLASS_PLACEHOLDER: &str = "Select Class";
pub const SUBJECT_PLACEHOLDER: &str = "Select Subject";

/// Classes shown when the API cannot supply its own.
#[must_use]
pub fn demo_classes() -> Vec<SchoolClass> {
    vec![
        SchoolClass::new(1, "JSS 1"),
        SchoolClass::new(2, "JSS 2"),
        SchoolClass::new(3, "SS 1"),
        SchoolClass::new(4, "SS 2"),
    ]
}

/// Subjects shown when the API cannot supply its own.
#[must_use]
pub fn demo_subjects() -> Vec<Subject> {
    vec![
        Subject::new(1, "Mathematics"),
        Subject::new(2, "English Language"),
        Subject::new(3, "Basic Science"),
        Subject::new(4, "Civic Education"),
    ]
}

/// Where dropdown options came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectSource {
    /// Filled from the API with this many entries.
    Remote(usize),
    /// The request failed; filled with the demo list.
    Demo,
}

/// Result of a per-view feature load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This many items were rendered.
    Shown(usize),
    /// Empty list or an API error message.
    NothingToShow,
    /// The request failed; the user was asked to try again.
    Failed,
    /// The user navigated away before the load finished; nothing was written.
    Superseded,
}

/// Per-view data sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Timetable,
    Assignments,
    Notes,
    Cbt,
    Reports,
}

impl Feature {
    #[must_use]
    pub const fn list_region(self) -> &'static str {
        match self {
            Self::Timetable => "timetable-list",
            Self::Assignments => "assignments-list",
            Self::Notes => "notes-list",
            Self::Cbt => "cbt-list",
            Self::Reports => "reports-list",
        }
    }

    #[must_use]
    pub const fn message_region(self) -> &'static str {
        match self {
            Self::Timetable => "timetable-msg",
            Self::Assignments => "assignments-msg",
            Self::Notes => "notes-msg",
            Self::Cbt => "cbt-msg",
            Self::Reports => "reports-msg",
        }
    }

    /// Noun used in status messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Timetable => "timetable",
            Self::Assignments => "assignments",
            Self::Notes => "lesson notes",
            Self::Cbt => "CBT exams",
            Self::Reports => "reports",
        }
    }
}

/// Fetches portal data and writes it to the presenter.
#[derive(Debug)]
pub struct Loaders<P> {
    api: ApiClient,
    presenter: Arc<P>,
}

impl<P> Clone for Loaders<P> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            presenter: Arc::clone(&self.presenter),
        }
    }
}

impl<P: Presenter + 'static> Loaders<P> {
    pub const fn new(api: ApiClient, presenter: Arc<P>) -> Self {
        Self { api, presenter }
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fill every class dropdown.
    pub async fn load_classes(&self) -> SelectSource {
        let (classes, source) = match self.api.classes().await {
            Ok(classes) => {
                debug!(count = classes.len(), "Loaded classes");
                let count = classes.len();
                (classes, SelectSource::Remote(count))
            }
            Err(err) => {
                warn!(error = %err, "Classes unavailable, using demo classes");
                (demo_classes(), SelectSource::Demo)
            }
        };

        let options: Vec<SelectOption> = classes
            .iter()
            .map(|class| SelectOption::new(class.id.as_str(), &class.name))
            .collect();
        self.fill_selects(&elements::CLASS_SELECTS, CLASS_PLACEHOLDER, &options);
        source
    }

    /// Fill every subject dropdown.
    pub async fn load_subjects(&self) -> SelectSource {
        let (subjects, source) = match self.api.subjects().await {
            Ok(subjects) => {
                debug!(count = subjects.len(), "Loaded subjects");
                let count = subjects.len();
                (subjects, SelectSource::Remote(count))
            }
            Err(err) => {
                warn!(error = %err, "Subjects unavailable, using demo subjects");
                (demo_subjects(), SelectSource::Demo)
            }
        };

        let options: Vec<SelectOption> = subjects
            .iter()
            .map(|subject| SelectOption::new(subject.id.as_str(), &subject.name))
            .collect();
        self.fill_selects(&elements::SUBJECT_SELECTS, SUBJECT_PLACEHOLDER, &options);
        source
    }

    /// Start the class and subject loads on the runtime.
    pub fn spawn_select_loads(&self) -> (JoinHandle<SelectSource>, JoinHandle<SelectSource>) {
        let classes = self.clone();
        let subjects = self.clone();
        (
            tokio::spawn(async move { classes.load_classes().await }),
            tokio::spawn(async move { subjects.load_subjects().await }),
        )
    }

    pub async fn load_timetable(&self, class_id: &ClassId, token: &NavigationToken) -> LoadOutcome {
        self.load_feature(Feature::Timetable, token, self.api.timetable(class_id))
            .await
    }

    pub async fn load_assignments(&self, token: &NavigationToken) -> LoadOutcome {
        self.load_feature(Feature::Assignments, token, self.api.assignments())
            .await
    }

    pub async fn load_notes(
        &self,
        class_id: &ClassId,
        subject_id: &SubjectId,
        token: &NavigationToken,
    ) -> LoadOutcome {
        self.load_feature(Feature::Notes, token, self.api.notes(class_id, subject_id))
            .await
    }

    pub async fn load_cbts(&self, token: &NavigationToken) -> LoadOutcome {
        self.load_feature(Feature::Cbt, token, self.api.cbts()).await
    }

    pub async fn load_reports(&self, token: &NavigationToken) -> LoadOutcome {
        self.load_feature(Feature::Reports, token, self.api.reports())
            .await
    }

    /// Create a teacher and report the result in the admin status region.
    ///
    /// # Errors
    ///
    /// Returns the API error after it has been shown to the user.
    pub async fn create_teacher(&self, teacher: &NewTeacher) -> Result<ActionResponse, ApiError> {
        let result = self.api.create_teacher(teacher).await;
        self.report_action(elements::ADMIN_MSG, &result, "Teacher created successfully");
        result
    }

    /// Create a student and report the result in the admin status region.
    ///
    /// # Errors
    ///
    /// Returns the API error after it has been shown to the user.
    pub async fn create_student(&self, student: &NewStudent) -> Result<ActionResponse, ApiError> {
        let result = self.api.create_student(student).await;
        self.report_action(elements::ADMIN_MSG, &result, "Student created successfully");
        result
    }

    /// Start a fee payment and report the result in the payment status region.
    ///
    /// # Errors
    ///
    /// Returns the API error after it has been shown to the user.
    pub async fn initiate_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentReceipt, ApiError> {
        let result = self.api.initiate_payment(payment).await;
        match &result {
            Ok(receipt) => {
                let mut parts = vec![
                    receipt
                        .message
                        .clone()
                        .unwrap_or_else(|| "Payment initiated".to_string()),
                ];
                if let Some(reference) = &receipt.reference {
                    parts.push(format!("Reference: {reference}"));
                }
                if let Some(url) = &receipt.authorization_url {
                    parts.push(format!("Complete payment at {url}"));
                }
                let text = parts.join(". ");
                info!(reference = ?receipt.reference, "Payment initiated");
                self.presenter
                    .show_message(elements::PAYMENT_MSG, &text, Tone::Success);
            }
            Err(err) => {
                self.presenter
                    .show_message(elements::PAYMENT_MSG, &action_error_text(err), Tone::Error);
            }
        }
        result
    }

    async fn load_feature<T, F>(&self, feature: Feature, token: &NavigationToken, fetch: F) -> LoadOutcome
    where
        T: Display,
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let list = feature.list_region();
        let status = feature.message_region();
        let noun = feature.noun();

        self.presenter
            .show_message(status, &format!("Loading {noun}..."), Tone::Info);
        let result = fetch.await;

        if !token.is_current() {
            debug!(feature = noun, "Navigated away, dropping result");
            self.presenter.show_message(status, "", Tone::Info);
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(items) if items.is_empty() => {
                self.presenter.render_list(list, &[]);
                self.presenter
                    .show_message(status, &format!("No {noun} found."), Tone::Info);
                LoadOutcome::NothingToShow
            }
            Ok(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                self.presenter.render_list(list, &rendered);
                self.presenter.show_message(status, "", Tone::Info);
                debug!(feature = noun, count = rendered.len(), "Loaded");
                LoadOutcome::Shown(rendered.len())
            }
            Err(ApiError::Application(message)) => {
                self.presenter.render_list(list, &[]);
                self.presenter.show_message(status, &message, Tone::Info);
                LoadOutcome::NothingToShow
            }
            Err(err) => {
                error!(feature = noun, error = %err, "Load failed");
                self.presenter.show_message(
                    status,
                    &format!("Unable to load {noun}. Please try again."),
                    Tone::Error,
                );
                LoadOutcome::Failed
            }
        }
    }

    fn fill_selects(&self, ids: &[&str], placeholder: &str, options: &[SelectOption]) {
        for id in ids {
            if !self.presenter.fill_select(id, placeholder, options) {
                debug!(select = id, "Page has no such dropdown");
            }
        }
    }

    fn report_action(&self, region: &str, result: &Result<ActionResponse, ApiError>, fallback: &str) {
        match result {
            Ok(response) => {
                let text = response.message.as_deref().unwrap_or(fallback);
                self.presenter.show_message(region, text, Tone::Success);
            }
            Err(err) => {
                self.presenter
                    .show_message(region, &action_error_text(err), Tone::Error);
            }
        }
    }
}

/// Text shown when an account or payment action fails.
fn action_error_text(err: &ApiError) -> String {
    err.application_message().map_or_else(
        || "Unable to reach the server. Please try again.".to_string(),
        str::to_owned,
    )
}
