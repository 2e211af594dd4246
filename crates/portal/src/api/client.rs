//! Portal API client.

use std::sync::Arc;

use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

use school_portal_core::{
    Assignment, CbtExam, ClassId, LessonNote, PaymentReceipt, ReportCard, Role, SchoolClass,
    Subject, SubjectId, TimetableEntry,
};

use super::error::ApiError;
use super::types::{ActionResponse, NewStudent, NewTeacher, PaymentRequest};
use crate::auth::Credentials;
use crate::config::ApiConfig;

/// Client for the portal REST API.
///
/// Cheap to clone; clones share the connection pool. Every call is
/// independent: no retries, no shared state between requests.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL cannot take path segments or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch all classes.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn classes(&self) -> Result<Vec<SchoolClass>, ApiError> {
        self.get("classes", &[]).await
    }

    /// Fetch all subjects.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.get("subjects", &[]).await
    }

    /// Fetch a class timetable.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self), fields(class_id = %class_id))]
    pub async fn timetable(&self, class_id: &ClassId) -> Result<Vec<TimetableEntry>, ApiError> {
        self.get("timetable", &[("class_id", class_id.as_str())]).await
    }

    /// Fetch assignments visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn assignments(&self) -> Result<Vec<Assignment>, ApiError> {
        self.get("assignments", &[]).await
    }

    /// Fetch lesson notes for a class and subject.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self), fields(class_id = %class_id, subject_id = %subject_id))]
    pub async fn notes(
        &self,
        class_id: &ClassId,
        subject_id: &SubjectId,
    ) -> Result<Vec<LessonNote>, ApiError> {
        self.get(
            "notes",
            &[
                ("class_id", class_id.as_str()),
                ("subject_id", subject_id.as_str()),
            ],
        )
        .await
    }

    /// Fetch available CBT exams.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn cbts(&self) -> Result<Vec<CbtExam>, ApiError> {
        self.get("cbts", &[]).await
    }

    /// Fetch report cards.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn reports(&self) -> Result<Vec<ReportCard>, ApiError> {
        self.get("reports", &[]).await
    }

    /// Sign in. Returns the raw response, which is stored with the session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the credentials.
    #[instrument(skip(self, credentials), fields(username = %credentials.username, role = %credentials.role))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        #[derive(Serialize)]
        struct LoginBody<'a> {
            username: &'a str,
            password: &'a str,
            role: Role,
        }

        let body = LoginBody {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
            role: credentials.role,
        };
        self.post("login", &body).await
    }

    /// Create a teacher account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self, teacher), fields(username = %teacher.username))]
    pub async fn create_teacher(&self, teacher: &NewTeacher) -> Result<ActionResponse, ApiError> {
        self.post("create-teacher", teacher).await
    }

    /// Create a student account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self, student), fields(username = %student.username))]
    pub async fn create_student(&self, student: &NewStudent) -> Result<ActionResponse, ApiError> {
        self.post("create-student", student).await
    }

    /// Start a fee payment.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self, payment), fields(amount = %payment.amount))]
    pub async fn initiate_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentReceipt, ApiError> {
        self.post("initiate-payment", payment).await
    }

    /// Build the URL for an endpoint below the base URL.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        let response = self.inner.client.get(url).send().await.map_err(|e| {
            error!(path, error = %e, "API request failed");
            ApiError::Transport(e.to_string())
        })?;
        handle_response(path, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, &[])?;
        let response = self
            .inner
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(path, error = %e, "API request failed");
                ApiError::Transport(e.to_string())
            })?;
        handle_response(path, response).await
    }
}

/// Turn a response into a typed value.
///
/// An `{"error": "..."}` body is an application error whatever the status.
async fn handle_response<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    let Ok(value) = serde_json::from_str::<Value>(&text) else {
        if status.is_success() {
            return Err(ApiError::Decode(format!("{path} returned a non-JSON body")));
        }
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: text,
        });
    };

    if let Some(message) = error_message(&value) {
        debug!(path, status = status.as_u16(), %message, "API reported an error");
        return Err(ApiError::Application(message.to_owned()));
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    debug!(path, "API request succeeded");
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
}

/// The `error` field of an object body, if it is a string.
fn error_message(value: &Value) -> Option<&str> {
    value.get("error")?.as_str()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base.parse().unwrap(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let api = client("https://portal.example/api");
        let url = api.endpoint("classes", &[]).unwrap();
        assert_eq!(url.as_str(), "https://portal.example/api/classes");

        let api = client("https://portal.example/api/");
        let url = api.endpoint("create-teacher", &[]).unwrap();
        assert_eq!(url.as_str(), "https://portal.example/api/create-teacher");
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let api = client("http://localhost:4000/api");
        let url = api
            .endpoint("notes", &[("class_id", "JSS 1"), ("subject_id", "7")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/api/notes?class_id=JSS+1&subject_id=7"
        );
    }

    #[test]
    fn test_cannot_be_a_base_url_is_rejected() {
        let err = ApiClient::new(&ApiConfig {
            base_url: "mailto:office@school.example".parse().unwrap(),
            timeout: None,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(&json!({"error": "No CBTs"})), Some("No CBTs"));
        assert_eq!(error_message(&json!({"error": 5})), None);
        assert_eq!(error_message(&json!([{"error": "x"}])), None);
        assert_eq!(error_message(&json!({"message": "ok"})), None);
    }
}
