//! Integration test support for the school portal.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p school-portal-integration-tests
//! ```
//!
//! Tests talk to a [`StubApi`]: a local axum server answering with canned
//! JSON per `(method, path)` and recording every request it receives.
//! Transport failures are simulated with [`closed_port_url`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use school_portal::{PortalConfig, PortalError};

/// A canned reply.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: ReplyBody,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum ReplyBody {
    Json(Value),
    Text(String),
}

impl Reply {
    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: ReplyBody::Json(body),
            delay: None,
        }
    }

    /// Plain-text body.
    #[must_use]
    pub fn text(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: ReplyBody::Text(body.to_owned()),
            delay: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = match StatusCode::from_u16(status) {
            Ok(status) => status,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        self
    }

    /// Hold the reply back for `delay`.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct StubState {
    replies: HashMap<(Method, String), Reply>,
    requests: Mutex<Vec<Recorded>>,
}

/// Builder for a stub portal API.
#[derive(Default)]
pub struct StubApi {
    replies: HashMap<(Method, String), Reply>,
}

impl StubApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `GET /api{path}`.
    #[must_use]
    pub fn get(mut self, path: &str, reply: Reply) -> Self {
        self.replies.insert((Method::GET, format!("/api{path}")), reply);
        self
    }

    /// Answer `POST /api{path}`.
    #[must_use]
    pub fn post(mut self, path: &str, reply: Reply) -> Self {
        self.replies.insert((Method::POST, format!("/api{path}")), reply);
        self
    }

    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn(self) -> StubServer {
        let state = Arc::new(StubState {
            replies: self.replies,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("failed to bind stub server: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("stub server has no address: {e}"));
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        StubServer { addr, state, task }
    }
}

/// A running stub API.
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Base URL to configure the portal with.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr))
            .unwrap_or_else(|e| panic!("invalid stub URL: {e}"))
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `path` (without the `/api` prefix).
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        let full = format!("/api{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.path == full)
            .collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_owned),
            body: serde_json::from_slice(&body).ok(),
        });

    let Some(reply) = state.replies.get(&(method, path)).cloned() else {
        return (StatusCode::NOT_FOUND, "no canned reply").into_response();
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    match reply.body {
        ReplyBody::Json(value) => (reply.status, axum::Json(value)).into_response(),
        ReplyBody::Text(text) => (reply.status, text).into_response(),
    }
}

/// URL of a local port nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("failed to bind: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("no local address: {e}"));
    drop(listener);
    Url::parse(&format!("http://{addr}/api")).unwrap_or_else(|e| panic!("invalid URL: {e}"))
}

/// Portal configuration pointing at `base_url`.
///
/// # Errors
///
/// Returns error if the generated variables fail to parse.
pub fn config_for(base_url: &Url, demo_login: bool) -> Result<PortalConfig, PortalError> {
    let vars: HashMap<&str, String> = HashMap::from([
        ("PORTAL_API_BASE", base_url.to_string()),
        ("PORTAL_DEMO_LOGIN", demo_login.to_string()),
        ("PORTAL_HTTP_TIMEOUT_SECS", "5".to_string()),
        ("PORTAL_STATE_FILE", temp_state_file().display().to_string()),
    ]);
    Ok(PortalConfig::from_lookup(|key| vars.get(key).cloned())?)
}

/// A fresh state file path under the system temp directory.
#[must_use]
pub fn temp_state_file() -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir()
        .join(format!("school-portal-it-{}-{n}", std::process::id()))
        .join("state.json")
}
