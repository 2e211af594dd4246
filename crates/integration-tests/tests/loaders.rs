//! Feature loaders writing into a recorded page.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;

use school_portal::api::NewStudent;
use school_portal::presenter::elements;
use school_portal::{
    ApiClient, ApiConfig, LoadOutcome, Loaders, NavigationToken, PageState, SelectSource, Tone,
};
use school_portal_core::ClassId;
use school_portal_integration_tests::{Reply, StubApi, closed_port_url};

fn loaders(base_url: url::Url) -> (Loaders<PageState>, Arc<PageState>) {
    let api = ApiClient::new(&ApiConfig {
        base_url,
        timeout: Some(Duration::from_secs(5)),
    })
    .unwrap();
    let page = Arc::new(PageState::standard());
    (Loaders::new(api, Arc::clone(&page)), page)
}

#[tokio::test]
async fn test_unreachable_api_fills_class_dropdowns_with_demo_classes() {
    let (loaders, page) = loaders(closed_port_url().await);

    assert_eq!(loaders.load_classes().await, SelectSource::Demo);

    let snapshot = page.snapshot();
    for id in elements::CLASS_SELECTS {
        let labels: Vec<_> = snapshot.selects[id].iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Select Class", "JSS 1", "JSS 2", "SS 1", "SS 2"], "{id}");
    }
}

#[tokio::test]
async fn test_unreachable_api_fills_subject_dropdowns_with_demo_subjects() {
    let (loaders, page) = loaders(closed_port_url().await);

    assert_eq!(loaders.load_subjects().await, SelectSource::Demo);
    let snapshot = page.snapshot();
    for id in elements::SUBJECT_SELECTS {
        assert_eq!(snapshot.selects[id].len(), 5, "{id}");
        assert_eq!(snapshot.selects[id][0].label, "Select Subject");
    }
}

#[tokio::test]
async fn test_remote_classes_fill_dropdowns_that_exist() {
    let stub = StubApi::new()
        .get("/classes", Reply::json(json!([{"id": 7, "name": "Primary 6"}])))
        .spawn()
        .await;
    let api = ApiClient::new(&ApiConfig {
        base_url: stub.base_url(),
        timeout: None,
    })
    .unwrap();
    let page = Arc::new(PageState::standard().without_element("notes-class"));
    let loaders = Loaders::new(api, Arc::clone(&page));

    assert_eq!(loaders.load_classes().await, SelectSource::Remote(1));

    let snapshot = page.snapshot();
    assert_eq!(snapshot.selects.len(), 3);
    assert!(!snapshot.selects.contains_key("notes-class"));
    let options = &snapshot.selects["timetable-class"];
    assert_eq!(options[1].value, "7");
    assert_eq!(options[1].label, "Primary 6");
}

#[tokio::test]
async fn test_malformed_classes_fall_back_to_demo_classes() {
    let stub = StubApi::new()
        .get("/classes", Reply::json(json!({"unexpected": true})))
        .spawn()
        .await;
    let (loaders, page) = loaders(stub.base_url());

    assert_eq!(loaders.load_classes().await, SelectSource::Demo);
    assert_eq!(page.snapshot().selects["timetable-class"][1].label, "JSS 1");
}

#[tokio::test]
async fn test_bad_gateway_fills_every_dropdown_with_demo_data() {
    let stub = StubApi::new()
        .get("/classes", Reply::text("<html>Bad Gateway</html>").with_status(502))
        .get("/subjects", Reply::json(json!({"error": "Service waking up"})).with_status(503))
        .spawn()
        .await;
    let (loaders, page) = loaders(stub.base_url());

    assert_eq!(loaders.load_classes().await, SelectSource::Demo);
    assert_eq!(loaders.load_subjects().await, SelectSource::Demo);

    let snapshot = page.snapshot();
    for id in elements::CLASS_SELECTS {
        let labels: Vec<_> = snapshot.selects[id].iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Select Class", "JSS 1", "JSS 2", "SS 1", "SS 2"], "{id}");
    }
    for id in elements::SUBJECT_SELECTS {
        assert_eq!(snapshot.selects[id].len(), 5, "{id}");
    }
}

#[tokio::test]
async fn test_feature_loads_render_lists_and_messages() {
    let stub = StubApi::new()
        .get(
            "/timetable",
            Reply::json(json!([
                {"day": "Monday", "time": "08:00", "subject_name": "Mathematics", "teacher_name": "Mrs. Okafor"}
            ])),
        )
        .get("/assignments", Reply::json(json!([])))
        .get("/cbts", Reply::json(json!({"error": "No CBTs available"})))
        .spawn()
        .await;
    let (loaders, page) = loaders(stub.base_url());
    let token = NavigationToken::detached();

    let outcome = loaders.load_timetable(&ClassId::from(2), &token).await;
    assert_eq!(outcome, LoadOutcome::Shown(1));
    assert_eq!(
        page.snapshot().lists["timetable-list"],
        ["Monday 08:00: Mathematics (Mrs. Okafor)"]
    );
    assert_eq!(stub.requests_to("/timetable")[0].query.as_deref(), Some("class_id=2"));

    assert_eq!(loaders.load_assignments(&token).await, LoadOutcome::NothingToShow);
    assert_eq!(page.snapshot().messages["assignments-msg"].text, "No assignments found.");

    assert_eq!(loaders.load_cbts(&token).await, LoadOutcome::NothingToShow);
    let message = page.snapshot().messages["cbt-msg"].clone();
    assert_eq!(message.text, "No CBTs available");
    assert_eq!(message.tone, Tone::Info);
}

#[tokio::test]
async fn test_transport_failure_asks_to_try_again() {
    let (loaders, page) = loaders(closed_port_url().await);

    let outcome = loaders.load_reports(&NavigationToken::detached()).await;
    assert_eq!(outcome, LoadOutcome::Failed);

    let message = page.snapshot().messages["reports-msg"].clone();
    assert_eq!(message.text, "Unable to load reports. Please try again.");
    assert_eq!(message.tone, Tone::Error);
}

#[tokio::test]
async fn test_missing_region_is_ignored() {
    let stub = StubApi::new()
        .get("/reports", Reply::json(json!([{"id": 1, "student": "Ada", "average": 71.4}])))
        .spawn()
        .await;
    let api = ApiClient::new(&ApiConfig {
        base_url: stub.base_url(),
        timeout: None,
    })
    .unwrap();
    let page = Arc::new(PageState::standard().without_element("reports-list"));
    let loaders = Loaders::new(api, Arc::clone(&page));

    let outcome = loaders.load_reports(&NavigationToken::detached()).await;
    assert_eq!(outcome, LoadOutcome::Shown(1));
    assert!(page.snapshot().lists.is_empty());
}

#[tokio::test]
async fn test_account_actions_report_in_admin_region() {
    let stub = StubApi::new()
        .post("/create-student", Reply::json(json!({"error": "Username already taken"})).with_status(409))
        .spawn()
        .await;
    let (loaders, page) = loaders(stub.base_url());

    let result = loaders
        .create_student(&NewStudent {
            name: "Ada Obi".to_string(),
            username: "aobi".to_string(),
            password: SecretString::from("s3cret"),
            class_id: Some(ClassId::from(2)),
        })
        .await;
    assert!(result.is_err());

    let message = page.snapshot().messages[elements::ADMIN_MSG].clone();
    assert_eq!(message.text, "Username already taken");
    assert_eq!(message.tone, Tone::Error);
}
