use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contact_cell::{ContactContext, ContactStatus};
use session_cell::SessionStore;
use shared_api::BackendClient;
use shared_models::{NoticeLevel, PanelError, RecordingNotifier, Role};
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

struct Harness {
    _dir: TempDir,
    notifier: Arc<RecordingNotifier>,
    context: ContactContext,
}

fn harness(mock_server: &MockServer, doctor_token: Option<&str>) -> Harness {
    let dir = TempDir::new().unwrap();
    let config = TestConfig::new(&mock_server.uri(), dir.path()).to_panel_config();

    let session = Arc::new(SessionStore::open(&config.session_path).unwrap());
    if let Some(token) = doctor_token {
        session.set(Role::Doctor, token).unwrap();
    }
    let notifier = Arc::new(RecordingNotifier::new());
    let backend = Arc::new(BackendClient::new(&config).unwrap());
    let context = ContactContext::new(backend, session, notifier.clone());

    Harness {
        _dir: dir,
        notifier,
        context,
    }
}

#[tokio::test]
async fn test_toggle_pending_contact_to_replied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockBackendResponses::contact("c1", "pending")])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockBackendResponses::contact("c1", "replied")])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/user-contact/contact/update-status/c1"))
        .and(body_json(json!({"status": "replied"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);

    let status = h.context.toggle_contact_status("c1").await.unwrap();

    assert_eq!(status, ContactStatus::Replied);
    assert_eq!(h.context.contacts().await[0].status, ContactStatus::Replied);
    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Status updated to replied");
}

#[tokio::test]
async fn test_replied_contact_toggles_back_to_pending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockBackendResponses::contact("c1", "replied")])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/user-contact/contact/update-status/c1"))
        .and(body_json(json!({"status": "pending"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);

    let status = h.context.toggle_contact_status("c1").await.unwrap();
    assert_eq!(status, ContactStatus::Pending);
}

#[tokio::test]
async fn test_toggle_reads_current_status_not_stale_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockBackendResponses::contact("c1", "pending")])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockBackendResponses::contact("c1", "replied")])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/user-contact/contact/update-status/c1"))
        .and(body_json(json!({"status": "pending"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);
    // Cached as pending; someone else has since replied.
    h.context.fetch_contacts().await.unwrap();

    let status = h.context.toggle_contact_status("c1").await.unwrap();
    assert_eq!(status, ContactStatus::Pending);
}

#[tokio::test]
async fn test_status_change_survives_failed_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockBackendResponses::contact("c1", "pending")])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/user-contact/contact/update-status/c1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);

    let status = h.context.toggle_contact_status("c1").await.unwrap();

    assert_eq!(status, ContactStatus::Replied);
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(h.context.contacts().await[0].status, ContactStatus::Pending);
}

#[tokio::test]
async fn test_unknown_contact_is_not_patched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);

    let result = h.context.toggle_contact_status("ghost").await;
    assert_matches!(result, Err(PanelError::NotFound(_)));
}

#[tokio::test]
async fn test_non_array_contact_list_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/contactlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "maintenance"})))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);

    assert!(h.context.fetch_contacts().await.unwrap().is_empty());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_feedbacks_use_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/feedbacks"))
        .and(header("Authorization", "Bearer doc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [MockBackendResponses::feedback("f1", 5), MockBackendResponses::feedback("f2", 2)]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let feedbacks = h.context.fetch_feedbacks().await.unwrap();
    assert_eq!(feedbacks.len(), 2);
    assert_eq!(feedbacks[1].rating, 2.0);
    assert_eq!(h.context.feedbacks().await, feedbacks);
}

#[tokio::test]
async fn test_feedbacks_accept_bare_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/feedbacks"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([MockBackendResponses::feedback("f1", 4)])))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    assert_eq!(h.context.fetch_feedbacks().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_feedback_with_null_author_still_lists() {
    let mock_server = MockServer::start().await;

    let mut anonymous = MockBackendResponses::feedback("f2", 3);
    anonymous["userData"] = json!(null);

    Mock::given(method("GET"))
        .and(path("/api/user-contact/feedbacks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [MockBackendResponses::feedback("f1", 5), anonymous]
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let feedbacks = h.context.fetch_feedbacks().await.unwrap();
    assert_eq!(feedbacks.len(), 2);
    assert!(feedbacks[1].user_data.name.is_none());
    let screen = contact_cell::views::render_feedbacks(&feedbacks);
    assert!(screen.contains("Anonymous User"));
}

#[tokio::test]
async fn test_feedbacks_require_doctor_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);

    let result = h.context.fetch_feedbacks().await;
    assert_matches!(result, Err(PanelError::NotAuthenticated(Role::Doctor)));
    assert_eq!(h.notifier.last().unwrap().message, "Please login as Doctor to continue");
}

#[tokio::test]
async fn test_expired_token_on_feedbacks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user-contact/feedbacks"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("stale-token"));

    let result = h.context.fetch_feedbacks().await;
    assert_matches!(result, Err(PanelError::Auth(msg)) if msg == "Please login to view feedbacks");
    assert!(h.context.feedbacks().await.is_empty());
}
