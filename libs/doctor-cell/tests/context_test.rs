use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::{DoctorContext, HistoryScope, ProfileEdits};
use session_cell::{Credentials, SessionStore};
use shared_api::BackendClient;
use shared_models::{NoticeLevel, PanelError, RecordingNotifier, Role};
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

struct Harness {
    _dir: TempDir,
    session: Arc<SessionStore>,
    notifier: Arc<RecordingNotifier>,
    context: DoctorContext,
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
    let context = DoctorContext::new(backend, session.clone(), notifier.clone());

    Harness {
        _dir: dir,
        session,
        notifier,
        context,
    }
}

#[tokio::test]
async fn test_doctor_login_keeps_admin_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/login"))
        .and(body_json(json!({"email": "rai@dentalpark.test", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::login_success("doc-token")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);
    h.session.set(Role::Admin, "admin-token").unwrap();

    h.context
        .login(&Credentials::new("rai@dentalpark.test", "pw"))
        .await
        .unwrap();

    assert_eq!(h.session.token(Role::Doctor).as_deref(), Some("doc-token"));
    assert_eq!(h.session.token(Role::Admin).as_deref(), Some("admin-token"));
    assert_eq!(h.notifier.last().unwrap().message, "Doctor Login successful!");
}

#[tokio::test]
async fn test_failed_login_leaves_previous_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::failure("Invalid credentials")))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("old-token"));

    let result = h.context.login(&Credentials::new("rai@dentalpark.test", "wrong")).await;

    assert_matches!(result, Err(PanelError::Rejected(msg)) if msg == "Invalid credentials");
    assert_eq!(h.session.token(Role::Doctor).as_deref(), Some("old-token"));
    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Invalid credentials");
}

#[tokio::test]
async fn test_completing_appointment_refetches_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .and(header("dToken", "doc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", false, false),
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/complete-appointment"))
        .and(header("dToken", "doc-token"))
        .and(body_json(json!({"appointmentId": "a1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Appointment Completed")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", false, true),
        ])))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    h.context.complete_appointment("a1").await.unwrap();

    let appointments = h.context.appointments().await;
    assert_eq!(appointments.len(), 1);
    assert!(appointments[0].is_completed);
    assert!(!appointments[0].cancelled);
    assert_eq!(h.notifier.last().unwrap().message, "Appointment Completed");
}

#[tokio::test]
async fn test_completion_stands_when_refresh_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", false, false),
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/complete-appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Appointment Completed")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    h.context.complete_appointment("a1").await.unwrap();

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, "Appointment Completed");
    assert!(!h.context.appointments().await[0].is_completed);
}

#[tokio::test]
async fn test_cancel_checks_current_status_not_cached_one() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", false, false),
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", false, true),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/cancel-appointment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    // Cached while pending; completed elsewhere since.
    h.context.fetch_appointments().await.unwrap();

    assert_matches!(
        h.context.cancel_appointment("a1").await,
        Err(PanelError::InvalidTransition { .. })
    );
}

#[tokio::test]
async fn test_cancelling_cancelled_appointment_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", true, false),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/cancel-appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Appointment Cancelled")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let result = h.context.cancel_appointment("a1").await;

    assert_matches!(result, Err(PanelError::InvalidTransition { .. }));
    assert_eq!(h.notifier.last().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_unknown_appointment_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![])))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    assert_matches!(h.context.complete_appointment("ghost").await, Err(PanelError::NotFound(_)));
}

#[tokio::test]
async fn test_empty_collection_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "appointments": []})))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let appointments = h.context.fetch_appointments().await.unwrap();
    assert!(appointments.is_empty());
    assert!(h.context.snapshot().await.appointments.is_some());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_keeps_stale_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", false, false),
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    h.context.fetch_appointments().await.unwrap();
    assert_matches!(h.context.fetch_appointments().await, Err(PanelError::Transport(_)));

    let cached = h.context.appointments().await;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, "a1");
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, None);

    assert_matches!(
        h.context.fetch_dashboard().await,
        Err(PanelError::NotAuthenticated(Role::Doctor))
    );
}

#[tokio::test]
async fn test_toggle_availability_flips_only_available() {
    let mock_server = MockServer::start().await;

    let before = MockBackendResponses::doctor("d1", "Dr. Rai", true);
    let mut after = before.clone();
    after["available"] = json!(false);

    Mock::given(method("GET"))
        .and(path("/api/doctor/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "doctor": before})))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/change-availability"))
        .and(body_json(json!({"docId": "d1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Availability Changed")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "doctor": after})))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let original = h.context.fetch_profile().await.unwrap();
    let toggled = h.context.toggle_availability().await.unwrap();

    assert!(original.available);
    assert!(!toggled.available);
    let mut expected = original.clone();
    expected.available = false;
    assert_eq!(toggled, expected);
    assert_eq!(h.notifier.last().unwrap().message, "You are now unavailable");
}

#[tokio::test]
async fn test_update_profile_sends_full_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "doctor": MockBackendResponses::doctor("d1", "Dr. Rai", true)
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/update-profile"))
        .and(body_json(json!({
            "address": "Lakeside, Pokhara",
            "phone_no": "9800000000",
            "about": "Gentle general dentistry",
            "fees": "1000",
            "experience": "3-5",
            "available": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Profile Updated")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    h.context
        .update_profile(ProfileEdits {
            fees: Some("1000".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(h
        .notifier
        .notices()
        .iter()
        .any(|n| n.message == "Profile updated!"));
}

#[tokio::test]
async fn test_profile_update_stands_when_refresh_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "doctor": MockBackendResponses::doctor("d1", "Dr. Rai", true)
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/update-profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Profile Updated")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/profile"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let profile = h
        .context
        .update_profile(ProfileEdits {
            fees: Some("1000".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(profile.fees.map(|f| f.to_string()).as_deref(), Some("1000"));
    assert_eq!(profile.name, "Dr. Rai");
    assert_eq!(h.notifier.notices().len(), 1);
}

#[tokio::test]
async fn test_empty_profile_edit_is_rejected() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server, Some("doc-token"));

    assert_matches!(
        h.context.update_profile(ProfileEdits::default()).await,
        Err(PanelError::Validation(_))
    );
}

#[tokio::test]
async fn test_history_scopes_use_distinct_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/patient-history/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::history(vec![
            MockBackendResponses::appointment("mine", false, true),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/patient-full-history/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::history(vec![
            MockBackendResponses::appointment("mine", false, true),
            MockBackendResponses::appointment("other", false, false),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let mine = h.context.fetch_patient_history("u1", HistoryScope::Mine).await.unwrap();
    assert_eq!(mine.entries.len(), 1);

    let all = h.context.fetch_patient_history("u1", HistoryScope::All).await.unwrap();
    assert_eq!(all.entries.len(), 2);
    assert_eq!(h.context.patient_history().await.unwrap().scope, HistoryScope::All);
}

#[tokio::test]
async fn test_null_history_reads_as_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/patient-full-history/u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "history": null})))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let history = h.context.fetch_patient_history("u2", HistoryScope::All).await.unwrap();
    assert!(history.entries.is_empty());
}

#[tokio::test]
async fn test_prescription_requires_completed_appointment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/patient-full-history/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::history(vec![
            MockBackendResponses::appointment("open", false, false),
            MockBackendResponses::appointment_with_prescription("done", json!("Rinse twice daily")),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/add-prescription"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Prescription added")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    assert_matches!(
        h.context.add_prescription("u1", "open", "Ibuprofen 400mg").await,
        Err(PanelError::InvalidTransition { .. })
    );
    assert_matches!(
        h.context.add_prescription("u1", "done", "Ibuprofen 400mg").await,
        Err(PanelError::InvalidTransition { .. })
    );
    assert_matches!(
        h.context.add_prescription("u1", "done", "   ").await,
        Err(PanelError::Validation(_))
    );
}

#[tokio::test]
async fn test_prescription_refetches_history_in_viewed_scope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/patient-history/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::history(vec![
            MockBackendResponses::appointment("a1", false, true),
        ])))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/add-prescription"))
        .and(body_json(json!({"appointmentId": "a1", "prescription": "Ibuprofen 400mg"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::message("Prescription added")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/patient-history/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::history(vec![
            MockBackendResponses::appointment_with_prescription("a1", json!("Ibuprofen 400mg")),
        ])))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    h.context.fetch_patient_history("u1", HistoryScope::Mine).await.unwrap();
    let history = h.context.add_prescription("u1", "a1", " Ibuprofen 400mg ").await.unwrap();

    assert_eq!(history.scope, HistoryScope::Mine);
    assert!(history.entries[0].has_prescription());
}

#[tokio::test]
async fn test_calendar_queries_by_iso_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments-by-date"))
        .and(query_param("date", "2025-05-20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments(vec![
            MockBackendResponses::appointment("a1", false, false),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server, Some("doc-token"));

    let day = h
        .context
        .fetch_appointments_by_date(NaiveDate::from_ymd_opt(2025, 5, 20).unwrap())
        .await
        .unwrap();

    assert_eq!(day.appointments.len(), 1);
    assert_eq!(h.context.day_schedule().await.unwrap().date, day.date);
}

#[tokio::test]
async fn test_logout_clears_only_doctor_session() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server, Some("doc-token"));
    h.session.set(Role::Admin, "admin-token").unwrap();

    assert!(h.context.logout().await.unwrap());
    assert!(!h.context.logout().await.unwrap());
    assert!(!h.context.is_logged_in());
    assert_eq!(h.session.token(Role::Admin).as_deref(), Some("admin-token"));
}
