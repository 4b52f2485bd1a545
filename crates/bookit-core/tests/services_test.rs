#![allow(clippy::unwrap_used)]
// Service and controller behaviour against a wiremock backend.

use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bookit_api::ApiClient;
use bookit_core::{
    AppController, AppState, ClientConfig, CoreError, MemoryTokenStore, NotificationLevel,
    RefreshPolicy, Reservation, ReservationStatus, TokenStore, ViewKind, ViewRenderer,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct RecordingRenderer {
    events: Arc<Mutex<Vec<String>>>,
}

impl ViewRenderer for RecordingRenderer {
    fn mount(&mut self, view: ViewKind, _state: &AppState) {
        self.events.lock().unwrap().push(format!("mount {view}"));
    }

    fn unmount(&mut self, view: ViewKind) {
        self.events.lock().unwrap().push(format!("unmount {view}"));
    }
}

struct Harness {
    server: MockServer,
    controller: AppController,
    sessions: Arc<MemoryTokenStore>,
    views: Arc<Mutex<Vec<String>>>,
}

async fn harness_with(token: Option<&str>, tune: impl FnOnce(&mut ClientConfig)) -> Harness {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let mut config = ClientConfig::new(url.clone());
    tune(&mut config);

    let sessions = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(SecretString::from(t.to_string())),
        None => MemoryTokenStore::new(),
    });
    let renderer = RecordingRenderer::default();
    let views = Arc::clone(&renderer.events);
    let api = ApiClient::with_client(reqwest::Client::new(), &url);
    let controller = AppController::with_api(
        config,
        api,
        Arc::clone(&sessions) as Arc<dyn TokenStore>,
        Box::new(renderer),
    );
    Harness {
        server,
        controller,
        sessions,
        views,
    }
}

async fn harness() -> Harness {
    harness_with(None, |_| {}).await
}

fn reservation_json(id: i64, status: &str, start: &str, end: &str) -> serde_json::Value {
    json!({
        "id": id,
        "resource_id": 5,
        "user_id": 1,
        "start_time": start,
        "end_time": end,
        "status": status,
        "resource": { "id": 5, "name": "Room A", "tags": ["projector"], "available": true }
    })
}

fn future_reservation(id: i64) -> Reservation {
    let start = Utc::now() + Duration::days(2);
    Reservation {
        id,
        resource_id: 5,
        resource: None,
        user_id: Some(1),
        start_time: start,
        end_time: start + Duration::hours(1),
        status: ReservationStatus::Active,
        created_at: None,
    }
}

async fn mount_dashboard_backend(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("Authorization", "Bearer good-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "alice", "roles": ["user"]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/resources/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 5, "name": "Room A", "tags": ["projector"], "available": true },
            { "id": 6, "name": "Van", "tags": [], "available": false }
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

async fn mount_health(server: &MockServer, status: u16) {
    let response = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2030-01-01T00:00:00Z"
        }))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({ "detail": "database unavailable" }))
    };
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ── ReservationService ──────────────────────────────────────────────

#[tokio::test]
async fn create_with_inverted_window_never_reaches_backend() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let start = Utc.with_ymd_and_hms(2099, 1, 1, 10, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2099, 1, 1, 9, 0, 0).unwrap();
    let err = h
        .controller
        .services()
        .reservations
        .create_reservation(5, start, end)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ValidationFailed { .. }), "got: {err:?}");
    assert!(h.controller.notifier().active().is_empty());
}

#[tokio::test]
async fn create_in_the_past_never_reaches_backend() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let start = Utc::now() - Duration::hours(1);
    let err = h
        .controller
        .services()
        .reservations
        .create_reservation(5, start, start + Duration::hours(2))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn create_refetches_and_announces_success() {
    let h = harness().await;
    let body = reservation_json(7, "active", "2099-01-01T09:00:00Z", "2099-01-01T10:00:00Z");
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(body.clone()))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .and(query_param("include_cancelled", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([body])))
        .expect(1)
        .mount(&h.server)
        .await;

    let start = Utc.with_ymd_and_hms(2099, 1, 1, 9, 0, 0).unwrap();
    let created = h
        .controller
        .services()
        .reservations
        .create_reservation(5, start, start + Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(created.id, 7);
    let state = h.controller.store().state();
    assert_eq!(state.reservations.len(), 1);
    assert_eq!(state.reservations[0].resource_label(), "Room A");

    let toasts = h.controller.notifier().active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, NotificationLevel::Success);
    assert_eq!(toasts[0].message, "Reservation created successfully");
}

#[tokio::test]
async fn create_failure_is_quiet_by_default() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "detail": "Slot already booked" })),
        )
        .mount(&h.server)
        .await;

    let start = Utc::now() + Duration::days(1);
    let err = h
        .controller
        .services()
        .reservations
        .create_reservation(5, start, start + Duration::hours(1))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Rejected { ref message } if message == "Slot already booked"));
    assert!(h.controller.notifier().active().is_empty());
}

#[tokio::test]
async fn create_failure_toasts_when_enabled() {
    let h = harness_with(None, |c| c.notifications.notify_create_failure = true).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let start = Utc::now() + Duration::days(1);
    h.controller
        .services()
        .reservations
        .create_reservation(5, start, start + Duration::hours(1))
        .await
        .unwrap_err();

    let toasts = h.controller.notifier().active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn cancel_leaves_no_active_reservation_with_that_id() {
    let h = harness().await;
    h.controller
        .store()
        .set_reservations(vec![future_reservation(7), future_reservation(8)]);

    Mock::given(method("DELETE"))
        .and(path("/api/v1/reservations/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([reservation_json(
            8,
            "active",
            "2099-01-01T09:00:00Z",
            "2099-01-01T10:00:00Z"
        )])))
        .mount(&h.server)
        .await;

    h.controller
        .services()
        .reservations
        .cancel_reservation(7)
        .await
        .unwrap();

    let state = h.controller.store().state();
    assert!(!state.reservations.iter().any(|r| r.id == 7 && r.is_active()));
    assert_eq!(
        h.controller.notifier().active()[0].message,
        "Reservation cancelled successfully"
    );
}

#[tokio::test]
async fn optimistic_cancel_patches_store_without_reload() {
    let h = harness_with(None, |c| c.refresh_policy = RefreshPolicy::OptimisticMerge).await;
    h.controller
        .store()
        .set_reservations(vec![future_reservation(7), future_reservation(8)]);

    Mock::given(method("DELETE"))
        .and(path("/api/v1/reservations/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&h.server)
        .await;

    h.controller
        .services()
        .reservations
        .cancel_reservation(7)
        .await
        .unwrap();

    let ids: Vec<i64> = h
        .controller
        .store()
        .state()
        .reservations
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, [8]);
}

#[tokio::test]
async fn cancel_failure_notifies_and_reraises() {
    let h = harness().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/reservations/7"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Reservation not found" })),
        )
        .mount(&h.server)
        .await;

    let err = h
        .controller
        .services()
        .reservations
        .cancel_reservation(7)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotFound { .. }));
    let toasts = h.controller.notifier().active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, NotificationLevel::Error);
    assert!(toasts[0].message.contains("Reservation not found"));
}

#[tokio::test]
async fn refetch_failure_after_cancel_toasts_load_then_cancel() {
    let h = harness().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/reservations/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "db down" })))
        .mount(&h.server)
        .await;

    h.controller
        .services()
        .reservations
        .cancel_reservation(7)
        .await
        .unwrap_err();

    let messages: Vec<String> = h
        .controller
        .notifier()
        .active()
        .into_iter()
        .map(|t| t.message)
        .collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Failed to load reservations"));
    assert!(messages[1].starts_with("Failed to cancel reservation"));
}

#[tokio::test]
async fn empty_listing_loads_silently() {
    let h = harness().await;
    h.controller
        .store()
        .set_reservations(vec![future_reservation(1)]);
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    let list = h
        .controller
        .services()
        .reservations
        .load_reservations(false)
        .await
        .unwrap();

    assert!(list.is_empty());
    assert!(h.controller.store().state().reservations.is_empty());
    assert!(h.controller.notifier().active().is_empty());
}

#[tokio::test]
async fn listing_failure_notifies_and_reraises() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let result = h
        .controller
        .services()
        .reservations
        .load_reservations(false)
        .await;

    assert!(result.is_err());
    let toasts = h.controller.notifier().active();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].message.starts_with("Failed to load reservations"));
}

#[tokio::test]
async fn upcoming_reservations_come_from_the_store() {
    let h = harness().await;
    let mut past = future_reservation(1);
    past.start_time = Utc::now() - Duration::days(1);
    past.end_time = past.start_time + Duration::hours(1);
    h.controller
        .store()
        .set_reservations(vec![past.clone(), future_reservation(2)]);

    let service = &h.controller.services().reservations;
    let upcoming = service.get_upcoming_reservations();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, 2);
    assert!(!service.can_cancel_reservation(&past));
    assert!(service.is_reservation_upcoming(&upcoming[0]));
}

// ── SystemService ───────────────────────────────────────────────────

#[tokio::test]
async fn failed_health_check_records_error_snapshot() {
    let h = harness().await;
    mount_health(&h.server, 503).await;

    let err = h.controller.services().system.load_status().await.unwrap_err();

    let status = h.controller.store().state().system_status.clone().unwrap();
    assert!(!status.is_healthy());
    assert_eq!(status.error.as_deref(), Some(err.to_string().as_str()));
    assert!(h.controller.notifier().active().is_empty());
}

// ── AppController ───────────────────────────────────────────────────

#[tokio::test]
async fn start_without_session_shows_login() {
    let h = harness().await;

    let view = h.controller.start().await;

    assert_eq!(view, ViewKind::Login);
    assert_eq!(h.controller.mounted_view(), Some(ViewKind::Login));
    assert_eq!(*h.views.lock().unwrap(), ["mount login"]);
}

#[tokio::test]
async fn start_with_rejected_token_forces_logout() {
    let h = harness_with(Some("stale-token"), |_| {}).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Could not validate credentials" })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let view = h.controller.start().await;

    assert_eq!(view, ViewKind::Login);
    let state = h.controller.store().state();
    assert_eq!(state.current_view, ViewKind::Login);
    assert!(state.auth_token.is_none());
    assert!(state.current_user.is_none());
    assert!(h.sessions.load().unwrap().is_none());
    assert!(!h.controller.services().api().has_auth_token());
    assert_eq!(h.controller.mounted_view(), Some(ViewKind::Login));
}

#[tokio::test]
async fn start_with_valid_token_reaches_dashboard() {
    let h = harness_with(Some("good-token"), |_| {}).await;
    mount_dashboard_backend(&h.server).await;
    mount_health(&h.server, 200).await;

    let view = h.controller.start().await;

    assert_eq!(view, ViewKind::Dashboard);
    let state = h.controller.store().state();
    assert_eq!(state.current_user.as_ref().unwrap().username, "alice");
    assert_eq!(state.resources.len(), 2);
    assert!(state.system_status.as_ref().unwrap().is_healthy());
    assert_eq!(
        *h.views.lock().unwrap(),
        ["mount login", "unmount login", "mount dashboard"]
    );
}

#[tokio::test]
async fn start_fails_over_to_login_when_dashboard_load_fails() {
    let h = harness_with(Some("good-token"), |_| {}).await;
    mount_dashboard_backend(&h.server).await;
    mount_health(&h.server, 500).await;

    let view = h.controller.start().await;

    assert_eq!(view, ViewKind::Login);
    assert!(h.sessions.load().unwrap().is_none());
    assert!(h.controller.store().state().auth_token.is_none());
}

#[tokio::test]
async fn login_persists_token_and_opens_dashboard() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "good-token", "token_type": "bearer"
        })))
        .mount(&h.server)
        .await;
    mount_dashboard_backend(&h.server).await;
    mount_health(&h.server, 200).await;

    h.controller.start().await;
    let user = h
        .controller
        .login("alice", &SecretString::from("pw".to_string()))
        .await
        .unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(
        h.sessions.load().unwrap().unwrap().expose_secret(),
        "good-token"
    );
    assert_eq!(h.controller.mounted_view(), Some(ViewKind::Dashboard));

    h.controller.logout();
    assert!(h.sessions.load().unwrap().is_none());
    assert_eq!(h.controller.mounted_view(), Some(ViewKind::Login));
}

#[tokio::test]
async fn bad_credentials_stay_on_login() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Incorrect username or password" })),
        )
        .mount(&h.server)
        .await;

    h.controller.start().await;
    let err = h
        .controller
        .login("alice", &SecretString::from("nope".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(h.sessions.load().unwrap().is_none());
    assert_eq!(h.controller.mounted_view(), Some(ViewKind::Login));
    assert_eq!(
        h.controller.notifier().active()[0].level,
        NotificationLevel::Error
    );
}

#[tokio::test]
async fn destroy_unmounts_and_stops_reacting() {
    let h = harness().await;
    h.controller.start().await;

    h.controller.destroy();
    h.controller.store().set_current_view(ViewKind::Dashboard);

    assert_eq!(h.controller.mounted_view(), None);
    assert_eq!(*h.views.lock().unwrap(), ["mount login", "unmount login"]);
    assert_eq!(h.controller.store().subscriber_count(), 0);
}
