mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    ADMIN_LOGIN, BASE, Harness, STUDENT_LOGIN, StubFragments, StubTransport, harness, last_toast,
    unreachable_storage,
};
use portal_core::model::{ContactSubmission, EventId, UserId};
use portal_core::section::SectionId;
use portal_core::time::fixed_clock;
use services::auth::AuthEvent;
use services::navigation::{FragmentLoader, MemorySectionHost, NavOutcome, SectionLoader};
use services::transport::HttpMethod;
use services::error::{AuthError, PortalServicesError};
use services::toast::INIT_FAILED_MESSAGE;
use services::{ContentError, ContentService, PortalConfig, PortalServices, ToastKind};
use storage::repository::Storage;

const EVENTS: &str = r#"[{"id":1,"title":"Hackathon","date":"2030-01-01"}]"#;

fn content(h: &Harness) -> ContentService {
    ContentService::new(Arc::clone(&h.api), h.auth.clone(), Arc::clone(&h.toasts))
}

async fn sign_in(h: &Harness, body: &str) {
    h.transport.route(HttpMethod::Post, "/auth/login", 200, body);
    h.auth.login("a@b.com", "secret1", false).await.unwrap();
}

#[tokio::test]
async fn startup_loads_fill_landing_page() {
    let h = harness();
    h.transport.route(
        HttpMethod::Get,
        "/stats",
        200,
        r#"{"students":1200,"faculty":45,"projects":80,"placement":92}"#,
    );
    h.transport
        .route(HttpMethod::Get, "/about", 200, r#"{"vision":"Learn"}"#);
    h.transport.route(HttpMethod::Get, "/programs", 500, "");
    let content = content(&h);

    content.startup_loads().await;

    let state = content.snapshot();
    assert_eq!(state.stats.unwrap().students, 1200);
    assert_eq!(state.about.unwrap().vision, "Learn");
    assert_eq!(state.programs, None);
    let contact = state.contact.unwrap();
    assert_eq!(contact.phone_or_default(), "+91-123-456-7890");
    assert!(h.toasts.snapshot().is_empty());
}

#[tokio::test]
async fn public_section_load_needs_no_session() {
    let h = harness();
    h.transport.route(HttpMethod::Get, "/events", 200, EVENTS);
    let content = content(&h);

    content.load_section(&SectionId::from("events")).await;

    let events = content.snapshot().events.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Hackathon");
}

#[tokio::test]
async fn dashboard_feed_is_skipped_for_other_roles() {
    let h = harness();
    let content = content(&h);

    content.load_section(&SectionId::from("student-dashboard")).await;
    assert_eq!(h.transport.total_calls(), 0);

    sign_in(&h, ADMIN_LOGIN).await;
    content.load_section(&SectionId::from("student-dashboard")).await;
    assert_eq!(h.transport.calls_to(HttpMethod::Get, "/student/dashboard"), 0);
}

#[tokio::test]
async fn student_dashboard_failure_is_reported() {
    let h = harness();
    sign_in(&h, STUDENT_LOGIN).await;
    h.transport.route(
        HttpMethod::Get,
        "/student/dashboard",
        500,
        r#"{"message":"Database unavailable"}"#,
    );
    let content = content(&h);
    let section = SectionId::from("student-dashboard");

    content.load_section(&section).await;

    let state = content.snapshot();
    assert_eq!(state.student_dashboard, None);
    assert_eq!(state.error(&section), Some("Database unavailable"));
    let toast = h.toasts.snapshot().pop().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Failed to load student dashboard");

    h.transport.route(
        HttpMethod::Get,
        "/student/dashboard",
        200,
        r#"{"cgpa":"8.4","projects":3}"#,
    );
    content.load_section(&section).await;
    let state = content.snapshot();
    assert_eq!(state.error(&section), None);
    assert_eq!(state.student_dashboard.unwrap().cgpa, Some(8.4));
}

#[tokio::test]
async fn admin_feeds_accept_wrapped_lists_and_unread_filter() {
    let h = harness();
    sign_in(&h, ADMIN_LOGIN).await;
    h.transport.route(
        HttpMethod::Get,
        "/admin/projects",
        200,
        r#"{"projects":[{"id":"p1","title":"Rover"}]}"#,
    );
    h.transport.route(
        HttpMethod::Get,
        "/admin/messages?unread=true",
        200,
        r#"{"unreadCount":2,"messages":[]}"#,
    );
    let content = content(&h);

    content.load_section(&SectionId::from("admin-projects")).await;
    content.load_section(&SectionId::from("admin-messages")).await;

    let state = content.snapshot();
    assert_eq!(state.admin_projects.unwrap()[0].title, "Rover");
    assert_eq!(state.admin_messages.unwrap().unread_count, 2);
    assert_eq!(h.transport.calls_to(HttpMethod::Get, "/admin/messages"), 0);
}

#[tokio::test]
async fn event_registration_requires_login() {
    let h = harness();
    let content = content(&h);
    let mut events = h.auth.subscribe_events();

    let err = content
        .register_for_event(&EventId::new("1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ContentError::LoginRequired));
    assert_eq!(h.transport.total_calls(), 0);
    assert_eq!(events.try_recv().unwrap(), AuthEvent::LoginRequired);
    assert_eq!(
        last_toast(&h.toasts).as_deref(),
        Some("Please login to register for events")
    );
}

#[tokio::test]
async fn event_registration_refreshes_events() {
    let h = harness();
    sign_in(&h, STUDENT_LOGIN).await;
    h.transport
        .route(HttpMethod::Post, "/events/1/register", 200, r#"{"success":true}"#);
    h.transport.route(HttpMethod::Get, "/events", 200, EVENTS);
    let content = content(&h);

    content.register_for_event(&EventId::new("1")).await.unwrap();

    assert_eq!(h.transport.calls_to(HttpMethod::Get, "/events"), 1);
    assert!(content.snapshot().events.is_some());
    assert_eq!(
        last_toast(&h.toasts).as_deref(),
        Some("Successfully registered for event!")
    );
}

#[tokio::test]
async fn admin_mutations_check_role_first() {
    let h = harness();
    let content = content(&h);
    let user = UserId::new("7");

    assert!(matches!(
        content.delete_user(&user).await,
        Err(ContentError::LoginRequired)
    ));
    sign_in(&h, STUDENT_LOGIN).await;
    assert!(matches!(
        content.delete_user(&user).await,
        Err(ContentError::Forbidden)
    ));
    assert_eq!(h.transport.calls_to(HttpMethod::Delete, "/admin/users/7"), 0);

    sign_in(&h, ADMIN_LOGIN).await;
    h.transport
        .route(HttpMethod::Delete, "/admin/users/7", 200, "");
    h.transport
        .route(HttpMethod::Get, "/admin/users", 200, r#"{"users":[]}"#);

    content.delete_user(&user).await.unwrap();

    assert_eq!(h.transport.calls_to(HttpMethod::Delete, "/admin/users/7"), 1);
    assert_eq!(h.transport.calls_to(HttpMethod::Get, "/admin/users"), 1);
    assert_eq!(last_toast(&h.toasts).as_deref(), Some("User deleted successfully!"));
}

#[tokio::test]
async fn rejected_mutation_surfaces_server_message() {
    let h = harness();
    sign_in(&h, ADMIN_LOGIN).await;
    h.transport.route(
        HttpMethod::Delete,
        "/admin/events/3",
        409,
        r#"{"message":"Event has registrations"}"#,
    );
    let content = content(&h);

    let err = content.delete_event(&EventId::new("3")).await.unwrap_err();

    assert!(matches!(err, ContentError::Api(ref api) if api.status() == 409));
    assert_eq!(h.transport.calls_to(HttpMethod::Get, "/admin/events"), 0);
    assert_eq!(last_toast(&h.toasts).as_deref(), Some("Event has registrations"));
}

#[tokio::test]
async fn contact_form_validates_before_sending() {
    let h = harness();
    let content = content(&h);
    let mut submission = ContactSubmission {
        name: "Ravi".into(),
        email: "ravi@".into(),
        subject: "Admissions".into(),
        message: "When do applications open?".into(),
    };

    assert!(matches!(
        content.submit_contact(submission.clone()).await,
        Err(ContentError::Validation(_))
    ));
    assert_eq!(h.transport.total_calls(), 0);

    submission.email = "ravi@mail.com".into();
    h.transport
        .route(HttpMethod::Post, "/contact/submit", 200, "{}");
    content.submit_contact(submission).await.unwrap();
    let body = h
        .transport
        .last_body(HttpMethod::Post, "/contact/submit")
        .unwrap();
    assert_eq!(body["subject"], "Admissions");
}

// ─── Bootstrap ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bootstrap_restores_session_and_opens_fragment() {
    let storage = Storage::in_memory();
    let first = common::harness_with_storage(storage.clone());
    sign_in(&first, STUDENT_LOGIN).await;

    let transport = StubTransport::new();
    transport.route(HttpMethod::Get, "/auth/verify", 200, r#"{"valid":true}"#);
    transport.route(HttpMethod::Get, "/student/profile", 200, r#"{"fullName":"A"}"#);
    let host = Arc::new(MemorySectionHost::with_public_sections());
    let fragments: Arc<dyn FragmentLoader> =
        StubFragments::new(Arc::clone(&host), Duration::from_millis(10));
    let config = PortalConfig {
        api_base_url: BASE.to_owned(),
        ..PortalConfig::default()
    };
    let portal = PortalServices::new(
        config,
        fixed_clock(),
        storage,
        transport.clone(),
        Arc::clone(&host),
        fragments,
    );

    let (outcome, watchers) = portal.bootstrap("#student-profile").await.unwrap();

    assert_eq!(
        outcome,
        NavOutcome::Activated(SectionId::from("student-profile"))
    );
    assert!(portal.auth().is_authenticated());
    assert_eq!(transport.calls_to(HttpMethod::Get, "/auth/verify"), 1);
    assert_eq!(transport.calls_to(HttpMethod::Get, "/stats"), 1);
    assert!(portal.content().snapshot().contact.is_some());

    portal.navigation().settle().await;
    assert_eq!(transport.calls_to(HttpMethod::Get, "/student/profile"), 1);
    assert!(portal.content().snapshot().student_profile.is_some());

    for watcher in watchers {
        watcher.abort();
    }
}

#[tokio::test]
async fn logout_after_bootstrap_returns_home() {
    let transport = StubTransport::new();
    let host = Arc::new(MemorySectionHost::with_public_sections());
    let fragments: Arc<dyn FragmentLoader> =
        StubFragments::new(Arc::clone(&host), Duration::ZERO);
    let config = PortalConfig {
        api_base_url: BASE.to_owned(),
        ..PortalConfig::default()
    };
    let portal = PortalServices::new(
        config,
        fixed_clock(),
        Storage::in_memory(),
        transport.clone(),
        Arc::clone(&host),
        fragments,
    );
    let (outcome, watchers) = portal.bootstrap("#contact").await.unwrap();
    assert_eq!(outcome, NavOutcome::Activated(SectionId::from("contact")));

    transport.route(HttpMethod::Post, "/auth/login", 200, STUDENT_LOGIN);
    portal.auth().login("a@b.com", "secret1", false).await.unwrap();
    let mut nav = portal.navigation().subscribe();
    portal.auth().logout().await;

    tokio::time::timeout(
        Duration::from_secs(2),
        nav.wait_for(|snapshot| snapshot.current == Some(SectionId::home())),
    )
    .await
    .expect("navigated home")
    .unwrap();
    assert_eq!(host.active_sections(), vec![SectionId::home()]);

    for watcher in watchers {
        watcher.abort();
    }
}

#[tokio::test]
async fn bootstrap_failure_is_toasted() {
    let transport = StubTransport::new();
    let host = Arc::new(MemorySectionHost::with_public_sections());
    let fragments: Arc<dyn FragmentLoader> =
        StubFragments::new(Arc::clone(&host), Duration::ZERO);
    let config = PortalConfig {
        api_base_url: BASE.to_owned(),
        ..PortalConfig::default()
    };
    let portal = PortalServices::new(
        config,
        fixed_clock(),
        unreachable_storage(),
        transport.clone(),
        host,
        fragments,
    );

    let err = portal.bootstrap("").await.unwrap_err();

    assert!(matches!(err, PortalServicesError::Auth(AuthError::Storage(_))));
    let toasts = portal.toasts().snapshot();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, INIT_FAILED_MESSAGE);
    assert_eq!(transport.total_calls(), 0);
}
