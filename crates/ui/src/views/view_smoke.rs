use std::sync::Arc;

use portal_core::model::RegistrationDraft;
use portal_core::{DashboardSection, PublicSection, Role};
use services::toast::INIT_FAILED_MESSAGE;
use services::transport::HttpMethod;
use storage::repository::Storage;

use super::test_harness::{LockedStore, STUDENT_LOGIN, setup_shell, setup_shell_with_storage};

const STATS: &str = r#"{"students":1200,"faculty":45,"projects":300,"placement":92}"#;

#[tokio::test(flavor = "current_thread")]
async fn landing_renders_stats_for_signed_out_visitor() {
    let mut harness = setup_shell("", |api| {
        api.route(HttpMethod::Get, "/stats", 200, STATS);
    });

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("1200+"), "missing student count in {html}");
    assert!(html.contains("92%"), "missing placement in {html}");
    assert!(html.contains("Register"), "missing register button in {html}");
    assert!(!html.contains("Logout"), "signed-out navbar shows logout: {html}");
    assert!(html.contains(r#"data-theme="light""#), "missing theme attribute in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn programs_fragment_shows_only_active_programs() {
    let mut harness = setup_shell("#programs", |api| {
        api.route(
            HttpMethod::Get,
            "/programs",
            200,
            r#"[{"id":1,"name":"B.Tech CSE","duration":"4 Years","seats":60},
                {"id":2,"name":"Retired Diploma","isActive":false}]"#,
        );
    });

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Academic Programs"), "programs section not active: {html}");
    assert!(html.contains("B.Tech CSE"), "missing active program in {html}");
    assert!(html.contains("60 seats"), "missing seat count in {html}");
    assert!(!html.contains("Retired Diploma"), "inactive program rendered: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn inactive_sections_keep_their_slot_without_a_body() {
    let mut harness = setup_shell("", |api| {
        api.route(HttpMethod::Get, "/stats", 200, STATS);
    });
    harness.rebuild();
    harness.settle().await;

    harness
        .services
        .navigation()
        .navigate(PublicSection::Contact)
        .await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains(r#"id="home""#), "home slot dropped: {html}");
    assert!(!html.contains("1200+"), "hidden home still rendered its body: {html}");
    assert!(html.contains("Send Message"), "contact form missing: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn student_dashboard_renders_after_login() {
    let mut harness = setup_shell("", |api| {
        api.route(HttpMethod::Post, "/auth/login", 200, STUDENT_LOGIN);
        api.route(
            HttpMethod::Get,
            "/student/dashboard",
            200,
            r#"{"cgpa":8.7,"attendance":91,"projects":3,"events":2,
                "activities":[{"title":"Submitted report","description":"Compilers lab","date":"2024-01-05"}]}"#,
        );
    });
    harness.rebuild();
    harness.settle().await;

    harness
        .services
        .auth()
        .login("asha@uni.edu", "secret1", false)
        .await
        .expect("login");
    harness
        .services
        .navigation()
        .navigate(DashboardSection::StudentDashboard)
        .await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Welcome back, Asha Rao!"), "missing greeting in {html}");
    assert!(html.contains("8.7"), "missing cgpa in {html}");
    assert!(html.contains("Submitted report"), "missing activity in {html}");
    assert!(html.contains("Logout"), "signed-in navbar lacks logout: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_for_another_role_is_locked() {
    let mut harness = setup_shell("", |_| {});
    harness.rebuild();
    harness.settle().await;

    harness
        .services
        .navigation()
        .navigate(DashboardSection::AdminUsers)
        .await;
    harness.settle().await;
    let html = harness.render();

    let expected = format!("Sign in as {} to view this page.", Role::Admin.label());
    assert!(html.contains(&expected), "missing {expected} in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn registration_opens_the_verification_dialog() {
    let mut harness = setup_shell("", |api| {
        api.route(HttpMethod::Post, "/auth/register", 201, r#"{"message":"ok"}"#);
    });
    harness.rebuild();
    harness.settle().await;

    let draft = RegistrationDraft {
        user_type: Role::Student,
        full_name: "Asha Rao".into(),
        email: "asha@uni.edu".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        gender: "female".into(),
        course: "B.Tech".into(),
        year: "2".into(),
        semester: "3".into(),
        accepted_terms: true,
        ..RegistrationDraft::default()
    };
    harness.services.auth().register(draft).await.expect("register");
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Verify Your Email"), "otp dialog not shown: {html}");
    assert!(html.contains("asha@uni.edu"), "pending email missing: {html}");
    assert!(html.contains("Resend code in"), "cooldown not running: {html}");
    assert!(html.contains(r#"id="otp-code""#), "code input missing: {html}");
    assert!(html.contains("autofocus"), "code input not focused: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failed_request_surfaces_as_toast() {
    let mut harness = setup_shell("", |_| {});
    harness.rebuild();
    harness.settle().await;

    harness.services.toasts().error("Could not reach the server");
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Could not reach the server"), "toast missing: {html}");
    assert!(html.contains("toast-error"), "toast kind class missing: {html}");
    assert!(harness.links.opened().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn startup_failure_tells_the_user() {
    let storage = Storage {
        persistent: Arc::new(LockedStore),
        session: Arc::new(LockedStore),
    };
    let mut harness = setup_shell_with_storage("", storage, |_| {});

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains(INIT_FAILED_MESSAGE), "startup failure not shown: {html}");
    assert!(html.contains("toast-error"), "toast kind class missing: {html}");
}
