//! Typed client for the portal REST API.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use portal_core::model::{
    About, AdminDashboard, AdminMessages, AdminUsers, AuthPayload, ContactInfo, ContactSubmission,
    DepartmentInfo, Event, EventId, FacultyDashboard, FacultyId, FacultyMember, FacultyProfile,
    MessageId, ProfileUpdate, Program, ProgramId, Project, ProjectId, Stats, StudentDashboard,
    StudentProfile, Topper, UserId, VerificationResponse,
};
use portal_core::validation::{LoginCredentials, OtpCode, Registration};

use crate::error::ApiError;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

/// Broadcast when a session-bearing call comes back 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthorized;

/// Whether a 401 on this call means the session expired.
///
/// Credential endpoints answer 401 for a wrong password or OTP, which must not
/// look like an expired session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    Signal,
    Report,
}

pub struct ApiService {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    token: RwLock<Option<String>>,
    unauthorized: broadcast::Sender<Unauthorized>,
    online: watch::Sender<bool>,
}

impl ApiService {
    #[must_use]
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        let (unauthorized, _) = broadcast::channel(16);
        let (online, _) = watch::channel(true);
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            transport,
            token: RwLock::new(None),
            unauthorized,
            online,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_auth_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    /// Subscribe to expired-session signals.
    #[must_use]
    pub fn subscribe_unauthorized(&self) -> broadcast::Receiver<Unauthorized> {
        self.unauthorized.subscribe()
    }

    /// Reachability as observed by the last request.
    #[must_use]
    pub fn subscribe_online(&self) -> watch::Receiver<bool> {
        self.online.subscribe()
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Content-Type", "application/json".to_owned()),
            ("Accept", "application/json".to_owned()),
        ];
        if let Some(token) = self.auth_token() {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    fn set_online(&self, online: bool) {
        self.online.send_if_modified(|current| {
            let changed = *current != online;
            *current = online;
            changed
        });
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        on_unauthorized: OnUnauthorized,
    ) -> Result<T, ApiError> {
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers: self.headers(),
            body,
        };
        debug!(%method, path, "api request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, path, error = %err, "api transport failure");
                self.set_online(false);
                return Err(ApiError::network());
            }
        };
        self.set_online(true);

        if response.status == 401 && on_unauthorized == OnUnauthorized::Signal {
            // Session state belongs to the auth manager; only announce it here.
            let _ = self.unauthorized.send(Unauthorized);
            return Err(ApiError::session_expired());
        }
        if !response.is_success() {
            return Err(ApiError::from_response(
                response.status,
                &response.status_text,
                &response.body,
            ));
        }

        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|err| {
            warn!(%method, path, error = %err, "unexpected response body");
            ApiError::new(
                response.status,
                "Unexpected response from server",
                Some(json!({ "detail": err.to_string() })),
            )
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, None, OnUnauthorized::Signal)
            .await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        if params.is_empty() {
            return self.get(path).await;
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        self.get(&format!("{path}?{query}")).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &impl Serialize,
        on_unauthorized: OnUnauthorized,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|err| {
            ApiError::new(0, "Could not encode request", Some(json!({ "detail": err.to_string() })))
        })?;
        self.request(method, path, Some(body), on_unauthorized).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        self.send_json(HttpMethod::Post, path, body, OnUnauthorized::Signal)
            .await
    }

    async fn post_credentials<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        self.send_json(HttpMethod::Post, path, body, OnUnauthorized::Report)
            .await
    }

    async fn put<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ApiError> {
        self.send_json(HttpMethod::Put, path, body, OnUnauthorized::Signal)
            .await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(HttpMethod::Delete, path, None, OnUnauthorized::Signal)
            .await
    }

    // ─── Auth ───────────────────────────────────────────────────────────────────

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload, ApiError> {
        self.post_credentials("/auth/login", credentials).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<Value, ApiError> {
        self.post_credentials("/auth/register", registration).await
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<Value, ApiError> {
        self.post_credentials("/auth/logout", &json!({ "refreshToken": refresh_token }))
            .await
    }

    pub async fn verify_email(
        &self,
        email: &str,
        otp: &OtpCode,
    ) -> Result<VerificationResponse, ApiError> {
        self.post_credentials(
            "/auth/verify-email",
            &json!({ "email": email, "otp": otp.as_str() }),
        )
        .await
    }

    pub async fn resend_otp(&self, email: &str) -> Result<Value, ApiError> {
        self.post_credentials("/auth/resend-otp", &json!({ "email": email }))
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        self.post_credentials("/auth/forgot-password", &json!({ "email": email }))
            .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AuthPayload, ApiError> {
        self.post_credentials("/auth/refresh", &json!({ "refreshToken": refresh_token }))
            .await
    }

    /// Checks the current access token. A 401 here is a real expiry.
    pub async fn verify_token(&self) -> Result<Value, ApiError> {
        self.get("/auth/verify").await
    }

    // ─── Public content ─────────────────────────────────────────────────────────

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get("/stats").await
    }

    pub async fn about(&self) -> Result<About, ApiError> {
        self.get("/about").await
    }

    pub async fn programs(&self) -> Result<Vec<Program>, ApiError> {
        self.get("/programs").await
    }

    pub async fn faculty(&self) -> Result<Vec<FacultyMember>, ApiError> {
        self.get("/faculty").await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get("/projects").await
    }

    pub async fn events(&self) -> Result<Vec<Event>, ApiError> {
        self.get("/events").await
    }

    pub async fn register_for_event(&self, event_id: &EventId) -> Result<Value, ApiError> {
        self.post(&format!("/events/{event_id}/register"), &json!({}))
            .await
    }

    pub async fn toppers(&self) -> Result<Vec<Topper>, ApiError> {
        self.get("/toppers").await
    }

    pub async fn contact(&self) -> Result<ContactInfo, ApiError> {
        self.get("/contact").await
    }

    pub async fn submit_contact(&self, submission: &ContactSubmission) -> Result<Value, ApiError> {
        self.post("/contact/submit", submission).await
    }

    // ─── Student ────────────────────────────────────────────────────────────────

    pub async fn student_dashboard(&self) -> Result<StudentDashboard, ApiError> {
        self.get("/student/dashboard").await
    }

    pub async fn student_profile(&self) -> Result<StudentProfile, ApiError> {
        self.get("/student/profile").await
    }

    pub async fn update_student_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        self.put("/student/profile", update).await
    }

    // ─── Faculty ────────────────────────────────────────────────────────────────

    pub async fn faculty_dashboard(&self) -> Result<FacultyDashboard, ApiError> {
        self.get("/faculty/dashboard").await
    }

    pub async fn faculty_profile(&self) -> Result<FacultyProfile, ApiError> {
        self.get("/faculty/profile").await
    }

    pub async fn update_faculty_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        self.put("/faculty/profile", update).await
    }

    // ─── Admin ──────────────────────────────────────────────────────────────────

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, ApiError> {
        self.get("/admin/dashboard").await
    }

    pub async fn admin_users(&self) -> Result<AdminUsers, ApiError> {
        self.get("/admin/users").await
    }

    pub async fn delete_user(&self, user_id: &UserId) -> Result<Value, ApiError> {
        self.delete(&format!("/admin/users/{user_id}")).await
    }

    pub async fn department_info(&self) -> Result<DepartmentInfo, ApiError> {
        self.get("/admin/department-info").await
    }

    pub async fn update_department_info(&self, info: &DepartmentInfo) -> Result<Value, ApiError> {
        self.put("/admin/department-info", info).await
    }

    /// Accepts a bare array, `{data: [...]}` or `{projects: [...]}`.
    pub async fn admin_projects(&self) -> Result<Vec<Project>, ApiError> {
        let raw: Value = self.get("/admin/projects").await?;
        let list = match &raw {
            Value::Array(_) => Some(raw.clone()),
            Value::Object(map) => ["data", "projects"]
                .iter()
                .find_map(|key| map.get(*key).filter(|value| value.is_array()).cloned()),
            _ => None,
        };
        match list {
            Some(list) => serde_json::from_value(list).map_err(|err| {
                ApiError::new(
                    200,
                    "Unexpected response from server",
                    Some(json!({ "detail": err.to_string() })),
                )
            }),
            None => Ok(Vec::new()),
        }
    }

    pub async fn delete_project(&self, project_id: &ProjectId) -> Result<Value, ApiError> {
        self.delete(&format!("/admin/projects/{project_id}")).await
    }

    pub async fn admin_events(&self) -> Result<Vec<Event>, ApiError> {
        self.get("/admin/events").await
    }

    pub async fn delete_event(&self, event_id: &EventId) -> Result<Value, ApiError> {
        self.delete(&format!("/admin/events/{event_id}")).await
    }

    pub async fn admin_messages(&self, unread_only: bool) -> Result<AdminMessages, ApiError> {
        if unread_only {
            self.get_with_query("/admin/messages", &[("unread", "true")])
                .await
        } else {
            self.get("/admin/messages").await
        }
    }

    pub async fn mark_message_read(&self, message_id: &MessageId) -> Result<Value, ApiError> {
        self.put(&format!("/admin/messages/{message_id}/read"), &json!({}))
            .await
    }

    pub async fn delete_faculty_member(&self, faculty_id: &FacultyId) -> Result<Value, ApiError> {
        self.delete(&format!("/admin/faculty-members/{faculty_id}"))
            .await
    }

    pub async fn delete_program(&self, program_id: &ProgramId) -> Result<Value, ApiError> {
        self.delete(&format!("/admin/programs/{program_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpResponse, TransportError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for Canned {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                status_text: String::new(),
                body: self.body.to_owned(),
            })
        }
    }

    struct Offline;

    #[async_trait]
    impl HttpTransport for Offline {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn sends_json_headers_and_bearer_token() {
        let transport = Canned::new(200, r#"{"students":10}"#);
        let api = ApiService::new("https://api.test/api/", transport.clone());
        api.set_auth_token(Some("t1".into()));

        let stats = api.stats().await.unwrap();
        assert_eq!(stats.students, 10);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://api.test/api/stats");
        assert_eq!(seen[0].header("accept"), Some("application/json"));
        assert_eq!(seen[0].header("content-type"), Some("application/json"));
        assert_eq!(seen[0].header("authorization"), Some("Bearer t1"));
    }

    #[tokio::test]
    async fn unread_messages_query_is_encoded() {
        let transport = Canned::new(200, r#"{"unreadCount":0,"messages":[]}"#);
        let api = ApiService::new("https://api.test", transport.clone());
        api.admin_messages(true).await.unwrap();
        assert_eq!(
            transport.seen.lock().unwrap()[0].url,
            "https://api.test/admin/messages?unread=true"
        );
    }

    #[tokio::test]
    async fn session_401_signals_once() {
        let api = ApiService::new("https://api.test", Canned::new(401, ""));
        let mut signals = api.subscribe_unauthorized();

        let err = api.student_dashboard().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.message(), "Session expired. Please login again.");
        assert_eq!(signals.try_recv(), Ok(Unauthorized));
        assert!(signals.try_recv().is_err());
    }

    #[tokio::test]
    async fn credential_401_does_not_signal() {
        let api = ApiService::new(
            "https://api.test",
            Canned::new(401, r#"{"message":"Invalid credentials"}"#),
        );
        let mut signals = api.subscribe_unauthorized();
        let creds = LoginCredentials::parse("a@b.com", "wrong1", false).unwrap();

        let err = api.login(&creds).await.unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");
        assert!(signals.try_recv().is_err());
    }

    #[tokio::test]
    async fn transport_failure_is_network_error_and_goes_offline() {
        let api = ApiService::new("https://api.test", Arc::new(Offline));
        let online = api.subscribe_online();
        let err = api.about().await.unwrap_err();
        assert!(err.is_network());
        assert!(!*online.borrow());
    }

    #[tokio::test]
    async fn admin_projects_accepts_wrapped_shapes() {
        for body in [
            r#"[{"id":1,"title":"A"}]"#,
            r#"{"data":[{"id":1,"title":"A"}]}"#,
            r#"{"projects":[{"id":1,"title":"A"}]}"#,
        ] {
            let api = ApiService::new("https://api.test", Canned::new(200, body));
            let projects = api.admin_projects().await.unwrap();
            assert_eq!(projects.len(), 1, "body: {body}");
        }
        let api = ApiService::new("https://api.test", Canned::new(200, r#"{"ok":true}"#));
        assert!(api.admin_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_hits_resource_path() {
        let transport = Canned::new(204, "");
        let api = ApiService::new("https://api.test", transport.clone());
        api.delete_program(&ProgramId::new("p7")).await.unwrap();
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert_eq!(seen[0].url, "https://api.test/admin/programs/p7");
    }
}
