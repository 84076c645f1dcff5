#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use portal_core::section::{DashboardSection, SectionId};
use portal_core::time::fixed_clock;
use services::navigation::{FragmentLoader, MemorySectionHost, SectionLoader};
use services::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use services::{ApiService, AuthManager, ToastManager};
use storage::repository::{KeyValueStore, Storage, StorageError};
use storage::session_store::SessionStore;

pub const BASE: &str = "https://portal.test/api";

pub const STUDENT_LOGIN: &str =
    r#"{"accessToken":"t1","refreshToken":"r1","user":{"id":1,"fullName":"A","role":"student"}}"#;
pub const ADMIN_LOGIN: &str =
    r#"{"accessToken":"a1","refreshToken":"ar1","user":{"id":9,"fullName":"Root","role":"admin"}}"#;

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Duration,
}

/// Canned HTTP responses keyed by method and path below `BASE`.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(HttpMethod, String), Route>>,
    calls: Mutex<Vec<HttpRequest>>,
    offline: Mutex<bool>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.route_delayed(method, path, status, body, Duration::ZERO);
    }

    pub fn route_delayed(
        &self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) {
        self.routes.lock().unwrap().insert(
            (method, path.to_owned()),
            Route {
                status,
                body: body.to_owned(),
                delay,
            },
        );
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    pub fn calls_to(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{BASE}{path}");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self, method: HttpMethod, path: &str) -> Option<HttpRequest> {
        let url = format!("{BASE}{path}");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|call| call.method == method && call.url == url)
            .cloned()
    }

    pub fn last_body(&self, method: HttpMethod, path: &str) -> Option<Value> {
        self.last_request(method, path).and_then(|call| call.body)
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        if *self.offline.lock().unwrap() {
            return Err(TransportError("offline".into()));
        }

        let path = request.url.strip_prefix(BASE).unwrap_or(&request.url).to_owned();
        let route = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, path))
            .cloned();
        let Some(route) = route else {
            return Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".into(),
                body: r#"{"message":"Route not found"}"#.into(),
            });
        };
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        Ok(HttpResponse {
            status: route.status,
            status_text: String::new(),
            body: route.body,
        })
    }
}

pub struct Harness {
    pub transport: Arc<StubTransport>,
    pub storage: Storage,
    pub api: Arc<ApiService>,
    pub toasts: Arc<ToastManager>,
    pub auth: AuthManager,
}

pub fn harness() -> Harness {
    harness_with_storage(Storage::in_memory())
}

pub fn harness_with_storage(storage: Storage) -> Harness {
    let transport = StubTransport::new();
    let api = Arc::new(ApiService::new(BASE, transport.clone()));
    let toasts = Arc::new(ToastManager::new(fixed_clock(), Duration::from_secs(5)));
    let auth = AuthManager::new(
        Arc::clone(&api),
        Arc::clone(&toasts),
        SessionStore::new(storage.clone()),
        60,
    );
    Harness {
        transport,
        storage,
        api,
        toasts,
        auth,
    }
}

pub fn last_toast(toasts: &ToastManager) -> Option<String> {
    toasts.snapshot().last().map(|toast| toast.message.clone())
}

/// A storage backend whose every call fails.
pub struct UnreachableStore;

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("database is locked".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("database is locked".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("database is locked".into()))
    }
}

pub fn unreachable_storage() -> Storage {
    Storage {
        persistent: Arc::new(UnreachableStore),
        session: Arc::new(UnreachableStore),
    }
}

// ─── Navigation doubles ─────────────────────────────────────────────────────────

/// Mounts the requested section after `delay`, fails without mounting, or
/// never answers.
pub struct StubFragments {
    host: Arc<MemorySectionHost>,
    delay: Duration,
    succeed: bool,
    stalls: bool,
    loads: AtomicUsize,
}

impl StubFragments {
    pub fn new(host: Arc<MemorySectionHost>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            host,
            delay,
            succeed: true,
            stalls: false,
            loads: AtomicUsize::new(0),
        })
    }

    pub fn stalled(host: Arc<MemorySectionHost>) -> Arc<Self> {
        Arc::new(Self {
            host,
            delay: Duration::ZERO,
            succeed: false,
            stalls: true,
            loads: AtomicUsize::new(0),
        })
    }

    pub fn failing(host: Arc<MemorySectionHost>) -> Arc<Self> {
        Arc::new(Self {
            host,
            delay: Duration::ZERO,
            succeed: false,
            stalls: false,
            loads: AtomicUsize::new(0),
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FragmentLoader for StubFragments {
    async fn load(&self, section: DashboardSection) -> bool {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.stalls {
            futures::future::pending::<()>().await;
        }
        tokio::time::sleep(self.delay).await;
        if self.succeed {
            self.host.mount(section);
        }
        self.succeed
    }
}

/// Counts data loads per section.
#[derive(Default)]
pub struct CountingLoader {
    counts: Mutex<HashMap<SectionId, usize>>,
}

impl CountingLoader {
    pub fn count(&self, id: &str) -> usize {
        self.counts
            .lock()
            .unwrap()
            .get(&SectionId::from(id))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl SectionLoader for CountingLoader {
    async fn load_section(&self, section: &SectionId) {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(section.clone())
            .or_default() += 1;
    }
}
