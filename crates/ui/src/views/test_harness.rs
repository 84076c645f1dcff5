use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use portal_core::time::fixed_clock;
use services::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use services::{MemorySectionHost, PortalConfig, PortalServices, Timings};
use storage::repository::{KeyValueStore, Storage, StorageError};

use crate::app::App;
use crate::context::{UiApp, build_app_context};
use crate::fragments::ComponentFragmentLoader;
use crate::platform::{LinkOpenerRef, RecordingLinkOpener};

pub const BASE: &str = "https://portal.test/api";

pub const STUDENT_LOGIN: &str = r#"{"accessToken":"t1","refreshToken":"r1","user":{"id":1,"fullName":"Asha Rao","email":"asha@uni.edu","role":"student"}}"#;

/// Canned JSON keyed by method and path below `BASE`; anything else is a 404.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(HttpMethod, String), (u16, String)>>,
}

impl StubTransport {
    pub fn route(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_owned()), (status, body.to_owned()));
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.url.strip_prefix(BASE).unwrap_or(&request.url);
        let path = path.split('?').next().unwrap_or(path).to_owned();
        let (status, body) = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, path))
            .cloned()
            .unwrap_or((404, r#"{"message":"Route not found"}"#.to_owned()));
        Ok(HttpResponse {
            status,
            status_text: String::new(),
            body,
        })
    }
}

/// Storage that refuses every read and write.
pub struct LockedStore;

#[async_trait]
impl KeyValueStore for LockedStore {
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

struct TestApp {
    services: PortalServices,
    links: Arc<RecordingLinkOpener>,
    fragment: String,
}

impl UiApp for TestApp {
    fn services(&self) -> PortalServices {
        self.services.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        self.links.clone()
    }

    fn initial_fragment(&self) -> String {
        self.fragment.clone()
    }
}

#[derive(Props, Clone)]
struct ShellHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for ShellHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ShellRoot(props: ShellHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { App {} }
}

pub struct ShellHarness {
    pub dom: VirtualDom,
    pub services: PortalServices,
    pub links: Arc<RecordingLinkOpener>,
}

impl ShellHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned tasks and watch channels catch up, then re-render.
    pub async fn settle(&mut self) {
        for _ in 0..8 {
            let _ = tokio::time::timeout(Duration::from_millis(25), self.dom.wait_for_work()).await;
            drive_dom(&mut self.dom);
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Timings with no pacing so navigation resolves within a few polls.
fn instant_config() -> PortalConfig {
    PortalConfig {
        api_base_url: BASE.to_owned(),
        timings: Timings {
            navigation_grace: Duration::ZERO,
            fragment_settle: Duration::ZERO,
            data_load_delay: Duration::ZERO,
            ..Timings::default()
        },
        ..PortalConfig::default()
    }
}

/// Build the whole shell over a stub API; `routes` runs before the first render.
pub fn setup_shell(fragment: &str, routes: impl FnOnce(&StubTransport)) -> ShellHarness {
    setup_shell_with_storage(fragment, Storage::in_memory(), routes)
}

pub fn setup_shell_with_storage(
    fragment: &str,
    storage: Storage,
    routes: impl FnOnce(&StubTransport),
) -> ShellHarness {
    let transport = Arc::new(StubTransport::default());
    routes(&transport);

    let host = Arc::new(MemorySectionHost::with_public_sections());
    let services = PortalServices::new(
        instant_config(),
        fixed_clock(),
        storage,
        transport,
        host.clone(),
        Arc::new(ComponentFragmentLoader::new(host)),
    );
    let links = Arc::new(RecordingLinkOpener::default());
    let app = Arc::new(TestApp {
        services: services.clone(),
        links: Arc::clone(&links),
        fragment: fragment.to_owned(),
    });

    let dom = VirtualDom::new_with_props(ShellRoot, ShellHarnessProps { app });
    ShellHarness {
        dom,
        services,
        links,
    }
}
