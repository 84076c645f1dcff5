use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use portal_core::Clock;
use portal_core::section::SectionId;
use storage::repository::Storage;
use storage::session_store::SessionStore;

use crate::api::ApiService;
use crate::auth::{AuthEvent, AuthManager};
use crate::config::PortalConfig;
use crate::content::ContentService;
use crate::error::PortalServicesError;
use crate::navigation::{
    FragmentLoader, MemorySectionHost, NavOutcome, NavigationController, SectionLoader,
    SectionRegistry,
};
use crate::theme::ThemeManager;
use crate::toast::{INIT_FAILED_MESSAGE, ToastManager};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Every service the shell talks to, built once in dependency order.
#[derive(Clone)]
pub struct PortalServices {
    config: PortalConfig,
    clock: Clock,
    toasts: Arc<ToastManager>,
    api: Arc<ApiService>,
    theme: Arc<ThemeManager>,
    auth: AuthManager,
    content: Arc<ContentService>,
    navigation: NavigationController,
    host: Arc<MemorySectionHost>,
}

impl PortalServices {
    #[must_use]
    pub fn new(
        config: PortalConfig,
        clock: Clock,
        storage: Storage,
        transport: Arc<dyn HttpTransport>,
        host: Arc<MemorySectionHost>,
        fragments: Arc<dyn FragmentLoader>,
    ) -> Self {
        let toasts = Arc::new(ToastManager::new(clock, config.timings.toast));
        let api = Arc::new(ApiService::new(config.api_base_url.clone(), transport));
        let theme = Arc::new(ThemeManager::new(Arc::clone(&storage.persistent)));
        let auth = AuthManager::new(
            Arc::clone(&api),
            Arc::clone(&toasts),
            SessionStore::new(storage),
            config.timings.resend_cooldown_secs,
        );
        let content = Arc::new(ContentService::new(
            Arc::clone(&api),
            auth.clone(),
            Arc::clone(&toasts),
        ));

        let loader: Arc<dyn SectionLoader> = content.clone();
        let registry = SectionRegistry::builder()
            .loaders(ContentService::sections(), &loader)
            .build();
        let navigation = NavigationController::new(
            host.clone(),
            fragments,
            registry,
            config.timings,
        );

        Self {
            config,
            clock,
            toasts,
            api,
            theme,
            auth,
            content,
            navigation,
            host,
        }
    }

    /// Build services over `SQLite` storage and the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `PortalServicesError` if storage or the HTTP client cannot be
    /// initialized.
    pub async fn open(
        config: PortalConfig,
        clock: Clock,
        db_url: &str,
        host: Arc<MemorySectionHost>,
        fragments: Arc<dyn FragmentLoader>,
    ) -> Result<Self, PortalServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout)?);
        Ok(Self::new(config, clock, storage, transport, host, fragments))
    }

    /// Restore the session, fetch landing data, start the background watchers,
    /// then show the section named by `initial_fragment`.
    ///
    /// # Errors
    ///
    /// Returns `PortalServicesError::Auth` if the stored session cannot be read.
    /// The user is told with an error toast.
    pub async fn bootstrap(
        &self,
        initial_fragment: &str,
    ) -> Result<(NavOutcome, Vec<JoinHandle<()>>), PortalServicesError> {
        let started = self.start(initial_fragment).await;
        if let Err(err) = &started {
            error!(error = %err, "portal failed to start");
            self.toasts.error(INIT_FAILED_MESSAGE);
        }
        started
    }

    async fn start(
        &self,
        initial_fragment: &str,
    ) -> Result<(NavOutcome, Vec<JoinHandle<()>>), PortalServicesError> {
        if let Err(err) = self.theme.load().await {
            warn!(error = %err, "theme preference unavailable; using light");
        }
        if self.auth.restore().await? {
            self.auth.check_status().await;
        }
        self.content.startup_loads().await;

        let watchers = vec![
            self.auth.spawn_unauthorized_watcher(),
            self.spawn_auth_bridge(),
            self.spawn_connectivity_watcher(),
            self.spawn_toast_pruner(),
        ];

        let outcome = self
            .navigation
            .handle_initial_fragment(initial_fragment)
            .await;
        info!(?outcome, api = %self.config.api_base_url, "portal ready");
        Ok((outcome, watchers))
    }

    fn spawn_auth_bridge(&self) -> JoinHandle<()> {
        let mut events = self.auth.subscribe_events();
        let navigation = self.navigation.clone();
        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "auth events lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                match event {
                    AuthEvent::NavigateHome => {
                        navigation.navigate(SectionId::home()).await;
                    }
                    AuthEvent::SignedIn(_) | AuthEvent::SignedOut => navigation.reset_loaded(),
                    AuthEvent::VerificationRequired { .. } | AuthEvent::LoginRequired => {}
                }
            }
        })
    }

    fn spawn_connectivity_watcher(&self) -> JoinHandle<()> {
        let mut online = self.api.subscribe_online();
        let toasts = Arc::clone(&self.toasts);
        tokio::spawn(async move {
            while online.changed().await.is_ok() {
                let now_online = *online.borrow_and_update();
                toasts.connectivity_changed(now_online);
            }
        })
    }

    fn spawn_toast_pruner(&self) -> JoinHandle<()> {
        let toasts = Arc::clone(&self.toasts);
        let clock = self.clock;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(250));
            loop {
                interval.tick().await;
                toasts.prune(clock.now());
            }
        })
    }

    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn toasts(&self) -> Arc<ToastManager> {
        Arc::clone(&self.toasts)
    }

    #[must_use]
    pub fn api(&self) -> Arc<ApiService> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn theme(&self) -> Arc<ThemeManager> {
        Arc::clone(&self.theme)
    }

    #[must_use]
    pub fn auth(&self) -> AuthManager {
        self.auth.clone()
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentService> {
        Arc::clone(&self.content)
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationController {
        self.navigation.clone()
    }

    #[must_use]
    pub fn host(&self) -> Arc<MemorySectionHost> {
        Arc::clone(&self.host)
    }
}
