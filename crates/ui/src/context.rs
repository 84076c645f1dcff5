use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use portal_core::{Clock, SectionId};
use services::{
    AuthManager, ContentService, MemorySectionHost, NavigationController, PortalServices,
    ThemeManager, ToastManager,
};
use tracing::debug;

use crate::platform::LinkOpenerRef;

pub trait UiApp: Send + Sync {
    fn services(&self) -> PortalServices;
    fn link_opener(&self) -> LinkOpenerRef;

    /// Fragment the shell opens with, e.g. `#student-profile`. Empty means home.
    fn initial_fragment(&self) -> String;
}

#[derive(Clone)]
pub struct AppContext {
    services: PortalServices,
    links: LinkOpenerRef,
    initial_fragment: Arc<str>,
    bootstrap_pending: Arc<AtomicBool>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            services: app.services(),
            links: app.link_opener(),
            initial_fragment: app.initial_fragment().into(),
            bootstrap_pending: Arc::new(AtomicBool::new(true)),
        }
    }

    /// `true` exactly once per context; the shell bootstraps on that call.
    #[must_use]
    pub fn take_bootstrap(&self) -> bool {
        self.bootstrap_pending.swap(false, Ordering::AcqRel)
    }

    #[must_use]
    pub fn initial_fragment(&self) -> &str {
        &self.initial_fragment
    }

    #[must_use]
    pub fn services(&self) -> PortalServices {
        self.services.clone()
    }

    #[must_use]
    pub fn auth(&self) -> AuthManager {
        self.services.auth()
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentService> {
        self.services.content()
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationController {
        self.services.navigation()
    }

    #[must_use]
    pub fn host(&self) -> Arc<MemorySectionHost> {
        self.services.host()
    }

    #[must_use]
    pub fn theme(&self) -> Arc<ThemeManager> {
        self.services.theme()
    }

    #[must_use]
    pub fn toasts(&self) -> Arc<ToastManager> {
        self.services.toasts()
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.services.clock()
    }

    pub fn open_link(&self, url: &str) {
        self.links.open_url(url);
    }

    /// Fire-and-forget navigation from an event handler.
    pub fn go(&self, target: impl Into<SectionId>) {
        let navigation = self.navigation();
        let target = target.into();
        dioxus::prelude::spawn(async move {
            let outcome = navigation.navigate(target.clone()).await;
            debug!(%target, ?outcome, "navigation requested");
        });
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
