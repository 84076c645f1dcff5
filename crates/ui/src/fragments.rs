use std::sync::Arc;

use async_trait::async_trait;
use portal_core::DashboardSection;
use services::{FragmentLoader, MemorySectionHost};
use tracing::debug;

/// Mounts dashboard sections into the host the shell renders from.
///
/// Dashboard views are compiled in, so mounting only registers the section;
/// the shell renders its component once the host lists it.
pub struct ComponentFragmentLoader {
    host: Arc<MemorySectionHost>,
}

impl ComponentFragmentLoader {
    #[must_use]
    pub fn new(host: Arc<MemorySectionHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl FragmentLoader for ComponentFragmentLoader {
    async fn load(&self, section: DashboardSection) -> bool {
        tokio::task::yield_now().await;
        self.host.mount(section);
        debug!(%section, "dashboard section mounted");
        true
    }
}
