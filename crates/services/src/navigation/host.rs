use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use portal_core::section::{DashboardSection, PublicSection, SectionId};

/// The live set of rendered sections.
///
/// Implementations are synchronous: they only flip flags that a renderer
/// observes.
pub trait SectionHost: Send + Sync {
    fn contains(&self, id: &SectionId) -> bool;

    /// Every mounted section, in mount order.
    fn section_ids(&self) -> Vec<SectionId>;

    fn set_active(&self, id: &SectionId, active: bool);

    fn is_active(&self, id: &SectionId) -> bool;

    /// Mirror the active section in the address fragment.
    fn set_fragment(&self, fragment: &str);

    fn highlight_nav(&self, id: &SectionId);
}

/// Fetches and mounts the markup of a dashboard section.
#[async_trait]
pub trait FragmentLoader: Send + Sync {
    /// Returns `false` when the fragment could not be mounted.
    async fn load(&self, section: DashboardSection) -> bool;
}

/// One-shot data fetch for a section, run after its first activation.
#[async_trait]
pub trait SectionLoader: Send + Sync {
    async fn load_section(&self, section: &SectionId);
}

/// Sections that have a data loader. Immutable once built.
#[derive(Clone, Default)]
pub struct SectionRegistry {
    loaders: HashMap<SectionId, Arc<dyn SectionLoader>>,
}

impl SectionRegistry {
    #[must_use]
    pub fn builder() -> SectionRegistryBuilder {
        SectionRegistryBuilder::default()
    }

    #[must_use]
    pub fn loader(&self, id: &SectionId) -> Option<Arc<dyn SectionLoader>> {
        self.loaders.get(id).cloned()
    }

    #[must_use]
    pub fn has_loader(&self, id: &SectionId) -> bool {
        self.loaders.contains_key(id)
    }

    /// Known lazily mounted sections.
    #[must_use]
    pub fn is_dashboard(id: &SectionId) -> bool {
        id.dashboard().is_some()
    }
}

#[derive(Default)]
pub struct SectionRegistryBuilder {
    loaders: HashMap<SectionId, Arc<dyn SectionLoader>>,
}

impl SectionRegistryBuilder {
    #[must_use]
    pub fn loader(mut self, id: impl Into<SectionId>, loader: Arc<dyn SectionLoader>) -> Self {
        self.loaders.insert(id.into(), loader);
        self
    }

    /// Register one loader for several sections.
    #[must_use]
    pub fn loaders<I>(mut self, ids: I, loader: &Arc<dyn SectionLoader>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        for id in ids {
            self.loaders.insert(id.into(), Arc::clone(loader));
        }
        self
    }

    #[must_use]
    pub fn build(self) -> SectionRegistry {
        SectionRegistry {
            loaders: self.loaders,
        }
    }
}

// ─── In-memory host ─────────────────────────────────────────────────────────────

/// What the renderer draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSnapshot {
    pub mounted: Vec<SectionId>,
    pub active: BTreeSet<SectionId>,
    pub fragment: String,
    pub highlighted: Option<SectionId>,
}

impl HostSnapshot {
    #[must_use]
    pub fn is_mounted(&self, id: &SectionId) -> bool {
        self.mounted.contains(id)
    }

    #[must_use]
    pub fn is_active(&self, id: &SectionId) -> bool {
        self.active.contains(id)
    }
}

/// Section host backed by a watch channel; the desktop shell renders from it.
pub struct MemorySectionHost {
    state: watch::Sender<HostSnapshot>,
}

impl Default for MemorySectionHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySectionHost {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(HostSnapshot::default());
        Self { state }
    }

    /// Host with every public section already mounted.
    #[must_use]
    pub fn with_public_sections() -> Self {
        let host = Self::new();
        for section in PublicSection::ALL {
            host.mount(section);
        }
        host
    }

    /// Add a section; mounting twice is a no-op.
    pub fn mount(&self, id: impl Into<SectionId>) {
        let id = id.into();
        self.state.send_if_modified(|state| {
            if state.mounted.contains(&id) {
                return false;
            }
            state.mounted.push(id);
            true
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> HostSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HostSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn active_sections(&self) -> Vec<SectionId> {
        self.state.borrow().active.iter().cloned().collect()
    }
}

impl SectionHost for MemorySectionHost {
    fn contains(&self, id: &SectionId) -> bool {
        self.state.borrow().is_mounted(id)
    }

    fn section_ids(&self) -> Vec<SectionId> {
        self.state.borrow().mounted.clone()
    }

    fn set_active(&self, id: &SectionId, active: bool) {
        self.state.send_if_modified(|state| {
            if !state.mounted.contains(id) {
                return false;
            }
            if active {
                state.active.insert(id.clone())
            } else {
                state.active.remove(id)
            }
        });
    }

    fn is_active(&self, id: &SectionId) -> bool {
        self.state.borrow().is_active(id)
    }

    fn set_fragment(&self, fragment: &str) {
        self.state.send_if_modified(|state| {
            if state.fragment == fragment {
                return false;
            }
            fragment.clone_into(&mut state.fragment);
            true
        });
    }

    fn highlight_nav(&self, id: &SectionId) {
        self.state.send_if_modified(|state| {
            if state.highlighted.as_ref() == Some(id) {
                return false;
            }
            state.highlighted = Some(id.clone());
            true
        });
    }
}
