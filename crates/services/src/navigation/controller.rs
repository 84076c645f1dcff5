use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use portal_core::section::{DashboardSection, SectionId};

use crate::config::Timings;
use crate::navigation::{FragmentLoader, SectionHost, SectionRegistry};

/// Step a navigation request is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavPhase {
    #[default]
    Idle,
    Resolving,
    Materializing,
    Activating,
}

/// Result of one navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Activated(SectionId),
    AlreadyActive,
    /// The same target is still being resolved.
    AlreadyInFlight,
    /// Another target is being resolved; this request was dropped.
    Busy { in_flight: SectionId },
    /// The same target finished moments ago.
    Debounced,
    /// The target could not be resolved; home is shown instead.
    FellBack { requested: SectionId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavSnapshot {
    pub current: Option<SectionId>,
    pub phase: NavPhase,
    pub in_flight: Option<SectionId>,
    pub loaded: BTreeSet<SectionId>,
}

type Materialization = Shared<BoxFuture<'static, bool>>;

struct NavInner {
    host: Arc<dyn SectionHost>,
    fragments: Arc<dyn FragmentLoader>,
    registry: SectionRegistry,
    timings: Timings,
    state: watch::Sender<NavSnapshot>,
    in_flight: Mutex<Option<SectionId>>,
    last_finished: Mutex<Option<(SectionId, Instant)>>,
    materializing: Mutex<HashMap<DashboardSection, Materialization>>,
    loader_tasks: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the in-flight slot however the request ends.
struct InFlight<'a> {
    inner: &'a NavInner,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *lock(&self.inner.in_flight) = None;
        self.inner.state.send_modify(|state| {
            state.in_flight = None;
            state.phase = NavPhase::Idle;
        });
    }
}

/// Shows exactly one section at a time, mounting dashboard sections on demand.
///
/// Requests move through `Resolving`, optionally `Materializing`, then
/// `Activating`. Only one request is in flight; a request for a different
/// target while one runs is reported as `Busy`.
#[derive(Clone)]
pub struct NavigationController {
    inner: Arc<NavInner>,
}

impl NavigationController {
    #[must_use]
    pub fn new(
        host: Arc<dyn SectionHost>,
        fragments: Arc<dyn FragmentLoader>,
        registry: SectionRegistry,
        timings: Timings,
    ) -> Self {
        let (state, _) = watch::channel(NavSnapshot::default());
        Self {
            inner: Arc::new(NavInner {
                host,
                fragments,
                registry,
                timings,
                state,
                in_flight: Mutex::new(None),
                last_finished: Mutex::new(None),
                materializing: Mutex::new(HashMap::new()),
                loader_tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> NavSnapshot {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NavSnapshot> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Option<SectionId> {
        self.inner.state.borrow().current.clone()
    }

    fn set_phase(&self, phase: NavPhase) {
        self.inner.state.send_if_modified(|state| {
            let changed = state.phase != phase;
            state.phase = phase;
            changed
        });
    }

    /// Show `target`, hiding every other section.
    pub async fn navigate(&self, target: impl Into<SectionId>) -> NavOutcome {
        let target = target.into();
        let _in_flight = match self.claim(&target) {
            Ok(guard) => guard,
            Err(outcome) => {
                debug!(section = %target, ?outcome, "navigation skipped");
                return outcome;
            }
        };

        debug!(section = %target, "resolving section");
        let outcome = match self.resolve(&target).await {
            Some(resolved) => {
                self.activate(&resolved);
                NavOutcome::Activated(resolved)
            }
            None => {
                self.fall_back(&target);
                NavOutcome::FellBack {
                    requested: target.clone(),
                }
            }
        };
        *lock(&self.inner.last_finished) = Some((target, Instant::now()));
        outcome
    }

    fn claim(&self, target: &SectionId) -> Result<InFlight<'_>, NavOutcome> {
        let mut in_flight = lock(&self.inner.in_flight);
        if let Some(running) = in_flight.as_ref() {
            return Err(if running == target {
                NavOutcome::AlreadyInFlight
            } else {
                NavOutcome::Busy {
                    in_flight: running.clone(),
                }
            });
        }
        if self.current().as_ref() == Some(target) && self.inner.host.is_active(target) {
            return Err(NavOutcome::AlreadyActive);
        }
        if let Some((last, at)) = lock(&self.inner.last_finished).as_ref() {
            if last == target && at.elapsed() < self.inner.timings.navigation_grace {
                return Err(NavOutcome::Debounced);
            }
        }

        *in_flight = Some(target.clone());
        self.inner.state.send_modify(|state| {
            state.in_flight = Some(target.clone());
            state.phase = NavPhase::Resolving;
        });
        Ok(InFlight { inner: &self.inner })
    }

    async fn resolve(&self, target: &SectionId) -> Option<SectionId> {
        if self.inner.host.contains(target) {
            return Some(target.clone());
        }
        let Some(section) = target.dashboard() else {
            warn!(section = %target, "unknown section");
            return None;
        };

        self.set_phase(NavPhase::Materializing);
        if !self.materialize(section).await {
            warn!(%section, "dashboard fragment failed to load");
            return None;
        }
        tokio::time::sleep(self.inner.timings.fragment_settle).await;

        if self.inner.host.contains(target) {
            Some(target.clone())
        } else {
            warn!(%section, "fragment loaded but section is still missing");
            None
        }
    }

    /// Mount a dashboard section if it is not mounted yet.
    ///
    /// Concurrent calls for the same section share one load.
    pub async fn materialize(&self, section: DashboardSection) -> bool {
        if self.inner.host.contains(&SectionId::from(section)) {
            return true;
        }
        let load = {
            let mut loads = lock(&self.inner.materializing);
            loads
                .entry(section)
                .or_insert_with(|| {
                    let inner = Arc::clone(&self.inner);
                    async move {
                        debug!(%section, "loading dashboard fragment");
                        let loaded = inner.fragments.load(section).await;
                        lock(&inner.materializing).remove(&section);
                        loaded
                    }
                    .boxed()
                    .shared()
                })
                .clone()
        };
        load.await
    }

    fn activate(&self, target: &SectionId) {
        self.set_phase(NavPhase::Activating);
        let host = &self.inner.host;
        for id in host.section_ids() {
            if &id != target {
                host.set_active(&id, false);
            }
        }
        host.set_active(target, true);
        host.set_fragment(&target.fragment());
        host.highlight_nav(target);

        self.inner.state.send_modify(|state| {
            state.current = Some(target.clone());
        });
        debug!(section = %target, "section active");
        self.schedule_load(target);
    }

    fn fall_back(&self, requested: &SectionId) {
        let home = SectionId::home();
        if self.inner.host.contains(&home) {
            warn!(section = %requested, "section unavailable; showing home");
            self.activate(&home);
        } else {
            error!(section = %requested, "section unavailable and no home section mounted");
        }
    }

    fn schedule_load(&self, section: &SectionId) {
        let Some(loader) = self.inner.registry.loader(section) else {
            return;
        };
        let first_visit = self.inner.state.send_if_modified(|state| {
            state.loaded.insert(section.clone())
        });
        if !first_visit {
            return;
        }

        let delay = self.inner.timings.data_load_delay;
        let section = section.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            loader.load_section(&section).await;
        });
        lock(&self.inner.loader_tasks).push(task);
    }

    /// Wait for every scheduled data loader to finish.
    pub async fn settle(&self) {
        loop {
            let tasks = std::mem::take(&mut *lock(&self.inner.loader_tasks));
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                if let Err(err) = task.await {
                    error!(error = %err, "section loader panicked");
                }
            }
        }
    }

    /// Let every section load its data again on its next visit.
    pub fn reset_loaded(&self) {
        self.inner.state.send_if_modified(|state| {
            let had_any = !state.loaded.is_empty();
            state.loaded.clear();
            had_any
        });
    }

    /// Back/forward navigation. An empty fragment means home.
    pub async fn handle_fragment_change(&self, fragment: &str) -> NavOutcome {
        self.navigate(SectionId::from_fragment(fragment)).await
    }

    /// Show the section named in the launch URL.
    ///
    /// A dashboard section is mounted first, bounded by the startup timeout.
    /// When the mount does not finish in time, home is shown instead.
    pub async fn handle_initial_fragment(&self, fragment: &str) -> NavOutcome {
        let target = SectionId::from_fragment(fragment);
        if let Some(section) = target.dashboard() {
            let timeout = self.inner.timings.startup_component_timeout;
            if tokio::time::timeout(timeout, self.materialize(section))
                .await
                .is_err()
            {
                warn!(%section, ?timeout, "startup fragment load timed out");
                // A later visit starts a fresh load.
                lock(&self.inner.materializing).remove(&section);
                return self.give_up(target);
            }
        }
        self.navigate(target).await
    }

    fn give_up(&self, target: SectionId) -> NavOutcome {
        let _in_flight = match self.claim(&target) {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        self.fall_back(&target);
        NavOutcome::FellBack { requested: target }
    }
}
