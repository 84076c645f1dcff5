//! Single-section navigation with lazily mounted dashboard sections.

mod controller;
mod host;

pub use controller::{NavOutcome, NavPhase, NavSnapshot, NavigationController};
pub use host::{
    FragmentLoader, HostSnapshot, MemorySectionHost, SectionHost, SectionLoader, SectionRegistry,
    SectionRegistryBuilder,
};
