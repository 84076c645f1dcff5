pub mod app;
pub mod context;
pub mod fragments;
pub mod platform;
pub mod views;
pub mod vm;

pub use app::App;
pub use context::{AppContext, UiApp, build_app_context};
pub use fragments::ComponentFragmentLoader;
pub use platform::{DesktopLinkOpener, LinkOpenerRef, RecordingLinkOpener, UiLinkOpener};
