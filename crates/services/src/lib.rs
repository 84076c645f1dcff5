#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod image_editor;
pub mod navigation;
pub mod portal;
pub mod theme;
pub mod toast;
pub mod transport;

pub use portal_core::Clock;

pub use api::{ApiService, Unauthorized};
pub use auth::{AuthEvent, AuthManager, AuthSnapshot, ResendCooldown};
pub use config::{PortalConfig, Timings};
pub use content::{ContentService, ContentState};
pub use error::{
    ApiError, AuthError, ConfigError, ContentError, ImageEditorError, PortalServicesError,
};
pub use image_editor::{CropRect, ImageEditor};
pub use navigation::{
    FragmentLoader, HostSnapshot, MemorySectionHost, NavOutcome, NavPhase, NavSnapshot,
    NavigationController, SectionHost, SectionLoader, SectionRegistry,
};
pub use portal::PortalServices;
pub use theme::{Theme, ThemeManager};
pub use toast::{Toast, ToastKind, ToastManager};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
