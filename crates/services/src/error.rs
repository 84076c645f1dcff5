//! Shared error types for the services crate.

use serde_json::Value;
use thiserror::Error;

use portal_core::ValidationError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

pub(crate) const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub(crate) const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";
const FALLBACK_MESSAGE: &str = "Request failed";

/// Failure reported by the portal API, shaped as `{status, message, data}`.
///
/// Status 0 means the request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    status: u16,
    message: String,
    data: Option<Value>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }

    #[must_use]
    pub fn network() -> Self {
        Self::new(0, NETWORK_ERROR_MESSAGE, None)
    }

    #[must_use]
    pub fn session_expired() -> Self {
        Self::new(401, SESSION_EXPIRED_MESSAGE, None)
    }

    /// Builds the error for a non-success response.
    ///
    /// A JSON body supplies `message`; a non-JSON body falls back to the status
    /// text. Either way an empty result becomes a generic message.
    #[must_use]
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let data = serde_json::from_str::<Value>(body)
            .unwrap_or_else(|_| serde_json::json!({ "message": status_text }));
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(FALLBACK_MESSAGE)
            .to_owned();
        Self::new(status, message, Some(data))
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        self.status == 0
    }
}

/// Errors emitted by `AuthManager` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no email is awaiting verification")]
    NoPendingVerification,
    #[error("Please wait {remaining}s before requesting a new code")]
    ResendCooldown { remaining: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ContentService` mutations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Please login to continue")]
    LoginRequired,
    #[error("You are not allowed to do that")]
    Forbidden,
}

/// Errors emitted by the profile-picture editor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImageEditorError {
    #[error("Please select a valid image file (JPEG, PNG)")]
    UnsupportedType,
    #[error("Image size should be less than 5MB")]
    TooLarge,
    #[error("no image loaded")]
    NoImage,
    #[error("not in crop mode")]
    NotCropping,
    #[error("crop area is empty")]
    EmptySelection,
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Errors in environment-driven configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is not a valid http(s) URL: {raw}")]
    InvalidUrl { var: &'static str, raw: String },
    #[error("{var} must be a positive integer, got {raw}")]
    InvalidNumber { var: &'static str, raw: String },
}

/// Errors emitted while bootstrapping portal services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PortalServicesError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
