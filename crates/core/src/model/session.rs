use serde::{Deserialize, Serialize};

use crate::model::user::User;

/// Token pair plus account returned by login, refresh, and email verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Response of the email verification endpoint.
///
/// Some deployments sign the user in immediately; others only confirm the
/// address and expect a separate login.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

impl VerificationResponse {
    /// Session payload when the response carries a complete sign-in.
    #[must_use]
    pub fn into_payload(self) -> Option<AuthPayload> {
        match (self.access_token, self.user) {
            (Some(access_token), Some(user)) if !access_token.is_empty() => Some(AuthPayload {
                access_token,
                refresh_token: self.refresh_token.unwrap_or_default(),
                user,
            }),
            _ => None,
        }
    }
}

/// Where a session is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistScope {
    /// Survives restarts ("remember me").
    Persistent,
    /// Lives only as long as the running client.
    SessionOnly,
}

impl PersistScope {
    #[must_use]
    pub fn from_remember_me(remember: bool) -> Self {
        if remember {
            Self::Persistent
        } else {
            Self::SessionOnly
        }
    }
}

/// Authentication state owned by the auth manager.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub current_user: Option<User>,
    pub is_authenticated: bool,
}

impl Session {
    #[must_use]
    pub fn from_payload(payload: AuthPayload) -> Self {
        Self {
            access_token: Some(payload.access_token),
            refresh_token: Some(payload.refresh_token).filter(|token| !token.is_empty()),
            current_user: Some(payload.user),
            is_authenticated: true,
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}
