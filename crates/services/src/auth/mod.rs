//! Session ownership: sign-in flows, persistence and token refresh.

mod cooldown;
mod manager;

pub use cooldown::ResendCooldown;
pub use manager::AuthManager;

use portal_core::model::{Role, Session};

/// Notifications from the auth manager to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Role),
    SignedOut,
    /// Registration succeeded; OTP entry should open for `email`.
    VerificationRequired { email: String },
    /// The user must sign in (again) to continue.
    LoginRequired,
    NavigateHome,
}

/// Observable auth state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthSnapshot {
    pub session: Session,
    /// Email awaiting OTP confirmation.
    pub pending_email: Option<String>,
}

impl AuthSnapshot {
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.current_user.as_ref().map(|user| user.role)
    }
}
