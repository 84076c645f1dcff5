use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use portal_core::model::{AuthPayload, PersistScope, Role, Session, User};
use portal_core::section::{DashboardLink, DashboardSection, dashboard_links};
use portal_core::validation::{LoginCredentials, OtpCode, RegistrationDraft, require_email};
use storage::repository::StorageError;
use storage::session_store::SessionStore;

use crate::api::ApiService;
use crate::auth::{AuthEvent, AuthSnapshot, ResendCooldown};
use crate::error::AuthError;
use crate::toast::ToastManager;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful! Please verify your email.";
pub const VERIFY_SUCCESS_MESSAGE: &str = "Email verified successfully! Account created.";
pub const RESEND_SUCCESS_MESSAGE: &str = "Verification code resent to your email";
pub const FORGOT_PASSWORD_MESSAGE: &str = "Password reset link sent to your email";
pub const LOGOUT_MESSAGE: &str = "Logged out successfully";
pub const SESSION_EXPIRED_TOAST: &str = "Your session has expired. Please login again.";

type RefreshOutcome = Shared<BoxFuture<'static, bool>>;

struct RefreshFlight {
    generation: u64,
    outcome: RefreshOutcome,
}

struct AuthInner {
    api: Arc<ApiService>,
    toasts: Arc<ToastManager>,
    sessions: SessionStore,
    resend_cooldown_secs: u32,
    state: watch::Sender<AuthSnapshot>,
    scope: Mutex<PersistScope>,
    refresh: Mutex<Option<RefreshFlight>>,
    refresh_generation: AtomicU64,
    cooldown: ResendCooldown,
    events: broadcast::Sender<AuthEvent>,
}

/// Sole owner of the session.
///
/// Everything else reads auth state through snapshots; only this type writes
/// the session keys or changes the API bearer token.
#[derive(Clone)]
pub struct AuthManager {
    inner: Arc<AuthInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AuthManager {
    #[must_use]
    pub fn new(
        api: Arc<ApiService>,
        toasts: Arc<ToastManager>,
        sessions: SessionStore,
        resend_cooldown_secs: u32,
    ) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        let (events, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(AuthInner {
                api,
                toasts,
                sessions,
                resend_cooldown_secs,
                state,
                scope: Mutex::new(PersistScope::SessionOnly),
                refresh: Mutex::new(None),
                refresh_generation: AtomicU64::new(0),
                cooldown: ResendCooldown::new(),
                events,
            }),
        }
    }

    // ─── Observers ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.state.borrow().session.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().session.is_authenticated
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().session.current_user.clone()
    }

    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.inner.state.borrow().role()
    }

    #[must_use]
    pub fn pending_email(&self) -> Option<String> {
        self.inner.state.borrow().pending_email.clone()
    }

    /// Scope the current session is persisted in.
    #[must_use]
    pub fn scope(&self) -> PersistScope {
        *lock(&self.inner.scope)
    }

    #[must_use]
    pub fn cooldown(&self) -> &ResendCooldown {
        &self.inner.cooldown
    }

    #[must_use]
    pub fn dashboard_section(&self) -> Option<DashboardSection> {
        self.current_role().map(DashboardSection::home_for)
    }

    #[must_use]
    pub fn profile_section(&self) -> Option<DashboardSection> {
        self.current_role().map(DashboardSection::profile_for)
    }

    /// Navbar and dropdown entries for the signed-in role.
    #[must_use]
    pub fn dashboard_links(&self) -> &'static [DashboardLink] {
        self.current_role()
            .map(dashboard_links)
            .unwrap_or_default()
    }

    /// Ask the shell to open the login form.
    pub fn request_login(&self) {
        self.emit(AuthEvent::LoginRequired);
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine; the shell may not be mounted yet.
        let _ = self.inner.events.send(event);
    }

    // ─── Session lifecycle ──────────────────────────────────────────────────────

    /// Load the persisted session, if any.
    ///
    /// A stored user that no longer parses is treated as no session and wiped.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if storage cannot be read.
    pub async fn restore(&self) -> Result<bool, AuthError> {
        match self.inner.sessions.load().await {
            Ok(Some(stored)) => {
                let role = stored.user.role;
                self.inner.api.set_auth_token(Some(stored.access_token.clone()));
                *lock(&self.inner.scope) = stored.scope;
                self.inner.state.send_modify(|state| {
                    state.session = Session {
                        access_token: Some(stored.access_token),
                        refresh_token: stored.refresh_token,
                        current_user: Some(stored.user),
                        is_authenticated: true,
                    };
                });
                info!(%role, scope = ?stored.scope, "restored session");
                self.emit(AuthEvent::SignedIn(role));
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(StorageError::Serialization(reason)) => {
                warn!(%reason, "stored session is unreadable; clearing");
                self.inner.sessions.clear().await?;
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Confirm the restored token with the server, refreshing on 401.
    pub async fn check_status(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        match self.inner.api.verify_token().await {
            Ok(_) => true,
            Err(err) if err.is_unauthorized() => self.refresh_access_token().await,
            Err(err) => {
                // Offline or server trouble: keep the session and retry later.
                debug!(status = err.status(), message = err.message(), "token check inconclusive");
                true
            }
        }
    }

    async fn sign_in(&self, scope: PersistScope, payload: AuthPayload) -> Result<User, AuthError> {
        self.persist(scope, payload).await?;
        let user = self
            .current_user()
            .ok_or(AuthError::Storage(StorageError::NotFound))?;
        info!(role = %user.role, ?scope, "signed in");
        self.emit(AuthEvent::SignedIn(user.role));
        Ok(user)
    }

    async fn persist(&self, scope: PersistScope, payload: AuthPayload) -> Result<(), StorageError> {
        let refresh = Some(payload.refresh_token.as_str()).filter(|token| !token.is_empty());
        self.inner
            .sessions
            .save(scope, &payload.access_token, refresh, &payload.user)
            .await?;
        self.inner
            .api
            .set_auth_token(Some(payload.access_token.clone()));
        *lock(&self.inner.scope) = scope;
        self.inner.state.send_modify(|state| {
            state.session = Session::from_payload(payload);
        });
        Ok(())
    }

    async fn clear_session(&self) {
        if let Err(err) = self.inner.sessions.clear().await {
            error!(error = %err, "failed to clear stored session");
        }
        self.inner.api.set_auth_token(None);
        let was_signed_in = self.inner.state.send_if_modified(|state| {
            let was = state.session.is_authenticated;
            state.session = Session::anonymous();
            was
        });
        if was_signed_in {
            self.emit(AuthEvent::SignedOut);
        }
    }

    // ─── Flows ──────────────────────────────────────────────────────────────────

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on invalid input, API rejection, or storage failure.
    /// The previous session is left untouched in every case.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<User, AuthError> {
        let credentials = LoginCredentials::parse(email, password, remember)
            .inspect_err(|err| {
                self.inner.toasts.error(err.to_string());
            })?;

        let payload = match self.inner.api.login(&credentials).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(status = err.status(), "login rejected");
                self.inner.toasts.error(err.message());
                return Err(err.into());
            }
        };

        let user = self
            .sign_in(PersistScope::from_remember_me(credentials.remember), payload)
            .await
            .inspect_err(|err| {
                self.inner.toasts.error(err.to_string());
            })?;
        self.inner.toasts.success(LOGIN_SUCCESS_MESSAGE);
        Ok(user)
    }

    /// Submit a registration and wait for the emailed code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` before any request is made, or
    /// `AuthError::Api` if the server refuses the registration.
    pub async fn register(&self, draft: RegistrationDraft) -> Result<(), AuthError> {
        let registration = draft.validate().inspect_err(|err| {
            self.inner.toasts.error(err.to_string());
        })?;

        if let Err(err) = self.inner.api.register(&registration).await {
            warn!(status = err.status(), "registration rejected");
            self.inner.toasts.error(err.message());
            return Err(err.into());
        }

        let email = registration.email;
        self.inner.state.send_modify(|state| {
            state.pending_email = Some(email.clone());
        });
        self.inner.cooldown.start(self.inner.resend_cooldown_secs);
        self.inner.toasts.success(REGISTER_SUCCESS_MESSAGE);
        info!("registration submitted; awaiting verification");
        self.emit(AuthEvent::VerificationRequired { email });
        Ok(())
    }

    /// Confirm the pending email with a 6-digit code.
    ///
    /// Returns `true` when the server also signed the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on a malformed code (no request is made), when no
    /// registration is pending, or when the server rejects the code. The
    /// pending email survives a rejection.
    pub async fn verify_otp(&self, code: &str) -> Result<bool, AuthError> {
        let email = self.pending_email().ok_or(AuthError::NoPendingVerification)?;
        let otp = OtpCode::parse(code).inspect_err(|err| {
            self.inner.toasts.error(err.to_string());
        })?;

        let response = match self.inner.api.verify_email(&email, &otp).await {
            Ok(response) => response,
            Err(err) => {
                warn!(status = err.status(), "verification rejected");
                self.inner.toasts.error(err.message());
                return Err(err.into());
            }
        };

        self.inner.state.send_modify(|state| state.pending_email = None);
        self.inner.cooldown.stop();
        self.inner.toasts.success(VERIFY_SUCCESS_MESSAGE);

        match response.into_payload() {
            Some(payload) => {
                self.sign_in(PersistScope::SessionOnly, payload).await?;
                Ok(true)
            }
            None => {
                self.emit(AuthEvent::LoginRequired);
                Ok(false)
            }
        }
    }

    /// Ask the server to email a fresh code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ResendCooldown` without any request while the
    /// cooldown is running.
    pub async fn resend_otp(&self) -> Result<(), AuthError> {
        let email = self.pending_email().ok_or(AuthError::NoPendingVerification)?;
        let remaining = self.inner.cooldown.remaining();
        if remaining > 0 {
            return Err(AuthError::ResendCooldown { remaining });
        }

        if let Err(err) = self.inner.api.resend_otp(&email).await {
            self.inner.toasts.error(err.message());
            return Err(err.into());
        }
        self.inner.toasts.success(RESEND_SUCCESS_MESSAGE);
        self.inner.cooldown.start(self.inner.resend_cooldown_secs);
        Ok(())
    }

    /// Abandon the pending verification.
    pub fn cancel_verification(&self) {
        self.inner.state.send_modify(|state| state.pending_email = None);
        self.inner.cooldown.stop();
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a malformed address, or
    /// `AuthError::Api` if the request fails.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = require_email(email).inspect_err(|err| {
            self.inner.toasts.error(err.to_string());
        })?;
        if let Err(err) = self.inner.api.forgot_password(&email).await {
            self.inner.toasts.error(err.message());
            return Err(err.into());
        }
        self.inner.toasts.success(FORGOT_PASSWORD_MESSAGE);
        Ok(())
    }

    /// Exchange the refresh token for a new session.
    ///
    /// Concurrent callers share a single request and all see its outcome.
    /// Failure, including a missing refresh token, clears the session.
    pub async fn refresh_access_token(&self) -> bool {
        let outcome = {
            let mut slot = lock(&self.inner.refresh);
            match slot.as_ref() {
                Some(flight) => flight.outcome.clone(),
                None => {
                    let generation = self.inner.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
                    let manager = self.clone();
                    let outcome = async move {
                        let refreshed = manager.run_refresh().await;
                        manager.finish_refresh(generation);
                        refreshed
                    }
                    .boxed()
                    .shared();
                    *slot = Some(RefreshFlight {
                        generation,
                        outcome: outcome.clone(),
                    });
                    outcome
                }
            }
        };
        outcome.await
    }

    fn finish_refresh(&self, generation: u64) {
        let mut slot = lock(&self.inner.refresh);
        if slot.as_ref().is_some_and(|flight| flight.generation == generation) {
            *slot = None;
        }
    }

    async fn run_refresh(&self) -> bool {
        let Some(refresh_token) = self.session().refresh_token else {
            warn!("no refresh token; clearing session");
            self.clear_session().await;
            return false;
        };

        match self.inner.api.refresh_token(&refresh_token).await {
            Ok(payload) => match self.persist(self.scope(), payload).await {
                Ok(()) => {
                    info!("access token refreshed");
                    true
                }
                Err(err) => {
                    error!(error = %err, "could not store refreshed session");
                    self.clear_session().await;
                    false
                }
            },
            Err(err) => {
                warn!(status = err.status(), message = err.message(), "token refresh failed");
                self.clear_session().await;
                false
            }
        }
    }

    /// Sign out locally, telling the server on a best-effort basis.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.session().refresh_token {
            if let Err(err) = self.inner.api.logout(&refresh_token).await {
                debug!(status = err.status(), "logout request failed; clearing locally");
            }
        }
        self.clear_session().await;
        info!("signed out");
        self.inner.toasts.info(LOGOUT_MESSAGE);
        self.emit(AuthEvent::NavigateHome);
    }

    /// React to a rejected session: one refresh attempt, else ask for login.
    pub async fn handle_unauthorized(&self) -> bool {
        if !self.is_authenticated() {
            debug!("unauthorized response without a session");
            return false;
        }
        if self.refresh_access_token().await {
            return true;
        }
        warn!("session expired");
        self.inner.toasts.warning(SESSION_EXPIRED_TOAST);
        self.emit(AuthEvent::LoginRequired);
        false
    }

    /// Subscribe to the API's expired-session signal.
    ///
    /// Signals that pile up while one is being handled are folded into it.
    pub fn spawn_unauthorized_watcher(&self) -> JoinHandle<()> {
        let mut signals = self.inner.api.subscribe_unauthorized();
        let weak: Weak<AuthInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            loop {
                match signals.recv().await {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                while !matches!(
                    signals.try_recv(),
                    Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed)
                ) {}

                let Some(inner) = weak.upgrade() else {
                    break;
                };
                AuthManager { inner }.handle_unauthorized().await;
            }
        })
    }
}
