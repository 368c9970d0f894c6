//! Admin session state machine and route guard.
//!
//! UNCHECKED -> CHECKING -> {AUTHENTICATED, UNAUTHENTICATED}. The status
//! check runs at most once per process, on the first guarded screen; the
//! persisted is_initialized flag is rehydrated but never trusted on its own.
//! Every transition is persisted through the SessionStore port.

use crate::domain::{AdminUser, DomainError, SessionState};
use crate::ports::{AuthApi, SessionStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Role the principal must carry for the gate to authenticate.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unchecked,
    Checking,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    /// Whether the once-per-process status check has resolved.
    checked: bool,
    checking: bool,
}

/// Session service. Owns the auth state, delegates I/O to the ports.
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    inner: RwLock<Inner>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Rehydrate persisted state. Call once at startup, before the first
    /// guard; the status check still runs regardless of what was loaded.
    pub async fn hydrate(&self) {
        let state = self.store.load().await;
        self.inner.write().await.state = state;
    }

    pub async fn phase(&self) -> AuthPhase {
        let inner = self.inner.read().await;
        if inner.checking {
            AuthPhase::Checking
        } else if !inner.checked {
            AuthPhase::Unchecked
        } else if inner.state.is_logged_in {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.phase().await == AuthPhase::Authenticated
    }

    pub async fn current_user(&self) -> Option<AdminUser> {
        self.inner.read().await.state.user.clone()
    }

    /// Run the status check once per process. Subsequent calls return
    /// immediately; a failed check is not retried and surfaces nothing
    /// beyond the resulting UNAUTHENTICATED phase.
    pub async fn ensure_initialized(&self) {
        {
            let mut inner = self.inner.write().await;
            if inner.checked || inner.checking {
                return;
            }
            inner.checking = true;
        }

        let result = self.api.me().await;

        let mut inner = self.inner.write().await;
        inner.checking = false;
        inner.checked = true;
        match result {
            Ok(user) if user.role == ADMIN_ROLE => {
                info!(email = %user.email, "session check: authenticated");
                inner.state.user = Some(user);
                inner.state.is_logged_in = true;
                inner.state.is_initialized = true;
                self.persist(&inner.state).await;
            }
            Ok(user) => {
                warn!(role = %user.role, "session check: principal lacks admin role");
                inner.state = SessionState {
                    user: None,
                    is_logged_in: false,
                    is_initialized: true,
                };
                self.persist(&inner.state).await;
            }
            Err(DomainError::Unauthorized) => {
                // Stale cookie. Drop the blob so a restart begins unchecked.
                inner.state = SessionState {
                    user: None,
                    is_logged_in: false,
                    is_initialized: true,
                };
                if let Err(e) = self.store.reset().await {
                    warn!(error = %e, "failed to reset session blob");
                }
            }
            Err(e) => {
                warn!(error = %e, "session check failed");
                inner.state = SessionState {
                    user: None,
                    is_logged_in: false,
                    is_initialized: true,
                };
                self.persist(&inner.state).await;
            }
        }
    }

    /// Log in. A principal without the admin role is treated as a failed
    /// login: local state is cleared and an auth error returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, DomainError> {
        let result = self.api.login(email, password).await;
        let mut inner = self.inner.write().await;
        inner.checked = true;
        match result {
            Ok(user) if user.role == ADMIN_ROLE => {
                info!(email = %user.email, "admin logged in");
                inner.state.user = Some(user.clone());
                inner.state.is_logged_in = true;
                inner.state.is_initialized = true;
                self.persist(&inner.state).await;
                Ok(user)
            }
            Ok(user) => {
                warn!(role = %user.role, "login principal lacks admin role");
                inner.state = SessionState {
                    user: None,
                    is_logged_in: false,
                    is_initialized: true,
                };
                self.persist(&inner.state).await;
                Err(DomainError::Auth("administrator role required".into()))
            }
            Err(e) => {
                inner.state = SessionState {
                    user: None,
                    is_logged_in: false,
                    is_initialized: true,
                };
                self.persist(&inner.state).await;
                Err(e)
            }
        }
    }

    /// Log out: ask the backend to invalidate the server session, then
    /// clear local state unconditionally, even if that call failed.
    pub async fn logout(&self) -> Result<(), DomainError> {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "server logout failed; clearing local session anyway");
        }
        let mut inner = self.inner.write().await;
        inner.state.user = None;
        inner.state.is_logged_in = false;
        inner.state.is_initialized = true;
        self.persist(&inner.state).await;
        info!("admin logged out");
        Ok(())
    }

    /// Global 401 handler. Drops the persisted blob (a restart begins in
    /// UNCHECKED) and marks the in-memory session logged out so the gate
    /// redirects immediately.
    pub async fn handle_unauthorized(&self) {
        warn!("401 received; clearing session");
        let mut inner = self.inner.write().await;
        inner.checked = true;
        inner.checking = false;
        inner.state = SessionState {
            user: None,
            is_logged_in: false,
            is_initialized: true,
        };
        if let Err(e) = self.store.reset().await {
            warn!(error = %e, "failed to reset session blob");
        }
    }

    /// Persist after a transition. A storage failure is logged, not
    /// propagated; auth flow must not die on a disk problem.
    async fn persist(&self, state: &SessionState) {
        if let Err(e) = self.store.save(state).await {
            warn!(error = %e, "failed to persist session state");
        }
    }
}

/// Decision for a guarded screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the protected content.
    Proceed,
    /// Go to the login flow; the requested screen was recorded.
    RedirectToLogin,
}

/// Screen-level guard. Blocks (the caller shows a loading indicator) until
/// the session phase is resolved, then either lets the screen render or
/// redirects to login, remembering where the operator wanted to go.
pub struct AuthGate {
    auth: Arc<AuthService>,
    return_to: RwLock<Option<String>>,
}

impl AuthGate {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            return_to: RwLock::new(None),
        }
    }

    pub async fn guard(&self, requested: &str) -> GateDecision {
        self.auth.ensure_initialized().await;
        if self.auth.is_authenticated().await {
            GateDecision::Proceed
        } else {
            *self.return_to.write().await = Some(requested.to_string());
            GateDecision::RedirectToLogin
        }
    }

    /// The screen recorded by the last redirect, consumed on read.
    pub async fn take_return_to(&self) -> Option<String> {
        self.return_to.write().await.take()
    }
}
