//! Authentication service
//!
//! Owns the two-state session machine (`Unauthenticated` | `Authenticated`)
//! and the token read-modify-write in login/logout. State lives inside this
//! instance; there is no ambient global session.

use std::sync::Arc;

use fieldtrace_domain::constants::{demo, storage_keys, FALLBACK_TOKEN};
use fieldtrace_domain::{
    Endpoint, FieldtraceError, LoginCredentials, LoginEnvelope, Result, SessionState,
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::storage::KeyValueStore;

/// Callback fired exactly once per logout (navigation stand-in).
type LogoutHook = Box<dyn Fn() + Send + Sync>;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    /// True when the server was unreachable and the built-in demo account
    /// authenticated locally.
    pub offline_demo: bool,
}

/// Login/logout operations over the request pipeline and credential store.
pub struct AuthService {
    api: Arc<ApiClient>,
    store: Arc<dyn KeyValueStore>,
    // The mutex serializes the token read-modify-write so concurrent
    // login/logout calls cannot interleave into a lost update.
    state: Mutex<SessionState>,
    logout_hook: Option<LogoutHook>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store, state: Mutex::new(SessionState::Unauthenticated), logout_hook: None }
    }

    /// Register the hook invoked exactly once per [`logout`](Self::logout)
    /// call.
    pub fn with_logout_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.logout_hook = Some(Box::new(hook));
        self
    }

    /// Restore session state from the persisted token at startup.
    ///
    /// A storage read failure is treated as "no session" rather than an
    /// error.
    pub async fn restore(&self) -> SessionState {
        let mut state = self.state.lock().await;
        *state = match self.store.get(storage_keys::AUTH_TOKEN).await {
            Ok(Some(_)) => SessionState::Authenticated,
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "session restore failed, starting unauthenticated");
                SessionState::Unauthenticated
            }
        };
        *state
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state().await.is_authenticated()
    }

    /// Authenticate against the remote API.
    ///
    /// On `{success: true}` the token (or [`FALLBACK_TOKEN`] when the
    /// envelope omits one) is persisted and the session flips to
    /// `Authenticated`. On any failure no partial state is committed.
    ///
    /// When the transport fails outright and the credentials match the
    /// built-in demo account, login succeeds locally with the demo token.
    ///
    /// # Errors
    ///
    /// `Auth` for rejected credentials, `Storage` when the token cannot be
    /// persisted, and the pipeline taxonomy for everything else.
    #[instrument(skip(self, credentials), fields(user_name = %credentials.user_name))]
    pub async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome> {
        if credentials.user_name.trim().is_empty() || credentials.password.trim().is_empty() {
            return Err(FieldtraceError::Auth("User name and password are required".to_string()));
        }

        let mut state = self.state.lock().await;

        match self.api.post::<_, LoginEnvelope>(Endpoint::Login, &credentials).await {
            Ok(envelope) if envelope.success => {
                let token = envelope
                    .token
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| FALLBACK_TOKEN.to_string());
                self.store.set(storage_keys::AUTH_TOKEN, &token).await?;
                *state = SessionState::Authenticated;
                info!("login successful");
                Ok(LoginOutcome { token, offline_demo: false })
            }
            Ok(envelope) => Err(FieldtraceError::Auth(
                envelope
                    .message
                    .unwrap_or_else(|| "User name or password is incorrect".to_string()),
            )),
            Err(err) if err.is_transport_failure() && is_demo(&credentials) => {
                warn!(error = %err, "server unreachable, demo account authenticated locally");
                self.store.set(storage_keys::AUTH_TOKEN, demo::TOKEN).await?;
                *state = SessionState::Authenticated;
                Ok(LoginOutcome { token: demo::TOKEN.to_string(), offline_demo: true })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// End the session.
    ///
    /// Token removal is best-effort cleanup; the session always ends and the
    /// logout hook always fires, so this never fails from the caller's
    /// perspective.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        {
            let mut state = self.state.lock().await;
            if let Err(err) = self.store.remove(storage_keys::AUTH_TOKEN).await {
                warn!(error = %err, "token removal failed, clearing session anyway");
            }
            *state = SessionState::Unauthenticated;
        }

        if let Some(hook) = &self.logout_hook {
            hook();
        }
        info!("logged out");
    }
}

fn is_demo(credentials: &LoginCredentials) -> bool {
    credentials.user_name == demo::USER_NAME && credentials.password == demo::PASSWORD
}
