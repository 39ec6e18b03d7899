use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::auth::{AuthResponse, AuthServiceTrait, Credentials, NewUser, ProfileUpdate, User};
use crate::constants::TOKEN_KEY;
use crate::errors::{Error, Result};
use crate::events::{UiEvent, UiEventSink};
use crate::groups::{Group, MemberStatus};
use crate::routes::Route;
use crate::secrets::SecretStore;

/// Observable session fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Holds the current identity and keeps the persisted token in sync with it.
///
/// Every failure on the way in (token verification, login, registration)
/// leaves the store logged out with the message in `error`.
pub struct SessionStore {
    auth: Arc<dyn AuthServiceTrait>,
    secrets: Arc<dyn SecretStore>,
    events: Arc<dyn UiEventSink>,
    state: RwLock<SessionState>,
    identity: watch::Sender<Option<User>>,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthServiceTrait>,
        secrets: Arc<dyn SecretStore>,
        events: Arc<dyn UiEventSink>,
    ) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            auth,
            secrets,
            events,
            state: RwLock::new(SessionState {
                is_loading: true,
                ..SessionState::default()
            }),
            identity,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().ok().and_then(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.error.clone())
    }

    /// Receiver that yields the identity every time it changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.identity.subscribe()
    }

    /// Route actually shown for `route` given the current session.
    pub fn guard(&self, route: Route) -> Route {
        route.guard(self.is_authenticated())
    }

    /// Whether the admin controls of `group` are shown. Display only; the
    /// server enforces permissions.
    pub fn is_admin(&self, group: &Group) -> bool {
        match self.current_user() {
            Some(user) => {
                group.creator_id == Some(user.id)
                    || group.member_status == Some(MemberStatus::Admin)
            }
            None => false,
        }
    }

    fn update<F: FnOnce(&mut SessionState)>(&self, op: F) {
        match self.state.write() {
            Ok(mut state) => op(&mut state),
            Err(_) => warn!("Session state lock poisoned, update dropped"),
        }
    }

    fn publish_identity(&self) {
        let user = self.current_user();
        self.identity.send_replace(user);
    }

    /// Restores a session from the persisted token, if any.
    ///
    /// A token the server no longer accepts is deleted.
    pub async fn initialize(&self) -> Result<Option<User>> {
        self.update(|s| s.is_loading = true);

        let token = match self.secrets.get_secret(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read persisted token: {}", e);
                None
            }
        };

        let Some(token) = token else {
            debug!("No persisted token, starting logged out");
            self.update(|s| s.is_loading = false);
            self.publish_identity();
            return Ok(None);
        };

        match self.auth.get_profile(&token).await {
            Ok(user) => {
                info!("Restored session for {}", user.username);
                self.update(|s| {
                    s.user = Some(user.clone());
                    s.token = Some(token);
                    s.error = None;
                    s.is_loading = false;
                });
                self.publish_identity();
                Ok(Some(user))
            }
            Err(e) => {
                warn!("Persisted token rejected: {}", e);
                if let Err(e) = self.secrets.delete_secret(TOKEN_KEY) {
                    warn!("Could not delete persisted token: {}", e);
                }
                self.update(|s| {
                    s.user = None;
                    s.token = None;
                    s.is_loading = false;
                });
                self.publish_identity();
                Ok(None)
            }
        }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<User> {
        self.update(|s| s.error = None);
        let result = self.auth.login(credentials).await;
        self.establish(result)
    }

    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        self.update(|s| s.error = None);
        let result = self.auth.register(new_user).await;
        self.establish(result)
    }

    fn establish(&self, result: Result<AuthResponse>) -> Result<User> {
        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e)),
        };

        if let Err(e) = self
            .secrets
            .set_secret(TOKEN_KEY, &response.access_token)
        {
            return Err(self.fail(e));
        }

        let user = response.user;
        info!("Signed in as {}", user.username);
        self.update(|s| {
            s.user = Some(user.clone());
            s.token = Some(response.access_token);
            s.error = None;
            s.is_loading = false;
        });
        self.publish_identity();
        self.events.emit(UiEvent::navigate(Route::Dashboard));
        Ok(user)
    }

    fn fail(&self, err: Error) -> Error {
        warn!("Authentication failed: {}", err);
        let message = err.to_string();
        self.update(|s| {
            s.user = None;
            s.token = None;
            s.error = Some(message);
            s.is_loading = false;
        });
        self.publish_identity();
        err
    }

    pub fn logout(&self) {
        if let Err(e) = self.secrets.delete_secret(TOKEN_KEY) {
            warn!("Could not delete persisted token: {}", e);
        }
        self.update(|s| {
            s.user = None;
            s.token = None;
            s.error = None;
        });
        self.publish_identity();
        info!("Signed out");
        self.events.emit(UiEvent::navigate(Route::Login));
    }

    /// Sends a partial profile change and adopts the returned identity.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let token = self
            .token()
            .ok_or_else(|| Error::Unauthenticated("sign in to update your profile".into()))?;

        match self.auth.update_profile(&token, update).await {
            Ok(user) => {
                self.update(|s| {
                    s.user = Some(user.clone());
                    s.error = None;
                });
                self.publish_identity();
                self.events.emit(UiEvent::success("Profile updated"));
                Ok(user)
            }
            Err(e) => {
                warn!("Profile update failed: {}", e);
                let message = e.to_string();
                self.update(|s| s.error = Some(message));
                Err(e)
            }
        }
    }
}
