//! The Auth Session Store.
//!
//! One [`AuthSessionStore`] is created per application and cloned into
//! every component that needs it; clones share the same state. Changes are
//! published through a [`watch`] channel so observers re-render on login,
//! logout and hydration.

use std::sync::Arc;

use lms_models::{
    LoginRequest, ParentIdentity, ParentLoginRequest, Role, StaffIdentity, UserType,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::api::AuthApi;
use crate::error::ClientError;
use crate::storage::DurableStorage;

/// Storage key holding the serialized [`PersistedSession`].
pub const SESSION_KEY: &str = "session";

/// Per-field keys written by older clients.
pub const LEGACY_KEYS: [&str; 5] = ["token", "userType", "userRoles", "user", "student"];

/// Feature caches that must not outlive the session.
pub const CACHE_KEYS: [&str; 2] = ["teacherClasses", "dashboardCounts"];

/// In-memory session state.
///
/// When `user_type` is set exactly one of `user`/`student` is set, and
/// `user_roles` is set iff the session is a staff session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub token: Option<String>,
    pub user_type: Option<UserType>,
    pub user: Option<StaffIdentity>,
    pub student: Option<ParentIdentity>,
    pub user_roles: Option<Vec<Role>>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set once the startup hydration attempt has finished.
    pub initialized: bool,
}

impl AuthSession {
    fn staff(token: String, user: StaffIdentity) -> Self {
        Self {
            token: Some(token),
            user_type: Some(UserType::Staff),
            user_roles: Some(vec![user.role]),
            user: Some(user),
            student: None,
            is_loading: false,
            error: None,
            initialized: true,
        }
    }

    fn parent(token: String, student: ParentIdentity) -> Self {
        Self {
            token: Some(token),
            user_type: Some(UserType::Parent),
            user: None,
            student: Some(student),
            user_roles: None,
            is_loading: false,
            error: None,
            initialized: true,
        }
    }

    fn signed_out() -> Self {
        Self {
            initialized: true,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user_type.is_some()
    }

    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        self.user_roles
            .as_ref()
            .is_some_and(|roles| roles.iter().any(|r| allowed.contains(r)))
    }
}

/// The single durable snapshot written on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub token: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<StaffIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<ParentIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_roles: Option<Vec<Role>>,
}

impl PersistedSession {
    fn capture(session: &AuthSession) -> Option<Self> {
        Some(Self {
            token: session.token.clone()?,
            user_type: session.user_type?,
            user: session.user.clone(),
            student: session.student.clone(),
            user_roles: session.user_roles.clone(),
        })
    }

    /// Rebuilds the in-memory session, or `None` if the snapshot breaks the
    /// session invariants.
    fn restore(self) -> Option<AuthSession> {
        match (self.user_type, self.user, self.student, self.user_roles) {
            (UserType::Staff, Some(user), None, Some(roles)) => Some(AuthSession {
                user_roles: Some(roles),
                ..AuthSession::staff(self.token, user)
            }),
            (UserType::Parent, None, Some(student), None) => {
                Some(AuthSession::parent(self.token, student))
            }
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct AuthSessionStore {
    state: Arc<watch::Sender<AuthSession>>,
    storage: Arc<dyn DurableStorage>,
    api: Arc<dyn AuthApi>,
}

impl AuthSessionStore {
    /// Creates an uninitialized store. Call [`hydrate`](Self::hydrate)
    /// before the first render, or use [`open`](Self::open).
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn DurableStorage>) -> Self {
        let (state, _) = watch::channel(AuthSession::default());
        Self {
            state: Arc::new(state),
            storage,
            api,
        }
    }

    pub fn open(api: Arc<dyn AuthApi>, storage: Arc<dyn DurableStorage>) -> Self {
        let store = Self::new(api, storage);
        store.hydrate();
        store
    }

    /// Restores the session from durable storage without contacting the
    /// server and marks the store initialized. The token is trusted until a
    /// protected request says otherwise.
    pub fn hydrate(&self) {
        let restored = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => {
                let session = serde_json::from_str::<PersistedSession>(&raw)
                    .ok()
                    .and_then(PersistedSession::restore);
                if session.is_none() {
                    tracing::warn!("Discarding unreadable persisted session");
                    if let Err(err) = self.storage.remove(SESSION_KEY) {
                        tracing::warn!(error = %err, "Failed to remove persisted session");
                    }
                }
                session
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read persisted session");
                None
            }
        };

        self.state
            .send_replace(restored.unwrap_or_else(AuthSession::signed_out));
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSession> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthSession {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub async fn login_as_staff(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<StaffIdentity, ClientError> {
        let request = LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        };

        self.begin_request();
        let result = match self.api.login_as_staff(&request).await {
            Ok(data) => {
                let user = data.user.clone();
                self.commit(AuthSession::staff(data.token, data.user))
                    .map(|()| user)
            }
            Err(err) => Err(err),
        };
        self.finish_request(result)
    }

    pub async fn login_as_parent(
        &self,
        phone: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<ParentIdentity, ClientError> {
        let request = ParentLoginRequest {
            phone: Some(phone.into()),
            password: Some(password.into()),
        };

        self.begin_request();
        let result = match self.api.login_as_parent(&request).await {
            Ok(data) => {
                let student = data.student.student;
                self.commit(AuthSession::parent(data.token, student.clone()))
                    .map(|()| student)
            }
            Err(err) => Err(err),
        };
        self.finish_request(result)
    }

    /// Clears durable storage and resets the in-memory session. Never fails;
    /// storage errors are logged.
    pub fn logout(&self) {
        let keys: Vec<&str> = std::iter::once(SESSION_KEY)
            .chain(LEGACY_KEYS)
            .chain(CACHE_KEYS)
            .collect();

        if let Err(err) = self.storage.remove_all(&keys) {
            tracing::warn!(error = %err, "Failed to clear persisted session");
        }

        self.state.send_replace(AuthSession::signed_out());
    }

    /// `GET` a protected route with the current session's bearer token.
    pub async fn authorized_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        let data = self.api.get_authorized(path, &token).await?;
        Ok(serde_json::from_value(data)?)
    }

    fn begin_request(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    /// Writes the snapshot, then publishes it. Nothing is published if the
    /// write fails.
    fn commit(&self, session: AuthSession) -> Result<(), ClientError> {
        if let Some(snapshot) = PersistedSession::capture(&session) {
            let raw = serde_json::to_string(&snapshot)?;
            self.storage.set(SESSION_KEY, &raw)?;
        }
        self.state.send_replace(session);
        Ok(())
    }

    fn finish_request<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            let message = err.to_string();
            self.state.send_modify(|s| {
                s.is_loading = false;
                s.error = Some(message);
            });
        }
        result
    }
}
