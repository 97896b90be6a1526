//! Shared session context object.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use tutorhub_protocol::User;

use crate::storage::KeyValueStorage;

/// Persisted-storage key for the raw bearer token.
const TOKEN_KEY: &str = "token";
/// Persisted-storage key for the JSON-serialized user record.
const USER_KEY: &str = "user";

#[derive(Debug, Default)]
struct SessionData {
    token: Option<String>,
    user: Option<User>,
}

/// The authenticated identity and credential held by the client.
///
/// Explicitly owned and cheaply cloneable; every component that needs auth
/// state (HTTP collaborator, guard, stores) holds its own clone instead of
/// reaching for a hidden global.
///
/// Invariant: a non-null user always coexists with a non-null token. The
/// reverse does not hold; a token may exist while the profile is still being
/// fetched.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    data: Mutex<SessionData>,
    storage: Arc<dyn KeyValueStorage>,
}

impl Session {
    /// Restores the session from persisted storage.
    ///
    /// A persisted user record without a token violates the session
    /// invariant and is discarded.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let token = storage.get(TOKEN_KEY);
        let user = match (&token, storage.get(USER_KEY)) {
            (Some(_), Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(
                        target = "tutorhub.session",
                        error = %err,
                        "discarding unparseable persisted user record"
                    );
                    storage.remove(USER_KEY);
                    None
                }
            },
            (None, Some(_)) => {
                warn!(
                    target = "tutorhub.session",
                    "persisted user without token; discarding"
                );
                storage.remove(USER_KEY);
                None
            }
            _ => None,
        };

        debug!(
            target = "tutorhub.session",
            has_token = token.is_some(),
            has_user = user.is_some(),
            "session restored"
        );

        Self {
            inner: Arc::new(SessionInner {
                data: Mutex::new(SessionData { token, user }),
                storage,
            }),
        }
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.inner.data.lock().token.clone()
    }

    /// Current user record, if fetched.
    pub fn user(&self) -> Option<User> {
        self.inner.data.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.data.lock().token.is_some()
    }

    pub(crate) fn set_token(&self, token: String) {
        self.inner.storage.set(TOKEN_KEY, &token);
        self.inner.data.lock().token = Some(token);
    }

    pub(crate) fn set_user(&self, user: User) {
        let mut data = self.inner.data.lock();
        if data.token.is_none() {
            // The session was invalidated while the fetch was in flight.
            warn!(
                target = "tutorhub.session",
                "ignoring user record for tokenless session"
            );
            return;
        }
        match serde_json::to_string(&user) {
            Ok(raw) => self.inner.storage.set(USER_KEY, &raw),
            Err(err) => warn!(
                target = "tutorhub.session",
                error = %err,
                "failed to serialize user record for persistence"
            ),
        }
        data.user = Some(user);
    }

    pub(crate) fn clear_user(&self) {
        self.inner.data.lock().user = None;
        self.inner.storage.remove(USER_KEY);
    }

    /// Clears the token, the user record, and both persisted entries.
    ///
    /// This is the session-invalidation primitive: the 401 handler and the
    /// profile-fetch fail-safe call it as well as explicit logout.
    pub fn invalidate(&self) {
        let mut data = self.inner.data.lock();
        data.token = None;
        data.user = None;
        self.inner.storage.remove(TOKEN_KEY);
        self.inner.storage.remove(USER_KEY);
        debug!(target = "tutorhub.session", "session invalidated");
    }
}
