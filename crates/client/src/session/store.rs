//! Authentication operations over the session context.

use tracing::{debug, warn};
use tutorhub_protocol::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ProfileUpdate,
    RegisterRequest, ResetPasswordRequest, User,
};

use crate::error::Result;
use crate::http::ApiClient;
use crate::session::Session;

/// Outcome of a store operation.
///
/// Store operations never propagate raw errors past their boundary; they
/// convert failures into a value carrying a human-readable message sourced
/// from the server when available.
#[derive(Debug, Clone)]
pub struct OpOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl OpOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Outcome of a login attempt, including where the user should land.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub success: bool,
    /// Role-derived landing path; present only on success.
    pub redirect_path: Option<String>,
    pub message: Option<String>,
}

/// Authentication and profile operations bound to one session context.
#[derive(Clone)]
pub struct SessionStore {
    session: Session,
    api: ApiClient,
}

impl SessionStore {
    pub fn new(session: Session, api: ApiClient) -> Self {
        Self { session, api }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Submits credentials; on success stores the token, fetches the
    /// profile, and suggests a role-appropriate landing path.
    ///
    /// On failure any partial session state is cleared and a generic
    /// message is returned; server internals never leak here.
    pub async fn login(&self, credentials: &LoginRequest) -> LoginOutcome {
        let response: LoginResponse = match self.api.post_json("/auth/login", credentials).await {
            Ok(response) => response,
            Err(err) => {
                warn!(target = "tutorhub.session", error = %err, "login failed");
                self.logout();
                return LoginOutcome {
                    success: false,
                    redirect_path: None,
                    message: Some("Login failed. Please check your credentials.".to_string()),
                };
            }
        };

        self.session.set_token(response.token);

        // A profile-fetch failure invalidates the session internally; the
        // landing path then falls back to the default area.
        let _ = self.fetch_user().await;

        let redirect_path = self
            .session
            .user()
            .map(|user| user.role.landing_path())
            .unwrap_or("/dashboard");

        debug!(
            target = "tutorhub.session",
            redirect = redirect_path,
            "login succeeded"
        );

        LoginOutcome {
            success: true,
            redirect_path: Some(redirect_path.to_string()),
            message: None,
        }
    }

    /// Fetches the user profile for the current token.
    ///
    /// No-op (clearing any stale user record) when no token is held. Any
    /// fetch failure is treated as an invalid session, not a transient
    /// error: the full session is logged out before the error is returned
    /// so the guard can observe it.
    ///
    /// Idempotent; overlapping in-flight calls resolve last-write-wins.
    pub async fn fetch_user(&self) -> Result<()> {
        if self.session.token().is_none() {
            self.session.clear_user();
            return Ok(());
        }

        match self.api.get_json::<User>("/profile/me").await {
            Ok(user) => {
                debug!(
                    target = "tutorhub.session",
                    user_id = %user.id,
                    role = %user.role,
                    "fetched user profile"
                );
                self.session.set_user(user);
                Ok(())
            }
            Err(err) => {
                warn!(
                    target = "tutorhub.session",
                    error = %err,
                    "profile fetch failed; invalidating session"
                );
                self.logout();
                Err(err)
            }
        }
    }

    /// Registers a new account, then immediately logs in with the same
    /// credentials.
    pub async fn register(&self, request: &RegisterRequest) -> OpOutcome {
        if let Err(err) = self.api.post_ignore_body("/auth/register", request).await {
            warn!(target = "tutorhub.session", error = %err, "registration failed");
            return OpOutcome::fail(err.user_message());
        }

        let login = self
            .login(&LoginRequest {
                email: request.email.clone(),
                password: request.password.clone(),
            })
            .await;

        OpOutcome {
            success: login.success,
            message: login.message,
        }
    }

    pub async fn forgot_password(&self, email: &str) -> OpOutcome {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        match self
            .api
            .post_ignore_body("/auth/forgot-password", &request)
            .await
        {
            Ok(()) => OpOutcome::ok(),
            Err(err) => OpOutcome::fail(err.user_message()),
        }
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> OpOutcome {
        let request = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        match self
            .api
            .post_json::<_, MessageResponse>("/auth/reset-password", &request)
            .await
        {
            Ok(response) => OpOutcome {
                success: true,
                message: response.message,
            },
            Err(err) => OpOutcome::fail(err.user_message()),
        }
    }

    /// Submits a partial profile update; on success the stored user record
    /// is replaced wholesale with the server's returned record.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> OpOutcome {
        match self.api.put_json::<_, User>("/profile/me", update).await {
            Ok(user) => {
                self.session.set_user(user);
                OpOutcome::ok_with("Profile updated successfully!")
            }
            Err(err) => {
                let message = match &err {
                    crate::error::Error::Api { message, .. } => message.clone(),
                    _ => "Failed to update profile.".to_string(),
                };
                OpOutcome::fail(message)
            }
        }
    }

    /// Clears the in-memory and persisted token and user record.
    ///
    /// Also used as the session-invalidation primitive by `fetch_user` and
    /// the 401 handler; callers must not assume logout only follows explicit
    /// user action.
    pub fn logout(&self) {
        self.session.invalidate();
    }
}
