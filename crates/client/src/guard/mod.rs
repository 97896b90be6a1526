//! Session-aware navigation authorization guard.
//!
//! Executed before every route transition: enforces authentication and role
//! requirements against the session context and decides whether to proceed
//! or where to redirect. Role mismatches never fail silently and never
//! redirect back to the requested path; they land the user in their own
//! role-appropriate area, which prevents redirect loops.

use tracing::debug;
use tutorhub_protocol::Role;

use crate::routes::RouteTable;
use crate::session::SessionStore;

/// Where a denied navigation is sent instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    /// The authenticated default area.
    Home,
    /// The teacher role area.
    Teacher,
    /// The admin role area.
    Admin,
}

impl RedirectTarget {
    pub fn path(self) -> &'static str {
        match self {
            RedirectTarget::Login => "/login",
            RedirectTarget::Home => "/dashboard",
            RedirectTarget::Teacher => "/teacher",
            RedirectTarget::Admin => "/admin",
        }
    }

    /// The landing target for a user's own role.
    ///
    /// Unrecognized roles map to login; no known role ever lands there.
    fn for_role(role: Role) -> Self {
        match role {
            Role::Student => RedirectTarget::Home,
            Role::Teacher => RedirectTarget::Teacher,
            Role::Admin => RedirectTarget::Admin,
            Role::Unknown => RedirectTarget::Login,
        }
    }
}

/// Decision for one attempted route transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(RedirectTarget),
}

/// The authorization check executed before every route transition.
pub struct NavigationGuard {
    routes: RouteTable,
    store: SessionStore,
}

impl NavigationGuard {
    pub fn new(routes: RouteTable, store: SessionStore) -> Self {
        Self { routes, store }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decides whether the transition from `current` to `target` may
    /// proceed.
    ///
    /// Suspends while the user profile is fetched when the target requires
    /// authentication and the profile has not been loaded yet. The fetch
    /// may invalidate the session as a side effect; see
    /// [`SessionStore::fetch_user`].
    pub async fn authorize(&self, target: &str, current: Option<&str>) -> GuardDecision {
        let session = self.store.session();
        let is_authenticated = session.is_authenticated();

        debug!(
            target = "tutorhub.guard",
            to = target,
            from = current.unwrap_or("-"),
            authenticated = is_authenticated,
            "evaluating navigation"
        );

        let Some(matched) = self.routes.match_path(target) else {
            // No route table entry at all; the not-found view is public.
            return GuardDecision::Proceed;
        };

        if matched.requires_auth() && !is_authenticated {
            debug!(target = "tutorhub.guard", to = target, "unauthenticated; redirecting to login");
            return GuardDecision::Redirect(RedirectTarget::Login);
        }

        if matched.requires_auth() && session.user().is_none() {
            debug!(target = "tutorhub.guard", "user profile not loaded; fetching");
            if self.store.fetch_user().await.is_err() || session.user().is_none() {
                return GuardDecision::Redirect(RedirectTarget::Login);
            }
        }

        let required_roles = matched.required_roles();
        if !required_roles.is_empty() {
            if !is_authenticated {
                return GuardDecision::Redirect(RedirectTarget::Login);
            }
            let Some(user) = session.user() else {
                return GuardDecision::Redirect(RedirectTarget::Login);
            };
            for required in required_roles {
                if user.role != required {
                    debug!(
                        target = "tutorhub.guard",
                        role = %user.role,
                        required = %required,
                        "role mismatch; redirecting to user's own area"
                    );
                    return GuardDecision::Redirect(RedirectTarget::for_role(user.role));
                }
            }
        }

        GuardDecision::Proceed
    }
}
