//! Session context and authentication store.
//!
//! This module centralizes the authenticated identity held by the client:
//! the bearer token, the fetched user profile, and the operations that are
//! allowed to mutate them.

/// Shared session context object and persistence glue.
pub mod state;
/// Authentication operations and outcome values.
pub mod store;

/// Cheaply cloneable session context.
pub use state::Session;
/// Login outcome with the role-derived landing path.
pub use store::LoginOutcome;
/// Generic store operation outcome.
pub use store::OpOutcome;
/// Authentication and profile operations.
pub use store::SessionStore;
