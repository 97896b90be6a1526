//! Reconnecting realtime transport.
//!
//! One websocket connection to the fixed feed endpoint, authenticated with
//! the session token, retried a bounded number of times on disconnect, with
//! incoming frames fanned out to registered listeners.

/// Reconnect delay policies.
pub mod backoff;
/// Connection state machine and listener dispatch.
pub mod transport;

/// Delay policy trait and built-in policies.
pub use backoff::{BackoffPolicy, ConstantBackoff, ExponentialBackoff};
/// Transport handle, connection state, retry config, listener handle.
pub use transport::{ConnectionState, RealtimeTransport, RetryConfig, Subscription};
