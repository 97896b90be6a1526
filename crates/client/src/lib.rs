//! Client library for the tutorhub tutoring marketplace.
//!
//! Thin client over the remote tutorhub API. The load-bearing pieces are the
//! session context ([`session::Session`] and [`session::SessionStore`]), the
//! navigation authorization guard ([`guard::NavigationGuard`]), and the
//! reconnecting realtime transport ([`realtime::RealtimeTransport`]).
//! Domain stores (dashboard, booking, exams, currency) and the signed-upload
//! helper sit on top of the same HTTP collaborator.

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod realtime;
pub mod routes;
pub mod session;
pub mod storage;
pub mod stores;
pub mod upload;

/// Wire types, re-exported for embedders.
pub use tutorhub_protocol as protocol;

/// Top-level facade wiring config, session, guard, and transport together.
pub use client::Client;
/// Endpoint configuration.
pub use config::ClientConfig;
/// Crate error and result types.
pub use error::{Error, Result};
/// Navigation authorization guard and its decisions.
pub use guard::{GuardDecision, NavigationGuard, RedirectTarget};
/// Realtime transport, connection state, and retry policy types.
pub use realtime::{
    BackoffPolicy, ConnectionState, ConstantBackoff, ExponentialBackoff, RealtimeTransport,
    RetryConfig, Subscription,
};
/// Route tree configuration and matching.
pub use routes::{RouteMatch, RouteNode, RouteTable, default_routes};
/// Session context object and store operations.
pub use session::{LoginOutcome, OpOutcome, Session, SessionStore};
/// Key-value persistence abstraction and built-in backends.
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
