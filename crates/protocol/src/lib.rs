//! Wire types for the tutorhub API.
//!
//! This crate contains the serde-serializable types used for communication
//! with the tutorhub backend over HTTP and over the realtime websocket feed.
//! These types represent the "protocol layer" - the shapes of data as they
//! appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with the API: Match the backend's JSON payloads
//! * Stable: Changes only when the wire protocol changes
//!
//! Higher-level session, guard, and store APIs are built on top of these
//! types in `tutorhub-client`.

pub mod auth;
pub mod booking;
pub mod currency;
pub mod exam;
pub mod realtime;
pub mod upload;
pub mod user;

pub use auth::*;
pub use booking::*;
pub use currency::*;
pub use exam::*;
pub use realtime::*;
pub use upload::*;
pub use user::*;
