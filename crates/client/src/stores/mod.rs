//! Domain state stores layered over the HTTP collaborator.
//!
//! Each store follows the same failure policy as the session store:
//! network failures are absorbed locally and surface as outcome values or
//! untouched cached state, never as raw errors.

/// Booking selection context and creation.
pub mod booking;
/// Exchange-rate cache with a hardcoded fallback.
pub mod currency;
/// Next-class and stats derivation for the dashboard.
pub mod dashboard;
/// Test attempt lifecycle.
pub mod exam;

pub use booking::{BookingOutcome, BookingStore};
pub use currency::{CurrencyStore, FALLBACK_USD_TO_KES};
pub use dashboard::{DashboardStats, DashboardStore};
pub use exam::{ExamStore, TestDetails};
