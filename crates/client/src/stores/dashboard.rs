//! Dashboard stats and next-class derivation.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::warn;
use tutorhub_protocol::{Booking, BookingStatus, Bundle};

use crate::http::ApiClient;
use crate::session::Session;

/// Headline numbers shown on the authenticated home view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub completed_classes: usize,
    pub xp: u64,
    pub remaining_bundle_classes: u32,
}

#[derive(Default)]
struct DashboardState {
    next_class: Option<Booking>,
    stats: DashboardStats,
}

/// Aggregates bookings and bundles into dashboard state.
pub struct DashboardStore {
    api: ApiClient,
    session: Session,
    state: Mutex<DashboardState>,
}

impl DashboardStore {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(DashboardState::default()),
        }
    }

    /// The earliest upcoming confirmed class, if any has been seen.
    pub fn next_class(&self) -> Option<Booking> {
        self.state.lock().next_class.clone()
    }

    pub fn stats(&self) -> DashboardStats {
        self.state.lock().stats
    }

    /// Refetches bookings and bundles and rederives the dashboard state.
    ///
    /// Failures are absorbed: cached state stays as-is and the failure is
    /// only logged.
    pub async fn refresh(&self) {
        let bookings: Vec<Booking> = match self.api.get_json("/bookings/me").await {
            Ok(bookings) => bookings,
            Err(err) => {
                warn!(target = "tutorhub.dashboard", error = %err, "failed to fetch bookings");
                return;
            }
        };
        let bundles: Vec<Bundle> = match self.api.get_json("/bundles/me").await {
            Ok(bundles) => bundles,
            Err(err) => {
                warn!(target = "tutorhub.dashboard", error = %err, "failed to fetch bundles");
                return;
            }
        };

        let derived = derive(&bookings, &bundles, Utc::now());
        let xp = self.session.user().and_then(|user| user.xp).unwrap_or(0);

        let mut state = self.state.lock();
        // Keep the previous next-class when nothing upcoming was found.
        if derived.next_class.is_some() {
            state.next_class = derived.next_class;
        }
        state.stats = DashboardStats {
            completed_classes: derived.completed_classes,
            xp,
            remaining_bundle_classes: derived.remaining_bundle_classes,
        };
    }
}

struct Derived {
    next_class: Option<Booking>,
    completed_classes: usize,
    remaining_bundle_classes: u32,
}

fn derive(bookings: &[Booking], bundles: &[Bundle], now: DateTime<Utc>) -> Derived {
    let mut upcoming: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed && b.availability_slot.start_time > now)
        .collect();
    upcoming.sort_by_key(|b| b.availability_slot.start_time);

    Derived {
        next_class: upcoming.first().map(|b| (*b).clone()),
        completed_classes: bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .count(),
        remaining_bundle_classes: bundles.iter().map(|b| b.remaining_classes).sum(),
    }
}
