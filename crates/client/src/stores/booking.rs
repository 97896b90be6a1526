//! Booking selection context and creation.

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};
use tutorhub_protocol::{AvailabilitySlot, CreateBookingRequest, Language, TeacherInfo};

use crate::http::ApiClient;

/// Outcome of a booking attempt; `data` carries the raw server payload so
/// callers can drive payment follow-up from provider-specific fields.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<Value>,
}

impl BookingOutcome {
    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Default)]
struct BookingState {
    selected_teacher: Option<TeacherInfo>,
    selected_slot: Option<AvailabilitySlot>,
    languages: Vec<Language>,
}

/// Holds the teacher/slot pair a booking is being built against.
pub struct BookingStore {
    api: ApiClient,
    state: Mutex<BookingState>,
}

impl BookingStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(BookingState::default()),
        }
    }

    pub fn selected_teacher(&self) -> Option<TeacherInfo> {
        self.state.lock().selected_teacher.clone()
    }

    pub fn selected_slot(&self) -> Option<AvailabilitySlot> {
        self.state.lock().selected_slot.clone()
    }

    pub fn languages(&self) -> Vec<Language> {
        self.state.lock().languages.clone()
    }

    /// Refetches the language catalogue. Failures are absorbed and the
    /// cached list left untouched.
    pub async fn fetch_languages(&self) {
        match self.api.get_json::<Vec<Language>>("/languages").await {
            Ok(languages) => {
                self.state.lock().languages = languages;
            }
            Err(err) => {
                warn!(target = "tutorhub.booking", error = %err, "failed to fetch languages");
            }
        }
    }

    /// Records the teacher and slot a booking is about to be created for,
    /// loading the language catalogue on first use.
    pub async fn set_booking_context(&self, teacher: TeacherInfo, slot: AvailabilitySlot) {
        let needs_languages = {
            let mut state = self.state.lock();
            state.selected_teacher = Some(teacher);
            state.selected_slot = Some(slot);
            state.languages.is_empty()
        };
        if needs_languages {
            self.fetch_languages().await;
        }
    }

    pub fn clear_selection(&self) {
        let mut state = self.state.lock();
        state.selected_teacher = None;
        state.selected_slot = None;
    }

    /// Creates a booking for the currently selected slot.
    ///
    /// The raw response payload is returned for payment follow-up. M-Pesa
    /// completes out-of-band, so only a successful M-Pesa booking clears the
    /// selection; other providers keep it until their checkout resolves.
    pub async fn create_booking(
        &self,
        payment_provider: &str,
        mpesa_phone_number: Option<String>,
    ) -> BookingOutcome {
        let Some(slot) = self.selected_slot() else {
            return BookingOutcome::fail("No slot selected.");
        };

        let request = CreateBookingRequest {
            availability_slot_id: slot.id.clone(),
            payment_provider: payment_provider.to_string(),
            mpesa_phone_number,
        };

        match self.api.post_json::<_, Value>("/bookings", &request).await {
            Ok(data) => {
                debug!(
                    target = "tutorhub.booking",
                    slot_id = %slot.id,
                    provider = payment_provider,
                    "booking created"
                );
                if payment_provider == "mpesa" {
                    self.clear_selection();
                }
                BookingOutcome {
                    success: true,
                    message: None,
                    data: Some(data),
                }
            }
            Err(err) => {
                warn!(target = "tutorhub.booking", error = %err, "booking failed");
                let message = match &err {
                    crate::error::Error::Api { message, .. } => message.clone(),
                    _ => "Booking failed.".to_string(),
                };
                BookingOutcome::fail(message)
            }
        }
    }
}
