//! Booking, availability, bundle, and language payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A teacher's bookable time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
}

/// A booking as returned by `GET /bookings/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub status: BookingStatus,
    pub availability_slot: AvailabilitySlot,
}

/// Summary of the teacher attached to a slot being booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherInfo {
    pub user_id: String,
    pub user: TeacherUser,
}

/// Embedded user record on a teacher summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherUser {
    pub full_name: String,
}

/// A purchasable class bundle as returned by `GET /bundles/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub remaining_classes: u32,
}

/// A teachable language with its per-session price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PricePerSession")]
    pub price_per_session: f64,
}

/// Payload for `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub availability_slot_id: String,
    pub payment_provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpesa_phone_number: Option<String>,
}
