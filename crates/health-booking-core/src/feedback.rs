//! Transient user feedback: dismissible banners that expire on their own,
//! and the message catalog for booking outcomes.

use chrono::{DateTime, Duration, Utc};

use crate::booking::{BookingError, FailureKind};
use crate::models::AppointmentStatus;

/// How long a banner stays up if the user does not dismiss it.
pub const BANNER_TTL_MS: i64 = 5000;

/// Delay before navigating away after a successful booking.
pub const SUCCESS_REDIRECT_DELAY_MS: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerVariant {
    Success,
    Danger,
    Info,
}

/// A transient, dismissible message.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub variant: BannerVariant,
    pub message: String,
    posted_at: DateTime<Utc>,
    dismissed: bool,
}

impl Banner {
    pub fn new(
        variant: BannerVariant,
        message: impl Into<String>,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            variant,
            message: message.into(),
            posted_at,
            dismissed: false,
        }
    }

    pub fn success(message: impl Into<String>, posted_at: DateTime<Utc>) -> Self {
        Self::new(BannerVariant::Success, message, posted_at)
    }

    pub fn danger(message: impl Into<String>, posted_at: DateTime<Utc>) -> Self {
        Self::new(BannerVariant::Danger, message, posted_at)
    }

    /// Banners self-clear after [`BANNER_TTL_MS`] regardless of user
    /// interaction.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.posted_at >= Duration::milliseconds(BANNER_TTL_MS)
    }

    /// Dismiss early.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        !self.dismissed && !self.is_expired(now)
    }
}

/// The booking operation a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOp {
    Schedule,
    Update,
    UpdateStatus(AppointmentStatus),
    Delete,
}

/// Success message for a completed operation.
pub fn success_message(op: BookingOp) -> String {
    match op {
        BookingOp::Schedule => "Appointment scheduled successfully".into(),
        BookingOp::Update => "Appointment updated successfully!".into(),
        BookingOp::UpdateStatus(status) => format!("Appointment {}!", status),
        BookingOp::Delete => "Appointment deleted successfully!".into(),
    }
}

/// Failure message for an engine error. Validation failures show their own
/// text; conflict and past-date get their distinct messages; everything
/// else collapses to a generic message for the operation.
pub fn failure_message(op: BookingOp, error: &BookingError) -> String {
    match error {
        BookingError::Validation(v) => v.to_string(),
        _ => kind_message(op, error.kind()),
    }
}

/// Failure message from a [`FailureKind`], for callers that classified the
/// outcome elsewhere (the REST client maps HTTP statuses to kinds).
pub fn kind_message(op: BookingOp, kind: FailureKind) -> String {
    match kind {
        FailureKind::Validation => "Please fill in all required fields".into(),
        FailureKind::SlotTaken => {
            "This time slot is already booked. Please choose another time.".into()
        }
        FailureKind::PastDate => "Appointment cannot be in the past.".into(),
        FailureKind::Other => match op {
            BookingOp::Schedule => "Failed to schedule appointment. Please try again.".into(),
            BookingOp::Update => "Failed to update appointment. Please try again.".into(),
            BookingOp::UpdateStatus(_) => "Failed to update appointment status.".into(),
            BookingOp::Delete => "Error deleting appointment.".into(),
        },
    }
}
