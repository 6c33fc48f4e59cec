//! Status transition rules and the upcoming/history partition.

use tracing::{debug, warn};

use crate::models::{Appointment, AppointmentStatus};

use super::{BookingError, BookingResult};

/// Valid next statuses for a given current status.
pub fn valid_transitions(current: &AppointmentStatus) -> &'static [AppointmentStatus] {
    match current {
        AppointmentStatus::Pending => {
            &[AppointmentStatus::Completed, AppointmentStatus::Cancelled]
        }
        // Terminal states - no transitions allowed
        AppointmentStatus::Completed => &[],
        AppointmentStatus::Cancelled => &[],
    }
}

/// Outcome of a transition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The transition is allowed and changes state.
    Apply,
    /// The appointment is already in the requested state. Repeating a
    /// transition converges instead of amplifying errors.
    Noop,
}

/// Validate a requested status transition.
pub fn check_transition(
    current: &AppointmentStatus,
    requested: &AppointmentStatus,
) -> BookingResult<Transition> {
    if current == requested {
        debug!("status transition {} -> {} is a no-op", current, requested);
        return Ok(Transition::Noop);
    }

    if !valid_transitions(current).contains(requested) {
        warn!("invalid status transition attempted: {} -> {}", current, requested);
        return Err(BookingError::InvalidTransition {
            from: *current,
            to: *requested,
        });
    }

    Ok(Transition::Apply)
}

/// Whether a patient may still edit this appointment.
pub fn is_editable(status: &AppointmentStatus) -> bool {
    *status == AppointmentStatus::Pending
}

/// Appointments split into the two lists every appointment view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentBuckets {
    /// Pending appointments, still actionable.
    pub upcoming: Vec<Appointment>,
    /// Completed and cancelled appointments, read-only.
    pub history: Vec<Appointment>,
}

/// Partition appointments by status. Every appointment lands in exactly
/// one bucket, determined solely by its status.
pub fn partition(appointments: Vec<Appointment>) -> AppointmentBuckets {
    let mut buckets = AppointmentBuckets::default();
    for appointment in appointments {
        if appointment.is_upcoming() {
            buckets.upcoming.push(appointment);
        } else {
            buckets.history.push(appointment);
        }
    }
    buckets
}
