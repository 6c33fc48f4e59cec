//! Booking engine: appointment creation, edits, status transitions and the
//! slot-conflict contract.

mod engine;
mod lifecycle;

pub use engine::*;
pub use lifecycle::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::{AppointmentStatus, ValidationError};

/// Booking failures.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The slot already holds a non-cancelled appointment.
    #[error("time slot is already booked")]
    SlotTaken,

    /// The requested date is strictly before today.
    #[error("appointment date is in the past")]
    PastDate,

    #[error("appointment not found: {0}")]
    NotFound(String),

    /// Only pending appointments are editable.
    #[error("appointment is no longer editable ({0})")]
    NotEditable(AppointmentStatus),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("database error: {0}")]
    Database(#[from] DbError),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Coarse failure classes shared by the local engine and the REST client,
/// used to pick user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Required fields missing or unparseable; nothing was sent.
    Validation,
    /// Duplicate slot.
    SlotTaken,
    /// Date before today.
    PastDate,
    /// Anything else: transport, storage, unknown server response.
    Other,
}

impl BookingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BookingError::Validation(_) => FailureKind::Validation,
            BookingError::SlotTaken => FailureKind::SlotTaken,
            BookingError::PastDate => FailureKind::PastDate,
            _ => FailureKind::Other,
        }
    }
}
