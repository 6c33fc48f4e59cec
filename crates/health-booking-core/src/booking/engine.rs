//! The booking engine.
//!
//! Enforces the slot-conflict contract: at most one non-cancelled
//! appointment per (doctor, date, time), no bookings in the past, and the
//! pending -> completed/cancelled lifecycle.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::db::{Database, DbError};
use crate::models::{Appointment, AppointmentStatus, AppointmentUpdate, BookingRequest};

use super::{
    check_transition, is_editable, partition, AppointmentBuckets, BookingError, BookingResult,
    Transition,
};

/// Booking engine over the appointment store.
pub struct BookingEngine<'a> {
    db: &'a Database,
}

impl<'a> BookingEngine<'a> {
    /// Create a new engine.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Book a new appointment. On success the stored record is returned
    /// with `status = pending`.
    pub fn book(&self, request: &BookingRequest) -> BookingResult<Appointment> {
        self.book_as_of(request, today())
    }

    /// Book with an explicit "today", so the past-date rule is testable.
    pub fn book_as_of(
        &self,
        request: &BookingRequest,
        today: NaiveDate,
    ) -> BookingResult<Appointment> {
        // Local validation first; an invalid form never reaches the store.
        let booking = request.validate()?;

        if booking.date < today {
            warn!(doctor = %booking.doctor_id, date = %booking.date, "booking rejected: past date");
            return Err(BookingError::PastDate);
        }

        if self
            .db
            .slot_taken(&booking.doctor_id, booking.date, booking.time, None)?
        {
            warn!(doctor = %booking.doctor_id, date = %booking.date, "booking rejected: slot taken");
            return Err(BookingError::SlotTaken);
        }

        let appointment = Appointment::new(booking);
        match self.db.insert_appointment(&appointment) {
            Ok(()) => {}
            // Backstop for a write that races the slot check.
            Err(DbError::Constraint(_)) => return Err(BookingError::SlotTaken),
            Err(e) => return Err(e.into()),
        }

        info!(appointment = %appointment.id, doctor = %appointment.doctor_id, "appointment booked");
        Ok(appointment)
    }

    /// Edit a pending appointment's date, time, department or purpose.
    /// Returns the stored record after the write, not the submitted fields.
    pub fn update(&self, id: &str, update: &AppointmentUpdate) -> BookingResult<Appointment> {
        self.update_as_of(id, update, today())
    }

    /// Edit with an explicit "today".
    pub fn update_as_of(
        &self,
        id: &str,
        update: &AppointmentUpdate,
        today: NaiveDate,
    ) -> BookingResult<Appointment> {
        let update = update.validate()?;

        let current = self
            .db
            .get_appointment(id)?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        if !is_editable(&current.status) {
            return Err(BookingError::NotEditable(current.status));
        }

        if update.date < today {
            return Err(BookingError::PastDate);
        }

        // Moving within its own slot is not a conflict.
        if self
            .db
            .slot_taken(&current.doctor_id, update.date, update.time, Some(id))?
        {
            warn!(appointment = %id, "edit rejected: slot taken");
            return Err(BookingError::SlotTaken);
        }

        let written = self.db.update_appointment_fields(
            id,
            update.medical_department.as_deref(),
            update.appointment_purpose.as_deref(),
            update.date,
            update.time,
        );
        match written {
            Ok(true) => {}
            Ok(false) => return Err(BookingError::NotFound(id.to_string())),
            Err(DbError::Constraint(_)) => return Err(BookingError::SlotTaken),
            Err(e) => return Err(e.into()),
        }

        info!(appointment = %id, "appointment updated");
        self.reload(id)
    }

    /// Doctor-side status transition: pending -> completed or cancelled.
    ///
    /// Repeating a transition into the state the appointment already holds
    /// is a no-op that returns the unchanged record.
    pub fn update_status(
        &self,
        id: &str,
        requested: AppointmentStatus,
    ) -> BookingResult<Appointment> {
        let current = self
            .db
            .get_appointment(id)?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        match check_transition(&current.status, &requested)? {
            Transition::Noop => Ok(current),
            Transition::Apply => {
                if !self.db.set_appointment_status(id, requested)? {
                    return Err(BookingError::NotFound(id.to_string()));
                }
                info!(appointment = %id, status = %requested, "appointment status updated");
                self.reload(id)
            }
        }
    }

    /// Hard delete, any state. Takes a [`ConfirmedDelete`] so the
    /// irreversible call cannot be reached without the explicit confirm
    /// step.
    pub fn delete(&self, confirmed: ConfirmedDelete) -> BookingResult<()> {
        if !self.db.delete_appointment(&confirmed.appointment_id)? {
            return Err(BookingError::NotFound(confirmed.appointment_id));
        }
        info!(appointment = %confirmed.appointment_id, "appointment deleted");
        Ok(())
    }

    /// A patient's appointments, partitioned into upcoming and history.
    pub fn patient_appointments(&self, patient_id: &str) -> BookingResult<AppointmentBuckets> {
        Ok(partition(self.db.list_appointments_for_patient(patient_id)?))
    }

    /// A doctor's appointments, partitioned into upcoming and history.
    pub fn doctor_appointments(&self, doctor_id: &str) -> BookingResult<AppointmentBuckets> {
        Ok(partition(self.db.list_appointments_for_doctor(doctor_id)?))
    }

    fn reload(&self, id: &str) -> BookingResult<Appointment> {
        self.db
            .get_appointment(id)?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Delete intent, step one of the two-step delete flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteIntent {
    appointment_id: String,
}

impl DeleteIntent {
    /// Record the intent to delete; nothing happens yet.
    pub fn new(appointment_id: impl Into<String>) -> Self {
        Self {
            appointment_id: appointment_id.into(),
        }
    }

    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    /// The explicit confirmation. Only a confirmed intent can be passed to
    /// [`BookingEngine::delete`].
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete {
            appointment_id: self.appointment_id,
        }
    }
}

/// A confirmed, irreversible delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    appointment_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_wire_date;

    const TODAY: &str = "2025-02-01";

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn today_fixed() -> NaiveDate {
        parse_wire_date(TODAY).unwrap()
    }

    fn make_request(doctor: &str, patient: &str, date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            doctor_id: doctor.into(),
            patient_id: patient.into(),
            full_name: "Max Tan".into(),
            email: "max@example.com".into(),
            appointment_date: date.into(),
            appointment_time: time.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_book_fresh_slot() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert!(db.get_appointment(&appointment.id).unwrap().is_some());
    }

    #[test]
    fn test_book_today_is_allowed() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        // Strictly-before-today is rejected; today itself is fine.
        let result = engine.book_as_of(&make_request("D1", "P1", TODAY, "10:00"), today_fixed());
        assert!(result.is_ok());
    }

    #[test]
    fn test_book_past_date_rejected() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let result =
            engine.book_as_of(&make_request("D1", "P1", "2025-01-31", "10:00"), today_fixed());
        assert!(matches!(result, Err(BookingError::PastDate)));
    }

    #[test]
    fn test_book_taken_slot_rejected() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();

        let result =
            engine.book_as_of(&make_request("D1", "P2", "2025-03-01", "10:00"), today_fixed());
        assert!(matches!(result, Err(BookingError::SlotTaken)));

        // No duplicate was persisted.
        assert_eq!(db.list_appointments_for_doctor("D1").unwrap().len(), 1);
    }

    #[test]
    fn test_book_invalid_form_never_reaches_store() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let mut request = make_request("D1", "P1", "2025-03-01", "10:00");
        request.email.clear();

        let result = engine.book_as_of(&request, today_fixed());
        assert!(matches!(result, Err(BookingError::Validation(_))));
        assert!(db.list_appointments_for_doctor("D1").unwrap().is_empty());
    }

    #[test]
    fn test_cancelled_slot_can_be_rebooked() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let first = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();
        engine
            .update_status(&first.id, AppointmentStatus::Cancelled)
            .unwrap();

        let second =
            engine.book_as_of(&make_request("D1", "P2", "2025-03-01", "10:00"), today_fixed());
        assert!(second.is_ok());
    }

    fn edit(date: &str, time: &str) -> AppointmentUpdate {
        AppointmentUpdate {
            medical_department: "Neurology".into(),
            appointment_purpose: "Follow-up".into(),
            appointment_date: date.into(),
            appointment_time: time.into(),
        }
    }

    #[test]
    fn test_update_returns_stored_record() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();

        let updated = engine
            .update_as_of(&appointment.id, &edit("2025-03-02", "11:00"), today_fixed())
            .unwrap();

        assert_eq!(updated.id, appointment.id);
        assert_eq!(updated.medical_department.as_deref(), Some("Neurology"));
        assert_eq!(updated, db.get_appointment(&appointment.id).unwrap().unwrap());
    }

    #[test]
    fn test_update_conflict_with_other_slot() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();
        let second = engine
            .book_as_of(&make_request("D1", "P2", "2025-03-01", "11:00"), today_fixed())
            .unwrap();

        // Moving the second appointment onto the first one's slot conflicts.
        let result =
            engine.update_as_of(&second.id, &edit("2025-03-01", "10:00"), today_fixed());
        assert!(matches!(result, Err(BookingError::SlotTaken)));
    }

    #[test]
    fn test_update_keeping_own_slot_is_not_a_conflict() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();

        // Same date and time, new purpose: must not conflict with itself.
        let result =
            engine.update_as_of(&appointment.id, &edit("2025-03-01", "10:00"), today_fixed());
        assert!(result.is_ok());
    }

    #[test]
    fn test_update_past_date_rejected() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();

        let result =
            engine.update_as_of(&appointment.id, &edit("2025-01-15", "10:00"), today_fixed());
        assert!(matches!(result, Err(BookingError::PastDate)));
    }

    #[test]
    fn test_update_terminal_appointment_rejected() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();
        engine
            .update_status(&appointment.id, AppointmentStatus::Completed)
            .unwrap();

        let result =
            engine.update_as_of(&appointment.id, &edit("2025-03-02", "10:00"), today_fixed());
        assert!(matches!(
            result,
            Err(BookingError::NotEditable(AppointmentStatus::Completed))
        ));
    }

    #[test]
    fn test_update_status_transitions() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();

        let completed = engine
            .update_status(&appointment.id, AppointmentStatus::Completed)
            .unwrap();
        assert_eq!(completed.status, AppointmentStatus::Completed);

        // Terminal state admits no further transitions...
        let result = engine.update_status(&appointment.id, AppointmentStatus::Cancelled);
        assert!(matches!(result, Err(BookingError::InvalidTransition { .. })));

        // ...but repeating the same transition converges without error.
        let again = engine
            .update_status(&appointment.id, AppointmentStatus::Completed)
            .unwrap();
        assert_eq!(again.status, AppointmentStatus::Completed);
    }

    #[test]
    fn test_update_status_unknown_id() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let result = engine.update_status("missing", AppointmentStatus::Completed);
        assert!(matches!(result, Err(BookingError::NotFound(_))));
    }

    #[test]
    fn test_delete_requires_confirmation_type() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();

        let intent = DeleteIntent::new(appointment.id.clone());
        assert_eq!(intent.appointment_id(), appointment.id);

        engine.delete(intent.confirm()).unwrap();
        assert!(db.get_appointment(&appointment.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_works_in_any_state() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();
        engine
            .update_status(&appointment.id, AppointmentStatus::Completed)
            .unwrap();

        engine
            .delete(DeleteIntent::new(appointment.id.clone()).confirm())
            .unwrap();
        assert!(db.get_appointment(&appointment.id).unwrap().is_none());
    }

    #[test]
    fn test_partitioned_lists() {
        let db = setup_db();
        let engine = BookingEngine::new(&db);

        let a = engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "10:00"), today_fixed())
            .unwrap();
        engine
            .book_as_of(&make_request("D1", "P1", "2025-03-01", "11:00"), today_fixed())
            .unwrap();
        engine.update_status(&a.id, AppointmentStatus::Completed).unwrap();

        let buckets = engine.patient_appointments("P1").unwrap();
        assert_eq!(buckets.upcoming.len(), 1);
        assert_eq!(buckets.history.len(), 1);
        assert_eq!(buckets.history[0].id, a.id);
    }
}
