//! Health-Booking Core Library
//!
//! Appointment booking core for a patient/doctor clinic shell.
//!
//! # Architecture
//!
//! ```text
//! Sign-up/Sign-in ──► AuthContext ──► Role Gate ──► nav links + landing route
//!                                         │
//!                          ┌──────────────▼──────────────┐
//!                          │        BookingEngine        │
//!                          │  validate → past-date check │
//!                          │        → slot check         │
//!                          └──────────────┬──────────────┘
//!                                         │
//!                  ┌──────────────────────┼──────────────────────┐
//!                  ▼                      ▼                      ▼
//!              Appointments          Profiles               FileStore
//!              (SQLite)              (SQLite)            (photos, reports)
//! ```
//!
//! # Core Principle
//!
//! **A slot (doctor, date, time) holds at most one non-cancelled
//! appointment.** Conflicts and past dates are rejected before anything is
//! written, and the same outcome taxonomy drives every user-facing message.
//!
//! # Modules
//!
//! - [`db`]: SQLite layer for accounts, profiles and appointments
//! - [`models`]: Domain types (Appointment, DoctorProfile, Role, etc.)
//! - [`booking`]: Booking engine, lifecycle rules, conflict contract
//! - [`auth`]: Session context and the role gate
//! - [`files`]: Role-scoped photo and report storage
//! - [`feedback`]: Transient banners and the outcome message catalog

pub mod auth;
pub mod booking;
pub mod db;
pub mod feedback;
pub mod files;
pub mod models;

// Re-export commonly used types
pub use auth::{nav_links, resolve_route, AuthContext, AuthSession, NavLink, Route};
pub use booking::{
    partition, AppointmentBuckets, BookingEngine, BookingError, ConfirmedDelete, DeleteIntent,
    FailureKind,
};
pub use db::Database;
pub use files::{FileStore, ReportFile};
pub use models::{
    Appointment, AppointmentStatus, AppointmentUpdate, BookingRequest, DoctorProfile,
    PatientProfile, Role, UserAccount,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HealthBookingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Time slot already booked: {0}")]
    SlotTaken(String),

    #[error("Past date: {0}")]
    PastDate(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<db::DbError> for HealthBookingError {
    fn from(e: db::DbError) -> Self {
        HealthBookingError::DatabaseError(e.to_string())
    }
}

impl From<booking::BookingError> for HealthBookingError {
    fn from(e: booking::BookingError) -> Self {
        match &e {
            booking::BookingError::Validation(_) => {
                HealthBookingError::InvalidInput(e.to_string())
            }
            booking::BookingError::SlotTaken => HealthBookingError::SlotTaken(e.to_string()),
            booking::BookingError::PastDate => HealthBookingError::PastDate(e.to_string()),
            booking::BookingError::NotFound(id) => HealthBookingError::NotFound(id.clone()),
            booking::BookingError::NotEditable(_)
            | booking::BookingError::InvalidTransition { .. } => {
                HealthBookingError::InvalidInput(e.to_string())
            }
            booking::BookingError::Database(_) => HealthBookingError::DatabaseError(e.to_string()),
        }
    }
}

impl From<files::FileError> for HealthBookingError {
    fn from(e: files::FileError) -> Self {
        HealthBookingError::StorageError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for HealthBookingError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HealthBookingError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a booking store at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<HealthBookingCore>, HealthBookingError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(HealthBookingCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory booking store (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<HealthBookingCore>, HealthBookingError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(HealthBookingCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Navigation labels for a role string ("patient", "doctor", anything else).
#[uniffi::export]
pub fn navigation_for_role(role: String) -> Vec<String> {
    auth::nav_links(Role::parse(&role))
        .iter()
        .map(|link| link.label().to_string())
        .collect()
}

/// Landing route path for an authenticated user's role.
#[uniffi::export]
pub fn landing_path_for_role(role: String) -> String {
    auth::landing_route(Role::parse(&role)).path().to_string()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct HealthBookingCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl HealthBookingCore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Record a new account at sign-up. Role must be "patient" or "doctor".
    pub fn register_user(
        &self,
        uid: String,
        email: String,
        full_name: String,
        role: String,
    ) -> Result<(), HealthBookingError> {
        let role = Role::parse(&role);
        if !role.is_known() {
            return Err(HealthBookingError::InvalidInput(
                "role must be patient or doctor".into(),
            ));
        }
        let db = self.db.lock()?;
        db.insert_user(&UserAccount::new(uid, email, full_name, role))?;
        Ok(())
    }

    /// Role for a uid; "unknown" while the account record is absent.
    pub fn user_role(&self, uid: String) -> Result<String, HealthBookingError> {
        let db = self.db.lock()?;
        let role = auth::resolve_role(db.get_role(&uid));
        Ok(role.as_str().to_string())
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Add or update a doctor profile.
    pub fn save_doctor_profile(
        &self,
        profile: FfiDoctorProfile,
    ) -> Result<(), HealthBookingError> {
        let db = self.db.lock()?;
        db.upsert_doctor_profile(&profile.into())?;
        Ok(())
    }

    /// Get a doctor profile; absence means "not yet completed".
    pub fn get_doctor(
        &self,
        uid: String,
    ) -> Result<Option<FfiDoctorProfile>, HealthBookingError> {
        let db = self.db.lock()?;
        let profile = db.get_doctor_profile(&uid)?;
        Ok(profile.map(|p| p.into()))
    }

    /// List all doctors, ordered by name.
    pub fn list_doctors(&self) -> Result<Vec<FfiDoctorProfile>, HealthBookingError> {
        let db = self.db.lock()?;
        let doctors = db.list_doctors()?;
        Ok(doctors.into_iter().map(|p| p.into()).collect())
    }

    /// Add or update a patient profile.
    pub fn save_patient_profile(
        &self,
        profile: FfiPatientProfile,
    ) -> Result<(), HealthBookingError> {
        let db = self.db.lock()?;
        db.upsert_patient_profile(&profile.into())?;
        Ok(())
    }

    /// Get a patient profile; absence means "not yet completed".
    pub fn get_patient(
        &self,
        uid: String,
    ) -> Result<Option<FfiPatientProfile>, HealthBookingError> {
        let db = self.db.lock()?;
        let profile = db.get_patient_profile(&uid)?;
        Ok(profile.map(|p| p.into()))
    }

    // =========================================================================
    // Booking Operations
    // =========================================================================

    /// Book a new appointment.
    pub fn book_appointment(
        &self,
        request: FfiBookingRequest,
    ) -> Result<FfiAppointment, HealthBookingError> {
        let db = self.db.lock()?;
        let engine = BookingEngine::new(&db);
        let appointment = engine.book(&request.into())?;
        Ok(appointment.into())
    }

    /// Edit a pending appointment.
    pub fn update_appointment(
        &self,
        id: String,
        update: FfiAppointmentUpdate,
    ) -> Result<FfiAppointment, HealthBookingError> {
        let db = self.db.lock()?;
        let engine = BookingEngine::new(&db);
        let appointment = engine.update(&id, &update.into())?;
        Ok(appointment.into())
    }

    /// Transition an appointment to "completed" or "cancelled".
    pub fn update_appointment_status(
        &self,
        id: String,
        status: String,
    ) -> Result<FfiAppointment, HealthBookingError> {
        let status = AppointmentStatus::parse(&status).ok_or_else(|| {
            HealthBookingError::InvalidInput(format!("unknown status: {}", status))
        })?;
        let db = self.db.lock()?;
        let engine = BookingEngine::new(&db);
        let appointment = engine.update_status(&id, status)?;
        Ok(appointment.into())
    }

    /// Hard delete an appointment. Call only after the user has confirmed;
    /// this is irreversible.
    pub fn delete_appointment(&self, id: String) -> Result<(), HealthBookingError> {
        let db = self.db.lock()?;
        let engine = BookingEngine::new(&db);
        engine.delete(DeleteIntent::new(id).confirm())?;
        Ok(())
    }

    /// A patient's appointments, split into upcoming and history.
    pub fn patient_appointments(
        &self,
        patient_id: String,
    ) -> Result<FfiAppointmentLists, HealthBookingError> {
        let db = self.db.lock()?;
        let engine = BookingEngine::new(&db);
        let buckets = engine.patient_appointments(&patient_id)?;
        Ok(buckets.into())
    }

    /// A doctor's appointments, split into upcoming and history.
    pub fn doctor_appointments(
        &self,
        doctor_id: String,
    ) -> Result<FfiAppointmentLists, HealthBookingError> {
        let db = self.db.lock()?;
        let engine = BookingEngine::new(&db);
        let buckets = engine.doctor_appointments(&doctor_id)?;
        Ok(buckets.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe doctor profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctorProfile {
    pub firebase_uid: String,
    pub full_name: String,
    pub specialty: String,
    pub qualification: Option<String>,
    pub experience_years: u32,
    pub office_hours: Option<String>,
    pub languages_spoken: Option<String>,
    pub email: String,
    pub photo_url: Option<String>,
}

impl From<DoctorProfile> for FfiDoctorProfile {
    fn from(profile: DoctorProfile) -> Self {
        Self {
            firebase_uid: profile.firebase_uid,
            full_name: profile.full_name,
            specialty: profile.specialty,
            qualification: profile.qualification,
            experience_years: profile.experience_years,
            office_hours: profile.office_hours,
            languages_spoken: profile.languages_spoken,
            email: profile.email,
            photo_url: profile.photo_url,
        }
    }
}

impl From<FfiDoctorProfile> for DoctorProfile {
    fn from(profile: FfiDoctorProfile) -> Self {
        let mut inner = DoctorProfile::new(
            profile.firebase_uid,
            profile.full_name,
            profile.specialty,
            profile.email,
        );
        inner.qualification = profile.qualification;
        inner.experience_years = profile.experience_years;
        inner.office_hours = profile.office_hours;
        inner.languages_spoken = profile.languages_spoken;
        inner.photo_url = profile.photo_url;
        inner
    }
}

/// FFI-safe patient profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientProfile {
    pub firebase_uid: String,
    pub gender: Option<String>,
}

impl From<PatientProfile> for FfiPatientProfile {
    fn from(profile: PatientProfile) -> Self {
        Self {
            firebase_uid: profile.firebase_uid,
            gender: profile.gender,
        }
    }
}

impl From<FfiPatientProfile> for PatientProfile {
    fn from(profile: FfiPatientProfile) -> Self {
        let mut inner = PatientProfile::new(profile.firebase_uid);
        inner.gender = profile.gender;
        inner
    }
}

/// FFI-safe booking form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBookingRequest {
    pub doctor_id: String,
    pub patient_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub medical_department: String,
    pub appointment_purpose: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

impl From<FfiBookingRequest> for BookingRequest {
    fn from(request: FfiBookingRequest) -> Self {
        BookingRequest {
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            full_name: request.full_name,
            email: request.email,
            phone_number: request.phone_number,
            medical_department: request.medical_department,
            appointment_purpose: request.appointment_purpose,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time,
        }
    }
}

/// FFI-safe appointment edit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointmentUpdate {
    pub medical_department: String,
    pub appointment_purpose: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

impl From<FfiAppointmentUpdate> for AppointmentUpdate {
    fn from(update: FfiAppointmentUpdate) -> Self {
        AppointmentUpdate {
            medical_department: update.medical_department,
            appointment_purpose: update.appointment_purpose,
            appointment_date: update.appointment_date,
            appointment_time: update.appointment_time,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub medical_department: Option<String>,
    pub appointment_purpose: Option<String>,
    pub appointment_date: String,
    pub appointment_time: String,
    pub status: String,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            full_name: appointment.full_name,
            email: appointment.email,
            phone_number: appointment.phone_number,
            medical_department: appointment.medical_department,
            appointment_purpose: appointment.appointment_purpose,
            appointment_date: appointment.appointment_date.format("%Y-%m-%d").to_string(),
            appointment_time: models::format_wire_time(&appointment.appointment_time),
            status: appointment.status.as_str().to_string(),
        }
    }
}

/// FFI-safe upcoming/history partition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointmentLists {
    pub upcoming: Vec<FfiAppointment>,
    pub history: Vec<FfiAppointment>,
}

impl From<AppointmentBuckets> for FfiAppointmentLists {
    fn from(buckets: AppointmentBuckets) -> Self {
        Self {
            upcoming: buckets.upcoming.into_iter().map(|a| a.into()).collect(),
            history: buckets.history.into_iter().map(|a| a.into()).collect(),
        }
    }
}
