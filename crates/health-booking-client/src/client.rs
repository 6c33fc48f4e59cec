//! The API client and its outcome classification.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use health_booking_core::booking::FailureKind;
use health_booking_core::feedback::{kind_message, BookingOp};
use health_booking_core::models::{
    Appointment, AppointmentStatus, AppointmentUpdate, BookingRequest, DoctorProfile,
    PatientProfile, ValidationError,
};

use crate::config::ApiConfig;

/// Client-side failures, one per outcome class.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Required fields missing; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 409: the slot already holds a non-cancelled appointment.
    #[error("time slot is already booked")]
    SlotTaken,

    /// 400: the date is in the past.
    #[error("appointment date is in the past")]
    PastDate,

    /// Non-2xx with server-provided detail, echoed for profile and
    /// appointment saves.
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// Unclassified non-2xx.
    #[error("unexpected response status: {0}")]
    Status(u16),

    /// Network failure; terminal for this attempt, no retry.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The shared outcome class, for message selection.
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Validation(_) => FailureKind::Validation,
            ApiError::SlotTaken => FailureKind::SlotTaken,
            ApiError::PastDate => FailureKind::PastDate,
            _ => FailureKind::Other,
        }
    }

    /// User-facing message for this failure in the context of `op`.
    pub fn user_message(&self, op: BookingOp) -> String {
        match self {
            ApiError::Validation(v) => v.to_string(),
            _ => kind_message(op, self.kind()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Id assigned by the server when a profile is saved.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SavedProfile {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Client for the appointment API.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build a client from the deployment environment.
    pub fn from_env() -> Result<Self, crate::config::ConfigError> {
        Ok(Self::new(ApiConfig::from_env()?))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    // =========================================================================
    // Doctors and Profiles
    // =========================================================================

    /// `GET /getAllDoctors`
    pub async fn get_all_doctors(&self) -> ApiResult<Vec<DoctorProfile>> {
        let url = self.url("/getAllDoctors");
        debug!("fetching doctors: {}", url);
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// `GET /getDoctor/{uid}`. Absence is the normal "profile not yet
    /// completed" state, so every non-success becomes `None`.
    pub async fn get_doctor(&self, uid: &str) -> ApiResult<Option<DoctorProfile>> {
        let response = self.http.get(self.url(&format!("/getDoctor/{}", uid))).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// `GET /getPatient/{uid}`. Same absence semantics as [`Self::get_doctor`].
    pub async fn get_patient(&self, uid: &str) -> ApiResult<Option<PatientProfile>> {
        let response = self.http.get(self.url(&format!("/getPatient/{}", uid))).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// `POST /addDoctorProfile`. The response carries the assigned id;
    /// failures echo the server's error detail.
    pub async fn add_doctor_profile(&self, profile: &DoctorProfile) -> ApiResult<SavedProfile> {
        let response = self
            .http
            .post(self.url("/addDoctorProfile"))
            .json(profile)
            .send()
            .await?;
        Self::saved_or_server_error(response).await
    }

    /// `POST /addPatientProfile`.
    pub async fn add_patient_profile(&self, profile: &PatientProfile) -> ApiResult<SavedProfile> {
        let response = self
            .http
            .post(self.url("/addPatientProfile"))
            .json(profile)
            .send()
            .await?;
        Self::saved_or_server_error(response).await
    }

    async fn saved_or_server_error(response: reqwest::Response) -> ApiResult<SavedProfile> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let detail = server_error_detail(status, response.json().await.ok());
        warn!("profile save failed: {}", detail);
        Err(ApiError::Server {
            status: status.as_u16(),
            detail,
        })
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    /// `POST /bookings`. The required-field check runs before the request;
    /// an invalid form never produces network traffic. On success the list
    /// is refreshed by the caller, so the response body is not relied on.
    pub async fn create_booking(&self, request: &BookingRequest) -> ApiResult<()> {
        request.validate()?;

        let response = self
            .http
            .post(self.url("/bookings"))
            .json(request)
            .send()
            .await?;
        classify_booking_status(response.status())
    }

    /// `GET /appointments/patient/{patientId}`
    pub async fn patient_appointments(&self, patient_id: &str) -> ApiResult<Vec<Appointment>> {
        self.appointment_list(&format!("/appointments/patient/{}", patient_id))
            .await
    }

    /// `GET /appointments/doctor/{doctorId}`
    pub async fn doctor_appointments(&self, doctor_id: &str) -> ApiResult<Vec<Appointment>> {
        self.appointment_list(&format!("/appointments/doctor/{}", doctor_id))
            .await
    }

    async fn appointment_list(&self, path: &str) -> ApiResult<Vec<Appointment>> {
        let response = self.http.get(self.url(path)).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// `PUT /appointments/{id}`. Same status-code semantics as create;
    /// returns the server's updated record for the in-place list patch.
    pub async fn update_appointment(
        &self,
        id: &str,
        doctor_id: &str,
        update: &AppointmentUpdate,
    ) -> ApiResult<Appointment> {
        update.validate()?;

        let body = update_body(doctor_id, update);
        let response = self
            .http
            .put(self.url(&format!("/appointments/{}", id)))
            .json(&body)
            .send()
            .await?;
        classify_booking_status(response.status())?;
        Ok(response.json().await?)
    }

    /// `PUT /appointments/{id}/status`. Returns the updated record; the
    /// caller patches only the status field in place.
    pub async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> ApiResult<Appointment> {
        let response = self
            .http
            .put(self.url(&format!("/appointments/{}/status", id)))
            .json(&status_body(status))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// `DELETE /appointments/{id}`. Irreversible; call only after the
    /// user's explicit confirmation.
    pub async fn delete_appointment(&self, id: &str) -> ApiResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/appointments/{}", id)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Map a booking write status onto the outcome taxonomy: 2xx success,
/// 409 conflict, 400 past-date, anything else generic.
fn classify_booking_status(status: StatusCode) -> ApiResult<()> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::CONFLICT => Err(ApiError::SlotTaken),
        StatusCode::BAD_REQUEST => Err(ApiError::PastDate),
        other => Err(ApiError::Status(other.as_u16())),
    }
}

fn update_body(doctor_id: &str, update: &AppointmentUpdate) -> serde_json::Value {
    serde_json::json!({
        "medical_department": update.medical_department,
        "appointment_purpose": update.appointment_purpose,
        "appointment_date": update.appointment_date,
        "appointment_time": update.appointment_time,
        "doctor_id": doctor_id,
    })
}

fn status_body(status: AppointmentStatus) -> serde_json::Value {
    serde_json::json!({ "status": status.as_str() })
}

fn server_error_detail(status: StatusCode, body: Option<ServerErrorBody>) -> String {
    body.and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
}
