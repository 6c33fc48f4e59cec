//! Booking form inputs and local validation.
//!
//! Validation runs before any store or network access; a request that
//! fails here never leaves the client.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::appointment::{parse_wire_date, parse_wire_time};

/// Local validation failures, resolved before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("Invalid appointment date: {0}")]
    BadDate(String),

    #[error("Invalid appointment time: {0}")]
    BadTime(String),
}

/// Raw booking form input. Every field arrives as text, exactly as a form
/// submits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingRequest {
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

/// A booking that passed local validation: required fields present, date
/// and time parsed, optional fields normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub doctor_id: String,
    pub patient_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub medical_department: Option<String>,
    pub appointment_purpose: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl BookingRequest {
    /// Required-field check plus date/time parsing.
    ///
    /// Required: full name, email, date, time. Phone, department and
    /// purpose are optional; empty strings become `None`.
    pub fn validate(&self) -> Result<ValidBooking, ValidationError> {
        if self.full_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.appointment_date.trim().is_empty()
            || self.appointment_time.trim().is_empty()
        {
            return Err(ValidationError::MissingRequiredFields);
        }

        let date = parse_wire_date(&self.appointment_date)
            .ok_or_else(|| ValidationError::BadDate(self.appointment_date.clone()))?;
        let time = parse_wire_time(&self.appointment_time)
            .ok_or_else(|| ValidationError::BadTime(self.appointment_time.clone()))?;

        Ok(ValidBooking {
            doctor_id: self.doctor_id.clone(),
            patient_id: self.patient_id.clone(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: none_if_empty(&self.phone_number),
            medical_department: none_if_empty(&self.medical_department),
            appointment_purpose: none_if_empty(&self.appointment_purpose),
            date,
            time,
        })
    }
}

/// Patient-side edit of a pending appointment: date, time, department and
/// purpose only. The doctor and identities are not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentUpdate {
    pub medical_department: String,
    pub appointment_purpose: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

/// A validated appointment edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidUpdate {
    pub medical_department: Option<String>,
    pub appointment_purpose: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl AppointmentUpdate {
    /// Parse and normalize the edit. Date and time stay required.
    pub fn validate(&self) -> Result<ValidUpdate, ValidationError> {
        if self.appointment_date.trim().is_empty() || self.appointment_time.trim().is_empty() {
            return Err(ValidationError::MissingRequiredFields);
        }

        let date = parse_wire_date(&self.appointment_date)
            .ok_or_else(|| ValidationError::BadDate(self.appointment_date.clone()))?;
        let time = parse_wire_time(&self.appointment_time)
            .ok_or_else(|| ValidationError::BadTime(self.appointment_time.clone()))?;

        Ok(ValidUpdate {
            medical_department: none_if_empty(&self.medical_department),
            appointment_purpose: none_if_empty(&self.appointment_purpose),
            date,
            time,
        })
    }
}

fn none_if_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_request() -> BookingRequest {
        BookingRequest {
            doctor_id: "doc-1".into(),
            patient_id: "pat-1".into(),
            full_name: "Max Tan".into(),
            email: "max@example.com".into(),
            phone_number: "+6012-3456789".into(),
            medical_department: "Cardiology".into(),
            appointment_purpose: "Blood test".into(),
            appointment_date: "2025-03-01".into(),
            appointment_time: "10:00".into(),
        }
    }

    #[test]
    fn test_valid_request() {
        let valid = filled_request().validate().unwrap();
        assert_eq!(valid.full_name, "Max Tan");
        assert_eq!(valid.phone_number.as_deref(), Some("+6012-3456789"));
        assert_eq!(valid.date, chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["full_name", "email", "appointment_date", "appointment_time"] {
            let mut request = filled_request();
            match field {
                "full_name" => request.full_name.clear(),
                "email" => request.email.clear(),
                "appointment_date" => request.appointment_date.clear(),
                _ => request.appointment_time.clear(),
            }
            assert_eq!(
                request.validate(),
                Err(ValidationError::MissingRequiredFields),
                "field {} should be required",
                field
            );
        }
    }

    #[test]
    fn test_optional_fields_normalize_to_none() {
        let mut request = filled_request();
        request.phone_number = "   ".into();
        request.medical_department.clear();
        request.appointment_purpose.clear();

        let valid = request.validate().unwrap();
        assert!(valid.phone_number.is_none());
        assert!(valid.medical_department.is_none());
        assert!(valid.appointment_purpose.is_none());
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let mut request = filled_request();
        request.appointment_date = "01/03/2025".into();
        assert!(matches!(
            request.validate(),
            Err(ValidationError::BadDate(_))
        ));
    }

    #[test]
    fn test_validation_message_matches_form_copy() {
        assert_eq!(
            ValidationError::MissingRequiredFields.to_string(),
            "Please fill in all required fields"
        );
    }

    #[test]
    fn test_update_requires_date_and_time() {
        let update = AppointmentUpdate {
            medical_department: "Neurology".into(),
            appointment_purpose: "Follow-up".into(),
            appointment_date: "".into(),
            appointment_time: "09:00".into(),
        };
        assert_eq!(update.validate(), Err(ValidationError::MissingRequiredFields));
    }

    #[test]
    fn test_update_parses() {
        let update = AppointmentUpdate {
            medical_department: "".into(),
            appointment_purpose: "Follow-up".into(),
            appointment_date: "2025-04-02".into(),
            appointment_time: "09:00".into(),
        };
        let valid = update.validate().unwrap();
        assert!(valid.medical_department.is_none());
        assert_eq!(valid.appointment_purpose.as_deref(), Some("Follow-up"));
    }
}
