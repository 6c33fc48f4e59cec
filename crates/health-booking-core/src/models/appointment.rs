//! Appointment model, status lifecycle and slot identity.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::booking::ValidBooking;

/// Appointment lifecycle status.
///
/// `Pending` is the only mutable state; `Completed` and `Cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Canonical lowercase name, as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unique bookable unit: one doctor at one date and time.
///
/// At most one non-cancelled appointment may occupy a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// A booked appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_id: String,
    /// Patient name as entered on the booking form
    pub full_name: String,
    /// Contact email as entered on the booking form
    pub email: String,
    pub phone_number: Option<String>,
    pub medical_department: Option<String>,
    pub appointment_purpose: Option<String>,
    #[serde(with = "wire_date")]
    pub appointment_date: NaiveDate,
    #[serde(with = "wire_time")]
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Appointment {
    /// Create a pending appointment from a validated booking.
    pub fn new(booking: ValidBooking) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            doctor_id: booking.doctor_id,
            patient_id: booking.patient_id,
            full_name: booking.full_name,
            email: booking.email,
            phone_number: booking.phone_number,
            medical_department: booking.medical_department,
            appointment_purpose: booking.appointment_purpose,
            appointment_date: booking.date,
            appointment_time: booking.time,
            status: AppointmentStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// The slot this appointment occupies.
    pub fn slot(&self) -> Slot {
        Slot {
            doctor_id: self.doctor_id.clone(),
            date: self.appointment_date,
            time: self.appointment_time,
        }
    }

    /// Whether this appointment counts toward the upcoming list.
    pub fn is_upcoming(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }
}

/// Parse a wire date. Accepts `YYYY-MM-DD` and datetime strings with a
/// leading date component, which some backends return for date columns.
pub fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.split('T').next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse a wire time. Accepts `HH:MM` (what a time input submits) and
/// `HH:MM:SS`.
pub fn parse_wire_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Format a time the way the booking form submits it.
pub fn format_wire_time(t: &NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

mod wire_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid appointment date: {}", raw)))
    }
}

mod wire_time {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_wire_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid appointment time: {}", raw)))
    }
}
