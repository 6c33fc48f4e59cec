//! Doctor and patient profile models.

use serde::{Deserialize, Serialize};

/// Medical departments offered for booking and doctor specialties.
pub const MEDICAL_DEPARTMENTS: [&str; 18] = [
    "Allergy and Immunology",
    "Andrology",
    "Cardiology",
    "Dentistry",
    "Dermatology",
    "Endocrinology",
    "Gastroenterology / Hepatology",
    "General Medicine/Internal Medicine",
    "General Surgery",
    "Hematology / Pathology",
    "Infectious Diseases",
    "Neurology",
    "Obstetrics and Gynecology (OB/GYN)",
    "Oncology",
    "Otolaryngology (ENT)",
    "Pediatrics",
    "Psychiatry",
    "Radiology",
];

/// Check whether a department name is one of the offered departments.
pub fn is_known_department(name: &str) -> bool {
    MEDICAL_DEPARTMENTS.contains(&name)
}

/// A doctor's public profile, one per doctor account.
///
/// Absence of a profile is the normal "not yet completed" state, not an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorProfile {
    /// Account uid this profile belongs to
    pub firebase_uid: String,
    /// Display name
    pub full_name: String,
    /// One of [`MEDICAL_DEPARTMENTS`]
    pub specialty: String,
    pub qualification: Option<String>,
    #[serde(default)]
    pub experience_years: u32,
    pub office_hours: Option<String>,
    pub languages_spoken: Option<String>,
    /// Contact email shown on the doctor card
    pub email: String,
    /// Durable URL of the current profile photo, if any
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl DoctorProfile {
    /// Create a profile with required fields; details are filled in later.
    pub fn new(firebase_uid: String, full_name: String, specialty: String, email: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            firebase_uid,
            full_name,
            specialty,
            qualification: None,
            experience_years: 0,
            office_hours: None,
            languages_spoken: None,
            email,
            photo_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A patient's profile, one per patient account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    /// Account uid this profile belongs to
    pub firebase_uid: String,
    pub gender: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl PatientProfile {
    pub fn new(firebase_uid: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            firebase_uid,
            gender: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
