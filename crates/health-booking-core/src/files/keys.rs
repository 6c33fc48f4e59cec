//! Role-scoped storage keys.
//!
//! Keys are built from caller data (uids, uploaded file names), so every
//! component is checked against path traversal before it touches a path.

use crate::models::Role;

use super::{FileError, FileResult};

/// Storage prefix for medical reports, keyed by patient.
pub const REPORTS_FOLDER: &str = "reports";

/// Key for a profile photo: `patients/{uid}/<file>` or
/// `doctors/{uid}/<file>`.
pub fn photo_key(role: Role, uid: &str, file_name: &str) -> FileResult<String> {
    let folder = role
        .storage_folder()
        .ok_or_else(|| FileError::InvalidKey("no storage folder for unknown role".into()))?;
    join_key(folder, uid, file_name)
}

/// Key for a medical report: `reports/{patientId}/<file>`.
pub fn report_key(patient_id: &str, file_name: &str) -> FileResult<String> {
    join_key(REPORTS_FOLDER, patient_id, file_name)
}

/// Listing prefix for a user's photos.
pub fn photo_prefix(role: Role, uid: &str) -> FileResult<String> {
    let folder = role
        .storage_folder()
        .ok_or_else(|| FileError::InvalidKey("no storage folder for unknown role".into()))?;
    validate_component(uid)?;
    Ok(format!("{}/{}", folder, uid))
}

/// Listing prefix for a patient's reports.
pub fn report_prefix(patient_id: &str) -> FileResult<String> {
    validate_component(patient_id)?;
    Ok(format!("{}/{}", REPORTS_FOLDER, patient_id))
}

fn join_key(folder: &str, owner: &str, file_name: &str) -> FileResult<String> {
    validate_component(owner)?;
    validate_component(file_name)?;
    Ok(format!("{}/{}/{}", folder, owner, file_name))
}

/// A key component must be a single, plain path segment.
fn validate_component(component: &str) -> FileResult<()> {
    if component.is_empty() {
        return Err(FileError::InvalidKey("empty key component".into()));
    }
    if component.contains('/') || component.contains('\\') {
        return Err(FileError::InvalidKey(format!(
            "path separator in key component: {}",
            component
        )));
    }
    if component == "." || component == ".." {
        return Err(FileError::InvalidKey(format!(
            "relative key component: {}",
            component
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_keys_are_role_scoped() {
        assert_eq!(
            photo_key(Role::Patient, "uid-1", "me.jpg").unwrap(),
            "patients/uid-1/me.jpg"
        );
        assert_eq!(
            photo_key(Role::Doctor, "uid-2", "portrait.png").unwrap(),
            "doctors/uid-2/portrait.png"
        );
        assert!(photo_key(Role::Unknown, "uid-3", "x.jpg").is_err());
    }

    #[test]
    fn test_report_key() {
        assert_eq!(
            report_key("pat-1", "bloodwork.pdf").unwrap(),
            "reports/pat-1/bloodwork.pdf"
        );
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(photo_prefix(Role::Doctor, "uid-2").unwrap(), "doctors/uid-2");
        assert_eq!(report_prefix("pat-1").unwrap(), "reports/pat-1");
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(report_key("pat-1", "../secrets.pdf").is_err());
        assert!(report_key("..", "report.pdf").is_err());
        assert!(report_key("pat-1", "a/b.pdf").is_err());
        assert!(report_key("pat-1", "a\\b.pdf").is_err());
        assert!(report_key("pat-1", "").is_err());
        assert!(photo_prefix(Role::Patient, "../..").is_err());
    }
}
