//! Doctor and patient profile database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{DoctorProfile, PatientProfile};

impl Database {
    /// Insert or update a doctor profile (the profile form is an upsert).
    pub fn upsert_doctor_profile(&self, profile: &DoctorProfile) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO doctor_profiles (
                firebase_uid, full_name, specialty, qualification, experience_years,
                office_hours, languages_spoken, email, photo_url, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))
            ON CONFLICT(firebase_uid) DO UPDATE SET
                full_name = excluded.full_name,
                specialty = excluded.specialty,
                qualification = excluded.qualification,
                experience_years = excluded.experience_years,
                office_hours = excluded.office_hours,
                languages_spoken = excluded.languages_spoken,
                email = excluded.email,
                photo_url = excluded.photo_url,
                updated_at = datetime('now')
            "#,
            params![
                profile.firebase_uid,
                profile.full_name,
                profile.specialty,
                profile.qualification,
                profile.experience_years,
                profile.office_hours,
                profile.languages_spoken,
                profile.email,
                profile.photo_url,
            ],
        )?;
        Ok(())
    }

    /// Get a doctor profile by account uid. Absence is the normal
    /// "not yet completed" state.
    pub fn get_doctor_profile(&self, uid: &str) -> DbResult<Option<DoctorProfile>> {
        self.conn
            .query_row(
                &format!("{} WHERE firebase_uid = ?", SELECT_DOCTOR),
                [uid],
                map_doctor_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all doctor profiles, ordered by name.
    pub fn list_doctors(&self) -> DbResult<Vec<DoctorProfile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY full_name", SELECT_DOCTOR))?;
        let rows = stmt.query_map([], map_doctor_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Record the durable URL of a doctor's current profile photo.
    pub fn update_doctor_photo_url(&self, uid: &str, photo_url: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE doctor_profiles SET photo_url = ?, updated_at = datetime('now') WHERE firebase_uid = ?",
            [photo_url, uid],
        )?;
        Ok(rows_affected > 0)
    }

    /// Insert or update a patient profile.
    pub fn upsert_patient_profile(&self, profile: &PatientProfile) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patient_profiles (firebase_uid, gender, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(firebase_uid) DO UPDATE SET
                gender = excluded.gender,
                updated_at = datetime('now')
            "#,
            params![profile.firebase_uid, profile.gender],
        )?;
        Ok(())
    }

    /// Get a patient profile by account uid.
    pub fn get_patient_profile(&self, uid: &str) -> DbResult<Option<PatientProfile>> {
        self.conn
            .query_row(
                r#"
                SELECT firebase_uid, gender, created_at, updated_at
                FROM patient_profiles
                WHERE firebase_uid = ?
                "#,
                [uid],
                |row| {
                    Ok(PatientProfile {
                        firebase_uid: row.get(0)?,
                        gender: row.get(1)?,
                        created_at: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}

const SELECT_DOCTOR: &str = r#"
    SELECT firebase_uid, full_name, specialty, qualification, experience_years,
           office_hours, languages_spoken, email, photo_url, created_at, updated_at
    FROM doctor_profiles
"#;

fn map_doctor_row(row: &Row<'_>) -> rusqlite::Result<DoctorProfile> {
    Ok(DoctorProfile {
        firebase_uid: row.get(0)?,
        full_name: row.get(1)?,
        specialty: row.get(2)?,
        qualification: row.get(3)?,
        experience_years: row.get(4)?,
        office_hours: row.get(5)?,
        languages_spoken: row.get(6)?,
        email: row.get(7)?,
        photo_url: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
