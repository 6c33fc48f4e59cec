//! Appointment database operations.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{
    format_wire_time, parse_wire_date, parse_wire_time, Appointment, AppointmentStatus,
};

impl Database {
    /// Insert a new appointment.
    ///
    /// The partial unique index on (doctor, date, time) rejects a second
    /// non-cancelled appointment in the same slot; that surfaces as
    /// `DbError::Constraint`.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO appointments (
                    id, doctor_id, patient_id, full_name, email, phone_number,
                    medical_department, appointment_purpose, appointment_date,
                    appointment_time, status, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    appointment.id,
                    appointment.doctor_id,
                    appointment.patient_id,
                    appointment.full_name,
                    appointment.email,
                    appointment.phone_number,
                    appointment.medical_department,
                    appointment.appointment_purpose,
                    appointment.appointment_date.format("%Y-%m-%d").to_string(),
                    format_wire_time(&appointment.appointment_time),
                    appointment.status.as_str(),
                    appointment.created_at,
                    appointment.updated_at,
                ],
            )
            .map_err(slot_constraint)?;
        Ok(())
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_APPOINTMENT),
                [id],
                map_appointment_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List appointments booked against a doctor, soonest first.
    pub fn list_appointments_for_doctor(&self, doctor_id: &str) -> DbResult<Vec<Appointment>> {
        self.list_appointments("doctor_id", doctor_id)
    }

    /// List a patient's appointments, soonest first.
    pub fn list_appointments_for_patient(&self, patient_id: &str) -> DbResult<Vec<Appointment>> {
        self.list_appointments("patient_id", patient_id)
    }

    fn list_appointments(&self, column: &str, value: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE {} = ? ORDER BY appointment_date, appointment_time",
            SELECT_APPOINTMENT, column
        ))?;

        let rows = stmt.query_map([value], map_appointment_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// Check whether a slot is held by a non-cancelled appointment.
    /// `exclude` skips one appointment id, for edits that keep their slot.
    pub fn slot_taken(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<&str>,
    ) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*) FROM appointments
            WHERE doctor_id = ?1
              AND appointment_date = ?2
              AND appointment_time = ?3
              AND status != 'cancelled'
              AND id != COALESCE(?4, '')
            "#,
            params![
                doctor_id,
                date.format("%Y-%m-%d").to_string(),
                format_wire_time(&time),
                exclude,
            ],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Overwrite the patient-editable fields of an appointment.
    pub fn update_appointment_fields(
        &self,
        id: &str,
        department: Option<&str>,
        purpose: Option<&str>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE appointments SET
                    medical_department = ?2,
                    appointment_purpose = ?3,
                    appointment_date = ?4,
                    appointment_time = ?5,
                    updated_at = datetime('now')
                WHERE id = ?1
                "#,
                params![
                    id,
                    department,
                    purpose,
                    date.format("%Y-%m-%d").to_string(),
                    format_wire_time(&time),
                ],
            )
            .map_err(slot_constraint)?;
        Ok(rows_affected > 0)
    }

    /// Set only the status field.
    pub fn set_appointment_status(&self, id: &str, status: AppointmentStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET status = ?, updated_at = datetime('now') WHERE id = ?",
            params![status.as_str(), id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Hard delete an appointment, any state.
    pub fn delete_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

const SELECT_APPOINTMENT: &str = r#"
    SELECT id, doctor_id, patient_id, full_name, email, phone_number,
           medical_department, appointment_purpose, appointment_date,
           appointment_time, status, created_at, updated_at
    FROM appointments
"#;

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    doctor_id: String,
    patient_id: String,
    full_name: String,
    email: String,
    phone_number: Option<String>,
    medical_department: Option<String>,
    appointment_purpose: Option<String>,
    appointment_date: String,
    appointment_time: String,
    status: String,
    created_at: String,
    updated_at: String,
}

fn map_appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        patient_id: row.get(2)?,
        full_name: row.get(3)?,
        email: row.get(4)?,
        phone_number: row.get(5)?,
        medical_department: row.get(6)?,
        appointment_purpose: row.get(7)?,
        appointment_date: row.get(8)?,
        appointment_time: row.get(9)?,
        status: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let appointment_date = parse_wire_date(&row.appointment_date).ok_or_else(|| {
            DbError::Constraint(format!("Bad appointment date: {}", row.appointment_date))
        })?;
        let appointment_time = parse_wire_time(&row.appointment_time).ok_or_else(|| {
            DbError::Constraint(format!("Bad appointment time: {}", row.appointment_time))
        })?;
        let status = AppointmentStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown appointment status: {}", row.status)))?;

        Ok(Appointment {
            id: row.id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            medical_department: row.medical_department,
            appointment_purpose: row.appointment_purpose,
            appointment_date,
            appointment_time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn slot_constraint(e: rusqlite::Error) -> DbError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint("appointment slot already booked".into())
        }
        _ => DbError::Sqlite(e),
    }
}
