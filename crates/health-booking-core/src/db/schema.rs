//! SQLite schema definition.

/// Complete database schema for health-booking.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- User Accounts
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    uid TEXT PRIMARY KEY,                        -- identity provider subject id
    email TEXT NOT NULL,
    full_name TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('patient', 'doctor')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

-- ============================================================================
-- Profiles
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctor_profiles (
    firebase_uid TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    specialty TEXT NOT NULL,
    qualification TEXT,
    experience_years INTEGER NOT NULL DEFAULT 0,
    office_hours TEXT,
    languages_spoken TEXT,
    email TEXT NOT NULL,
    photo_url TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS patient_profiles (
    firebase_uid TEXT PRIMARY KEY,
    gender TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    doctor_id TEXT NOT NULL,
    patient_id TEXT NOT NULL,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone_number TEXT,
    medical_department TEXT,
    appointment_purpose TEXT,
    appointment_date TEXT NOT NULL,              -- YYYY-MM-DD
    appointment_time TEXT NOT NULL,              -- HH:MM
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'completed', 'cancelled')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- A slot (doctor, date, time) holds at most one non-cancelled appointment.
-- The booking engine checks this before inserting; the index is the backstop.
CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_slot
    ON appointments(doctor_id, appointment_date, appointment_time)
    WHERE status != 'cancelled';

CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id);
CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);
"#;
