//! Property tests for the partition law and the slot-conflict contract.

use chrono::NaiveDate;
use proptest::prelude::*;

use health_booking_core::booking::{partition, BookingEngine, BookingError};
use health_booking_core::db::Database;
use health_booking_core::models::{Appointment, AppointmentStatus, BookingRequest};

fn today() -> NaiveDate {
    NaiveDate::parse_from_str("2025-02-01", "%Y-%m-%d").unwrap()
}

fn status_strategy() -> impl Strategy<Value = AppointmentStatus> {
    prop_oneof![
        Just(AppointmentStatus::Pending),
        Just(AppointmentStatus::Completed),
        Just(AppointmentStatus::Cancelled),
    ]
}

fn appointment_with_status(status: AppointmentStatus, n: usize) -> Appointment {
    let request = BookingRequest {
        doctor_id: format!("D{}", n % 3),
        patient_id: "P1".into(),
        full_name: "Max Tan".into(),
        email: "max@example.com".into(),
        appointment_date: "2025-03-01".into(),
        appointment_time: format!("{:02}:00", 8 + (n % 10)),
        ..Default::default()
    };
    let mut appointment = Appointment::new(request.validate().unwrap());
    appointment.status = status;
    appointment
}

proptest! {
    /// Every appointment lands in exactly one bucket, decided solely by
    /// its status.
    #[test]
    fn partition_law(statuses in proptest::collection::vec(status_strategy(), 0..40)) {
        let appointments: Vec<Appointment> = statuses
            .iter()
            .enumerate()
            .map(|(n, status)| appointment_with_status(*status, n))
            .collect();
        let total = appointments.len();

        let buckets = partition(appointments);

        prop_assert_eq!(buckets.upcoming.len() + buckets.history.len(), total);
        for appointment in &buckets.upcoming {
            prop_assert_eq!(appointment.status, AppointmentStatus::Pending);
        }
        for appointment in &buckets.history {
            prop_assert!(appointment.status.is_terminal());
        }
    }

    /// For any slot, the first booking succeeds and every further booking
    /// of the same slot is the conflict outcome, leaving one record.
    #[test]
    fn slot_admits_one_booking(hour in 8u8..18, doctor in 0u8..3, extra in 1usize..4) {
        let db = Database::open_in_memory().unwrap();
        let engine = BookingEngine::new(&db);

        let request = |patient: String| BookingRequest {
            doctor_id: format!("D{}", doctor),
            patient_id: patient,
            full_name: "Max Tan".into(),
            email: "max@example.com".into(),
            appointment_date: "2025-03-01".into(),
            appointment_time: format!("{:02}:00", hour),
            ..Default::default()
        };

        engine.book_as_of(&request("P0".into()), today()).unwrap();

        for n in 0..extra {
            let result = engine.book_as_of(&request(format!("P{}", n + 1)), today());
            prop_assert!(matches!(result, Err(BookingError::SlotTaken)));
        }

        let doctor_id = format!("D{}", doctor);
        let buckets = engine.doctor_appointments(&doctor_id).unwrap();
        prop_assert_eq!(buckets.upcoming.len(), 1);
    }

    /// Cancelling repeatedly always converges to the same terminal state.
    #[test]
    fn cancellation_is_idempotent(repeats in 1usize..5) {
        let db = Database::open_in_memory().unwrap();
        let engine = BookingEngine::new(&db);

        let appointment = engine
            .book_as_of(
                &BookingRequest {
                    doctor_id: "D1".into(),
                    patient_id: "P1".into(),
                    full_name: "Max Tan".into(),
                    email: "max@example.com".into(),
                    appointment_date: "2025-03-01".into(),
                    appointment_time: "10:00".into(),
                    ..Default::default()
                },
                today(),
            )
            .unwrap();

        for _ in 0..repeats {
            let result = engine
                .update_status(&appointment.id, AppointmentStatus::Cancelled)
                .unwrap();
            prop_assert_eq!(result.status, AppointmentStatus::Cancelled);
        }

        let buckets = engine.patient_appointments("P1").unwrap();
        prop_assert_eq!(buckets.history.len(), 1);
        prop_assert!(buckets.upcoming.is_empty());
    }
}
