use assert_matches::assert_matches;
use chrono::NaiveDateTime;

use appointment_cell::{BookingRequest, BookingService};
use shared_database::queries;
use shared_models::{AppError, AppointmentStatus};
use shared_utils::test_utils::{
    count_rows, seed_appointment, seed_doctor, seed_patient, seed_schedule, TestConfig,
};

fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").unwrap()
}

fn request(doctor_id: i64, start: &str, end: &str) -> BookingRequest {
    BookingRequest {
        doctor_id,
        start_time: at(start),
        end_time: at(end),
    }
}

fn now() -> NaiveDateTime {
    at("2030-01-01T08:00")
}

#[tokio::test]
async fn test_booking_inside_schedule_succeeds() {
    let state = TestConfig::default().to_state().await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    seed_schedule(&state, doctor.id, "Monday", "09:00", "12:00").await;

    let appointment = BookingService::new(&state.db)
        .book_at(user.id, request(doctor.id, "2030-01-07T09:00", "2030-01-07T09:30"), now())
        .await
        .unwrap();

    assert_eq!(appointment.patient_id, patient.id);
    assert_eq!(appointment.status, AppointmentStatus::Booked);
}

#[tokio::test]
async fn test_overlapping_booking_is_a_conflict() {
    let state = TestConfig::default().to_state().await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (_, other) = seed_patient(&state, "Bo Chen").await;
    let (user, _) = seed_patient(&state, "Ann Lee").await;
    seed_schedule(&state, doctor.id, "Monday", "09:00", "12:00").await;
    seed_appointment(
        &state,
        other.id,
        doctor.id,
        "2030-01-07T09:00",
        "2030-01-07T10:00",
        AppointmentStatus::Confirmed,
    )
    .await;
    let service = BookingService::new(&state.db);

    let result = service
        .book_at(user.id, request(doctor.id, "2030-01-07T09:30", "2030-01-07T10:30"), now())
        .await;
    assert_matches!(result, Err(AppError::Conflict(msg)) if msg == "The doctor already has an appointment at that time.");

    // back-to-back is fine
    assert!(service
        .book_at(user.id, request(doctor.id, "2030-01-07T10:00", "2030-01-07T10:30"), now())
        .await
        .is_ok());
    assert_eq!(count_rows(&state, "appointments").await, 2);
}

#[tokio::test]
async fn test_canceled_appointments_free_the_slot() {
    let state = TestConfig::default().to_state().await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    seed_schedule(&state, doctor.id, "Monday", "09:00", "12:00").await;
    seed_appointment(
        &state,
        patient.id,
        doctor.id,
        "2030-01-07T09:00",
        "2030-01-07T10:00",
        AppointmentStatus::Canceled,
    )
    .await;

    let result = BookingService::new(&state.db)
        .book_at(user.id, request(doctor.id, "2030-01-07T09:00", "2030-01-07T10:00"), now())
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_booking_rejections() {
    let state = TestConfig::default().to_state().await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (user, _) = seed_patient(&state, "Ann Lee").await;
    seed_schedule(&state, doctor.id, "Monday", "09:00", "12:00").await;
    let service = BookingService::new(&state.db);

    let past = service
        .book_at(user.id, request(doctor.id, "2029-12-31T09:00", "2029-12-31T09:30"), now())
        .await;
    assert_matches!(past, Err(AppError::ValidationError(_)));

    let reversed = service
        .book_at(user.id, request(doctor.id, "2030-01-07T10:00", "2030-01-07T09:00"), now())
        .await;
    assert_matches!(reversed, Err(AppError::ValidationError(msg)) if msg == "End time must be after start time.");

    let off_schedule = service
        .book_at(user.id, request(doctor.id, "2030-01-08T09:00", "2030-01-08T09:30"), now())
        .await;
    assert_matches!(off_schedule, Err(AppError::ValidationError(msg)) if msg == "The selected time is outside the doctor's schedule.");

    let unknown = service
        .book_at(user.id, request(999, "2030-01-07T09:00", "2030-01-07T09:30"), now())
        .await;
    assert_matches!(unknown, Err(AppError::NotFound(_)));

    assert_eq!(count_rows(&state, "appointments").await, 0);
}

#[tokio::test]
async fn test_blacklisted_parties_cannot_book() {
    let state = TestConfig::default().to_state().await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    seed_schedule(&state, doctor.id, "Monday", "09:00", "12:00").await;
    let service = BookingService::new(&state.db);
    let slot = request(doctor.id, "2030-01-07T09:00", "2030-01-07T09:30");

    sqlx::query("UPDATE doctors SET is_blacklisted = 1 WHERE id = ?")
        .bind(doctor.id)
        .execute(state.db.pool())
        .await
        .unwrap();
    assert_matches!(service.book_at(user.id, slot, now()).await, Err(AppError::ValidationError(_)));

    sqlx::query("UPDATE doctors SET is_blacklisted = 0 WHERE id = ?")
        .bind(doctor.id)
        .execute(state.db.pool())
        .await
        .unwrap();
    sqlx::query("UPDATE patients SET is_blacklisted = 1 WHERE id = ?")
        .bind(patient.id)
        .execute(state.db.pool())
        .await
        .unwrap();
    assert_matches!(service.book_at(user.id, slot, now()).await, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_cancel_rules() {
    let state = TestConfig::default().to_state().await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    let (other_user, _) = seed_patient(&state, "Bo Chen").await;
    let booked = seed_appointment(
        &state,
        patient.id,
        doctor.id,
        "2030-01-07T09:00",
        "2030-01-07T09:30",
        AppointmentStatus::Booked,
    )
    .await;
    let completed = seed_appointment(
        &state,
        patient.id,
        doctor.id,
        "2030-01-07T10:00",
        "2030-01-07T10:30",
        AppointmentStatus::Completed,
    )
    .await;
    let service = BookingService::new(&state.db);

    assert_matches!(service.cancel(other_user.id, booked).await, Err(AppError::Forbidden(_)));
    assert_matches!(
        service.cancel(user.id, completed).await,
        Err(AppError::ValidationError(msg)) if msg == "Completed appointments cannot be canceled."
    );

    service.cancel(user.id, booked).await.unwrap();
    let stored = queries::find_appointment(state.db.pool(), booked).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Canceled);
    assert!(service.cancel(user.id, booked).await.is_ok());
}
