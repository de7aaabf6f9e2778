use assert_matches::assert_matches;
use axum::http::StatusCode;

use patient_cell::{patient_routes, DashboardForm, PatientService};
use shared_database::queries;
use shared_models::{AppError, AppointmentStatus};
use shared_utils::test_utils::{
    count_rows, form_request, get_request, json_body, notice, redirect_path, seed_appointment,
    seed_doctor, seed_patient, seed_schedule, send, session_cookie_for, TestConfig, TEST_PASSWORD,
};

// 2036-01-07 is a Monday, far enough ahead to stay bookable.
const MONDAY_SLOT: &str = "start_time=2036-01-07T09:00&end_time=2036-01-07T09:30";

#[tokio::test]
async fn test_dashboard_shows_bookable_doctors_with_schedules() {
    let state = TestConfig::default().to_state().await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    let (_, house) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (_, wilson) = seed_doctor(&state, "James Wilson", "Oncology").await;
    seed_schedule(&state, house.id, "Monday", "09:00", "12:00").await;
    seed_schedule(&state, house.id, "Thursday", "09:00", "12:00").await;
    sqlx::query("UPDATE doctors SET is_blacklisted = 1 WHERE id = ?")
        .bind(wilson.id)
        .execute(state.db.pool())
        .await
        .unwrap();
    seed_appointment(
        &state,
        patient.id,
        house.id,
        "2036-01-07T09:00",
        "2036-01-07T09:30",
        AppointmentStatus::Booked,
    )
    .await;
    let cookie = session_cookie_for(&state, &user);

    let response = send(patient_routes(state), get_request("/patient-dashboard", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["patient"]["full_name"], "Ann Lee");
    let doctors = body["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["full_name"], "Greg House");
    assert_eq!(doctors[0]["schedules"].as_array().unwrap().len(), 2);
    let appointments = body["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["doctor_name"], "Greg House");
    assert_eq!(appointments[0]["department"], "Diagnostics");
}

#[tokio::test]
async fn test_book_then_cancel_through_dashboard() {
    let state = TestConfig::default().to_state().await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    seed_schedule(&state, doctor.id, "Monday", "09:00", "12:00").await;
    let cookie = session_cookie_for(&state, &user);
    let app = patient_routes(state.clone());

    let body = format!("action=book&doctor_id={}&{}", doctor.id, MONDAY_SLOT);
    let response = send(app.clone(), form_request("/patient-dashboard", Some(&cookie), &body)).await;
    assert_eq!(redirect_path(&response), "/patient-dashboard");
    assert_eq!(notice(&response).as_deref(), Some("Appointment booked successfully."));

    let appointment_id: i64 = sqlx::query_scalar("SELECT id FROM appointments WHERE patient_id = ?")
        .bind(patient.id)
        .fetch_one(state.db.pool())
        .await
        .unwrap();

    let response = send(app.clone(), form_request("/patient-dashboard", Some(&cookie), &body)).await;
    assert_eq!(
        notice(&response).as_deref(),
        Some("The doctor already has an appointment at that time.")
    );
    assert_eq!(count_rows(&state, "appointments").await, 1);

    let body = format!("action=cancel&appointment_id={}", appointment_id);
    let response = send(app, form_request("/patient-dashboard", Some(&cookie), &body)).await;
    assert_eq!(notice(&response).as_deref(), Some("Appointment canceled successfully."));

    let stored = queries::find_appointment(state.db.pool(), appointment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, AppointmentStatus::Canceled);
}

#[tokio::test]
async fn test_dashboard_form_validation() {
    let state = TestConfig::default().to_state().await;
    let (user, _) = seed_patient(&state, "Ann Lee").await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let cookie = session_cookie_for(&state, &user);
    let app = patient_routes(state.clone());

    let body = format!("action=book&doctor_id={}&start_time=tomorrow&end_time=later", doctor.id);
    let response = send(app.clone(), form_request("/patient-dashboard", Some(&cookie), &body)).await;
    assert_eq!(
        notice(&response).as_deref(),
        Some("Invalid date/time format. Use YYYY-MM-DDTHH:MM.")
    );

    let response = send(app.clone(), form_request("/patient-dashboard", Some(&cookie), "action=book")).await;
    assert_eq!(
        notice(&response).as_deref(),
        Some("Doctor, start time and end time are required.")
    );

    let response = send(app, form_request("/patient-dashboard", Some(&cookie), "action=reschedule")).await;
    assert_eq!(notice(&response).as_deref(), Some("Unknown action."));

    assert_eq!(count_rows(&state, "appointments").await, 0);
}

#[tokio::test]
async fn test_cannot_cancel_someone_elses_appointment() {
    let state = TestConfig::default().to_state().await;
    let (user, _) = seed_patient(&state, "Ann Lee").await;
    let (_, other) = seed_patient(&state, "Bo Chen").await;
    let (_, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let id = seed_appointment(
        &state,
        other.id,
        doctor.id,
        "2036-01-07T09:00",
        "2036-01-07T09:30",
        AppointmentStatus::Booked,
    )
    .await;
    let cookie = session_cookie_for(&state, &user);

    let body = format!("action=cancel&appointment_id={}", id);
    let response = send(
        patient_routes(state.clone()),
        form_request("/patient-dashboard", Some(&cookie), &body),
    )
    .await;

    assert_eq!(notice(&response).as_deref(), Some("You can only cancel your own appointments."));
    let stored = queries::find_appointment(state.db.pool(), id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Booked);
}

#[tokio::test]
async fn test_profile_update_and_view() {
    let state = TestConfig::default().to_state().await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    let cookie = session_cookie_for(&state, &user);
    let app = patient_routes(state.clone());

    let body = format!(
        "full_name=Ann+Leigh&email=leigh%40example.com&contact_number=555-0200\
         &date_of_birth=1991-02-03&medical_history_summary=Asthma\
         &current_password={}&new_password=fresh-pw&confirm_password=fresh-pw",
        TEST_PASSWORD
    );
    let response = send(app.clone(), form_request("/patient-profile", Some(&cookie), &body)).await;
    assert_eq!(redirect_path(&response), "/patient-profile");
    assert_eq!(notice(&response).as_deref(), Some("Profile updated successfully."));

    let stored = queries::find_patient(state.db.pool(), patient.id).await.unwrap().unwrap();
    assert_eq!(stored.contact_number.as_deref(), Some("555-0200"));
    assert_eq!(stored.medical_history_summary.as_deref(), Some("Asthma"));
    let stored_user = queries::find_user(state.db.pool(), user.id).await.unwrap().unwrap();
    assert!(shared_utils::password::verify_password("fresh-pw", &stored_user.password_hash));

    let response = send(app, get_request("/patient-profile", Some(&cookie))).await;
    let body = json_body(response).await;
    assert_eq!(body["full_name"], "Ann Leigh");
    assert_eq!(body["email"], "leigh@example.com");
    assert_eq!(body["date_of_birth"], "1991-02-03");
}

#[tokio::test]
async fn test_profile_rejects_mismatched_new_password() {
    let state = TestConfig::default().to_state().await;
    let (user, patient) = seed_patient(&state, "Ann Lee").await;
    let cookie = session_cookie_for(&state, &user);

    let body = format!(
        "full_name=Ann+Leigh&contact_number=555-0200&current_password={}\
         &new_password=fresh-pw&confirm_password=other-pw",
        TEST_PASSWORD
    );
    let response = send(
        patient_routes(state.clone()),
        form_request("/patient-profile", Some(&cookie), &body),
    )
    .await;

    assert_eq!(notice(&response).as_deref(), Some("New passwords do not match."));
    let stored_user = queries::find_user(state.db.pool(), user.id).await.unwrap().unwrap();
    assert_eq!(stored_user.full_name, "Ann Lee");
    let stored = queries::find_patient(state.db.pool(), patient.id).await.unwrap().unwrap();
    assert_eq!(stored.contact_number.as_deref(), Some("555-0100"));
}

#[tokio::test]
async fn test_guard_sends_visitors_to_patient_login() {
    let state = TestConfig::default().to_state().await;
    let (doctor_user, _) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let app = patient_routes(state.clone());

    let response = send(app.clone(), get_request("/patient-dashboard", None)).await;
    assert_eq!(redirect_path(&response), "/patient-login");
    assert_eq!(notice(&response).as_deref(), Some("Please log in to access this page."));

    let cookie = session_cookie_for(&state, &doctor_user);
    let response = send(app, get_request("/patient-profile", Some(&cookie))).await;
    assert_eq!(redirect_path(&response), "/patient-login");
    assert_eq!(
        notice(&response).as_deref(),
        Some("You do not have permission to access this page.")
    );
}

#[tokio::test]
async fn test_removed_account_loses_access() {
    let state = TestConfig::default().to_state().await;
    let (user, _) = seed_patient(&state, "Ann Lee").await;
    let cookie = session_cookie_for(&state, &user);
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user.id)
        .execute(state.db.pool())
        .await
        .unwrap();

    let response = send(patient_routes(state), get_request("/patient-dashboard", Some(&cookie))).await;
    assert_eq!(redirect_path(&response), "/patient-login");
}

#[tokio::test]
async fn test_perform_requires_booking_fields() {
    let state = TestConfig::default().to_state().await;
    let (user, _) = seed_patient(&state, "Ann Lee").await;
    let service = PatientService::new(&state.db);

    let form = DashboardForm {
        action: Some("book".to_string()),
        start_time: Some("2036-01-07T09:00".to_string()),
        ..DashboardForm::default()
    };
    assert_matches!(
        service.perform(user.id, &form).await,
        Err(AppError::ValidationError(msg)) if msg == "Doctor, start time and end time are required."
    );

    let form = DashboardForm {
        action: Some("reschedule".to_string()),
        ..DashboardForm::default()
    };
    assert_matches!(service.perform(user.id, &form).await, Err(AppError::ValidationError(_)));
    assert_eq!(count_rows(&state, "appointments").await, 0);
}
