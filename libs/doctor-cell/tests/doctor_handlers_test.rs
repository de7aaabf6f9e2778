use axum::http::StatusCode;

use doctor_cell::doctor_routes;
use shared_database::queries;
use shared_models::AppointmentStatus;
use shared_utils::test_utils::{
    form_request, get_request, json_body, notice, redirect_path, seed_appointment, seed_doctor,
    seed_patient, seed_schedule, send, session_cookie_for, TestConfig, TEST_PASSWORD,
};

#[tokio::test]
async fn test_dashboard_lists_own_schedules_and_appointments() {
    let state = TestConfig::default().to_state().await;
    let (house_user, house) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (_, wilson) = seed_doctor(&state, "James Wilson", "Oncology").await;
    let (_, patient) = seed_patient(&state, "Ann Lee").await;
    seed_schedule(&state, house.id, "Friday", "09:00", "12:00").await;
    seed_schedule(&state, wilson.id, "Friday", "09:00", "12:00").await;
    seed_appointment(
        &state,
        patient.id,
        house.id,
        "2030-01-04T09:00",
        "2030-01-04T09:30",
        AppointmentStatus::Booked,
    )
    .await;

    let cookie = session_cookie_for(&state, &house_user);
    let response = send(doctor_routes(state), get_request("/doctor-dashboard", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["doctor"]["full_name"], "Greg House");
    assert_eq!(body["doctor"]["department"], "Diagnostics");
    assert_eq!(body["schedules"].as_array().unwrap().len(), 1);
    let appointments = body["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["patient_name"], "Ann Lee");
    assert_eq!(appointments[0]["status"], "Booked");
}

#[tokio::test]
async fn test_record_treatment_completes_appointment() {
    let state = TestConfig::default().to_state().await;
    let (user, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (_, patient) = seed_patient(&state, "Ann Lee").await;
    let appointment = seed_appointment(
        &state,
        patient.id,
        doctor.id,
        "2030-01-04T09:00",
        "2030-01-04T09:30",
        AppointmentStatus::Confirmed,
    )
    .await;
    let cookie = session_cookie_for(&state, &user);
    let app = doctor_routes(state.clone());
    let uri = format!("/record-treatment/{}", appointment);

    let response = send(
        app.clone(),
        form_request(&uri, Some(&cookie), "diagnosis=Sarcoidosis&prescription=Steroids"),
    )
    .await;
    assert_eq!(redirect_path(&response), "/doctor-dashboard");
    assert_eq!(notice(&response).as_deref(), Some("Treatment recorded successfully."));

    let stored = queries::find_appointment(state.db.pool(), appointment)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, AppointmentStatus::Completed);

    let response = send(
        app,
        form_request(&uri, Some(&cookie), "diagnosis=Lupus&prescription=Rest&notes=Revised"),
    )
    .await;
    assert_eq!(notice(&response).as_deref(), Some("Treatment recorded successfully."));

    let treatment = queries::find_treatment_for_appointment(state.db.pool(), appointment)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(treatment.diagnosis, "Lupus");
    assert_eq!(treatment.notes.as_deref(), Some("Revised"));
    assert_eq!(treatment.created_by_doctor_id, doctor.id);
}

#[tokio::test]
async fn test_record_treatment_on_foreign_or_canceled_appointment() {
    let state = TestConfig::default().to_state().await;
    let (house_user, house) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let (_, wilson) = seed_doctor(&state, "James Wilson", "Oncology").await;
    let (_, patient) = seed_patient(&state, "Ann Lee").await;
    let foreign = seed_appointment(
        &state,
        patient.id,
        wilson.id,
        "2030-01-04T09:00",
        "2030-01-04T09:30",
        AppointmentStatus::Booked,
    )
    .await;
    let canceled = seed_appointment(
        &state,
        patient.id,
        house.id,
        "2030-01-05T09:00",
        "2030-01-05T09:30",
        AppointmentStatus::Canceled,
    )
    .await;
    let cookie = session_cookie_for(&state, &house_user);
    let app = doctor_routes(state.clone());
    let body = "diagnosis=Flu&prescription=Fluids";

    let response = send(
        app.clone(),
        form_request(&format!("/record-treatment/{}", foreign), Some(&cookie), body),
    )
    .await;
    assert_eq!(
        notice(&response).as_deref(),
        Some("You can only record treatments for your own appointments.")
    );

    let response = send(
        app,
        form_request(&format!("/record-treatment/{}", canceled), Some(&cookie), body),
    )
    .await;
    assert_eq!(
        notice(&response).as_deref(),
        Some("Cannot record a treatment for a canceled appointment.")
    );

    let stored = queries::find_appointment(state.db.pool(), canceled)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, AppointmentStatus::Canceled);
}

#[tokio::test]
async fn test_profile_update_changes_contact_and_name() {
    let state = TestConfig::default().to_state().await;
    let (user, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let cookie = session_cookie_for(&state, &user);
    let app = doctor_routes(state.clone());

    let body = format!(
        "full_name=Gregory+House&contact_number=555-0001&current_password={}\
         &new_password=vicodin&confirm_password=vicodin",
        TEST_PASSWORD
    );
    let response = send(app.clone(), form_request("/doctor-profile", Some(&cookie), &body)).await;
    assert_eq!(notice(&response).as_deref(), Some("Profile updated successfully."));

    let stored = queries::find_doctor(state.db.pool(), doctor.id).await.unwrap().unwrap();
    assert_eq!(stored.contact_number.as_deref(), Some("555-0001"));

    let response = send(app, get_request("/doctor-profile?notice=Saved&level=success", Some(&cookie))).await;
    let body = json_body(response).await;
    assert_eq!(body["full_name"], "Gregory House");
    assert_eq!(body["notice"], "Saved");
}

#[tokio::test]
async fn test_profile_update_with_wrong_password_changes_nothing() {
    let state = TestConfig::default().to_state().await;
    let (user, doctor) = seed_doctor(&state, "Greg House", "Diagnostics").await;
    let cookie = session_cookie_for(&state, &user);

    let body = "full_name=Gregory+House&contact_number=555-0001&current_password=guess\
        &new_password=vicodin&confirm_password=vicodin";
    let response = send(
        doctor_routes(state.clone()),
        form_request("/doctor-profile", Some(&cookie), body),
    )
    .await;
    assert_eq!(redirect_path(&response), "/doctor-profile");
    assert_eq!(notice(&response).as_deref(), Some("Current password is incorrect."));

    let stored_user = queries::find_user(state.db.pool(), user.id).await.unwrap().unwrap();
    assert_eq!(stored_user.full_name, "Greg House");
    let stored = queries::find_doctor(state.db.pool(), doctor.id).await.unwrap().unwrap();
    assert_eq!(stored.contact_number, doctor.contact_number);
}

#[tokio::test]
async fn test_patient_cannot_open_doctor_dashboard() {
    let state = TestConfig::default().to_state().await;
    let (user, _) = seed_patient(&state, "Ann Lee").await;
    let cookie = session_cookie_for(&state, &user);

    let response = send(doctor_routes(state), get_request("/doctor-dashboard", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(redirect_path(&response), "/doctor-admin-login");
}
