use dealership::auth::jwt::UserRole;
use dealership::models::VehicleStatus;
use uuid::Uuid;

use crate::helpers::TestApp;

async fn place_deposit_with_pickup(app: &TestApp, token: &str, vehicle_id: Uuid, pickup: serde_json::Value) -> Uuid{
    let body = serde_json::json!({
        "vehicle_id": vehicle_id,
        "quantity": 1,
        "percentage": 0.2,
        "pickup": pickup
    });

    let response = app.api_client
        .post(format!("{}/user/deposit", app.get_app_url()))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to deposit endpoint");
    assert_eq!(response.status().as_u16(), 200);

    let deposit: serde_json::Value = response.json().await.unwrap();
    serde_json::from_value(deposit["deposit_id"].clone()).unwrap()
}

async fn get_appointments(app: &TestApp, token: &str, deposit_id: Uuid) -> Vec<serde_json::Value>{
    app.api_client
        .get(format!("{}/user/appointment?deposit_id={}", app.get_app_url(), deposit_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request to appointment endpoint")
        .json()
        .await
        .expect("Appointment list was not valid json")
}

#[actix_web::test]
async fn pickup_requested_at_deposit_time_is_stored(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let deposit_id = place_deposit_with_pickup(&app, &token, vehicle_id, serde_json::json!({
        "scheduled_at": "2026-09-01T09:00:00Z",
        "location": "Showroom Hà Nội"
    })).await;

    let appointments = get_appointments(&app, &token, deposit_id).await;
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["location"], "Showroom Hà Nội");
}

#[actix_web::test]
async fn appointment_can_be_added_after_the_deposit(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let deposit_id = place_deposit_with_pickup(&app, &token, vehicle_id, serde_json::Value::Null).await;

    let body = serde_json::json!({
        "deposit_id": deposit_id,
        "scheduled_at": "2026-09-02T14:30:00Z",
        "location": "Showroom Đà Nẵng"
    });

    let response = app.api_client
        .post(format!("{}/user/appointment", app.get_app_url()))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to appointment endpoint");
    assert_eq!(response.status().as_u16(), 200);

    let appointments = get_appointments(&app, &token, deposit_id).await;
    assert_eq!(appointments.len(), 1);
}

#[actix_web::test]
async fn listing_is_scoped_to_the_deposit_owner(){
    let app = TestApp::spawn_app().await;
    let (_, owner_token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let (_, other_token) = app.create_user_and_login("minh.ngo@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let deposit_id = place_deposit_with_pickup(&app, &owner_token, vehicle_id, serde_json::json!({
        "scheduled_at": "2026-09-01T09:00:00Z",
        "location": "Showroom Hà Nội"
    })).await;

    let own = get_appointments(&app, &owner_token, deposit_id).await;
    assert_eq!(own.len(), 1);

    let foreign = get_appointments(&app, &other_token, deposit_id).await;
    assert!(foreign.is_empty());
}

#[actix_web::test]
async fn scheduling_against_someone_elses_deposit_returns_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, owner_token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let (_, other_token) = app.create_user_and_login("minh.ngo@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let deposit_id = place_deposit_with_pickup(&app, &owner_token, vehicle_id, serde_json::Value::Null).await;

    let body = serde_json::json!({
        "deposit_id": deposit_id,
        "scheduled_at": "2026-09-02T14:30:00Z",
        "location": "Showroom Đà Nẵng"
    });

    let response = app.api_client
        .post(format!("{}/user/appointment", app.get_app_url()))
        .bearer_auth(&other_token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to appointment endpoint");
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn appointment_can_be_rescheduled(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let deposit_id = place_deposit_with_pickup(&app, &token, vehicle_id, serde_json::json!({
        "scheduled_at": "2026-09-01T09:00:00Z",
        "location": "Showroom Hà Nội"
    })).await;

    let appointments = get_appointments(&app, &token, deposit_id).await;
    let appointment_id: Uuid = serde_json::from_value(appointments[0]["appointment_id"].clone()).unwrap();

    let body = serde_json::json!({
        "appointment_id": appointment_id,
        "scheduled_at": "2026-09-05T10:00:00Z",
        "location": "Showroom Sài Gòn"
    });

    let response = app.api_client
        .put(format!("{}/user/appointment", app.get_app_url()))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to appointment endpoint");
    assert_eq!(response.status().as_u16(), 200);

    let appointments = get_appointments(&app, &token, deposit_id).await;
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["location"], "Showroom Sài Gòn");
}

#[actix_web::test]
async fn rescheduling_an_unknown_appointment_returns_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;

    let body = serde_json::json!({
        "appointment_id": Uuid::new_v4(),
        "scheduled_at": "2026-09-05T10:00:00Z",
        "location": "Showroom Sài Gòn"
    });

    let response = app.api_client
        .put(format!("{}/user/appointment", app.get_app_url()))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to appointment endpoint");
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn malformed_schedule_date_is_rejected(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;

    let body = serde_json::json!({
        "deposit_id": Uuid::new_v4(),
        "scheduled_at": "next tuesday",
        "location": "Showroom Hà Nội"
    });

    let response = app.api_client
        .post(format!("{}/user/appointment", app.get_app_url()))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to appointment endpoint");
    assert_eq!(response.status().as_u16(), 400);
}
