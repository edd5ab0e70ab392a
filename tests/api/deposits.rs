use dealership::auth::jwt::UserRole;
use dealership::models::VehicleStatus;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::helpers::TestApp;

async fn place_deposit(app: &TestApp, token: &str, vehicle_id: Uuid) -> reqwest::Response{
    let body = serde_json::json!({
        "vehicle_id": vehicle_id,
        "quantity": 1,
        "percentage": 0.2,
        "pickup": null
    });

    app.api_client
        .post(format!("{}/user/deposit", app.get_app_url()))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to deposit endpoint")
}

#[actix_web::test]
async fn confirmed_deposit_reserves_the_vehicle(){
    let app = TestApp::spawn_app().await;
    let (user_id, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let response = place_deposit(&app, &token, vehicle_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let deposit: serde_json::Value = response.json().await.expect("Deposit body was not valid json");
    assert_eq!(deposit["vehicle_id"], serde_json::json!(vehicle_id));
    assert_eq!(deposit["amount"], 120_000_000i64);
    assert_eq!(deposit["status"], "confirmed");

    assert_eq!(app.get_vehicle_status(vehicle_id), "Đã Đặt Cọc");

    use dealership::schema::deposits;
    let mut conn = app.pool.get().unwrap();
    let stored_user: Uuid = deposits::table
        .filter(deposits::vehicle_id.eq(vehicle_id))
        .select(deposits::user_id)
        .first(&mut conn)
        .expect("Deposit row not found");
    assert_eq!(stored_user, user_id);
}

#[actix_web::test]
async fn second_deposit_on_a_reserved_vehicle_is_a_conflict(){
    let app = TestApp::spawn_app().await;
    let (_, first_token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let (_, second_token) = app.create_user_and_login("minh.ngo@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let first = place_deposit(&app, &first_token, vehicle_id).await;
    assert_eq!(first.status().as_u16(), 200);

    let second = place_deposit(&app, &second_token, vehicle_id).await;
    assert_eq!(second.status().as_u16(), 409);

    // The losing request must not leave a second deposit behind
    use dealership::schema::deposits;
    let mut conn = app.pool.get().unwrap();
    let count: i64 = deposits::table
        .filter(deposits::vehicle_id.eq(vehicle_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(count, 1);
}

#[actix_web::test]
async fn deposit_with_non_positive_quantity_is_rejected(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    for quantity in [0, -1]{
        let body = serde_json::json!({
            "vehicle_id": vehicle_id,
            "quantity": quantity,
            "percentage": 0.2,
            "pickup": null
        });

        let response = app.api_client
            .post(format!("{}/user/deposit", app.get_app_url()))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request to deposit endpoint");
        assert_eq!(response.status().as_u16(), 400);
    }

    // The rejected requests must not reserve the vehicle or leave rows behind
    assert_eq!(app.get_vehicle_status(vehicle_id), "Còn Hàng");

    use dealership::schema::deposits;
    let mut conn = app.pool.get().unwrap();
    let count: i64 = deposits::table
        .filter(deposits::vehicle_id.eq(vehicle_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn deposit_on_unknown_vehicle_returns_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;

    let response = place_deposit(&app, &token, Uuid::new_v4()).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn cancelling_a_deposit_releases_the_vehicle(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let body = serde_json::json!({
        "vehicle_id": vehicle_id,
        "quantity": 1,
        "percentage": 0.2,
        "pickup": {
            "scheduled_at": "2026-09-01T09:00:00Z",
            "location": "Showroom Hà Nội"
        }
    });

    let response = app.api_client
        .post(format!("{}/user/deposit", app.get_app_url()))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request to deposit endpoint");
    assert_eq!(response.status().as_u16(), 200);

    let deposit: serde_json::Value = response.json().await.unwrap();
    let deposit_id: Uuid = serde_json::from_value(deposit["deposit_id"].clone()).unwrap();

    let cancel = app.api_client
        .delete(format!("{}/user/deposit", app.get_app_url()))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "deposit_id": deposit_id }))
        .send()
        .await
        .expect("Failed to send request to deposit endpoint");
    assert_eq!(cancel.status().as_u16(), 200);

    assert_eq!(app.get_vehicle_status(vehicle_id), "Còn Hàng");

    use dealership::schema::{deposit_items, deposits, pickup_appointments};
    let mut conn = app.pool.get().unwrap();

    let deposit_row: Option<Uuid> = deposits::table
        .filter(deposits::deposit_id.eq(deposit_id))
        .select(deposits::deposit_id)
        .first(&mut conn)
        .optional()
        .unwrap();
    assert!(deposit_row.is_none());

    let dangling_item: Option<Uuid> = deposit_items::table
        .filter(deposit_items::vehicle_id.eq(vehicle_id))
        .filter(deposit_items::deposit_id.is_not_null())
        .select(deposit_items::deposit_item_id)
        .first(&mut conn)
        .optional()
        .unwrap();
    assert!(dangling_item.is_none());

    let appointment_count: i64 = pickup_appointments::table
        .filter(pickup_appointments::deposit_id.eq(deposit_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(appointment_count, 0);
}

#[actix_web::test]
async fn cancelling_an_unknown_deposit_returns_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let response = place_deposit(&app, &token, vehicle_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let cancel = app.api_client
        .delete(format!("{}/user/deposit", app.get_app_url()))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "deposit_id": Uuid::new_v4() }))
        .send()
        .await
        .expect("Failed to send request to deposit endpoint");
    assert_eq!(cancel.status().as_u16(), 404);

    // The real deposit and the reservation are untouched
    assert_eq!(app.get_vehicle_status(vehicle_id), "Đã Đặt Cọc");
}

#[actix_web::test]
async fn customer_cannot_cancel_someone_elses_deposit(){
    let app = TestApp::spawn_app().await;
    let (_, owner_token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let (_, other_token) = app.create_user_and_login("minh.ngo@example.com", UserRole::Customer).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let response = place_deposit(&app, &owner_token, vehicle_id).await;
    let deposit: serde_json::Value = response.json().await.unwrap();
    let deposit_id: Uuid = serde_json::from_value(deposit["deposit_id"].clone()).unwrap();

    let cancel = app.api_client
        .delete(format!("{}/user/deposit", app.get_app_url()))
        .bearer_auth(&other_token)
        .json(&serde_json::json!({ "deposit_id": deposit_id }))
        .send()
        .await
        .expect("Failed to send request to deposit endpoint");
    assert_eq!(cancel.status().as_u16(), 401);

    assert_eq!(app.get_vehicle_status(vehicle_id), "Đã Đặt Cọc");
}

#[actix_web::test]
async fn staff_can_cancel_any_deposit(){
    let app = TestApp::spawn_app().await;
    let (_, customer_token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let (_, staff_token) = app.create_user_and_login("staff@example.com", UserRole::Staff).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let response = place_deposit(&app, &customer_token, vehicle_id).await;
    let deposit: serde_json::Value = response.json().await.unwrap();
    let deposit_id: Uuid = serde_json::from_value(deposit["deposit_id"].clone()).unwrap();

    let cancel = app.api_client
        .delete(format!("{}/user/deposit", app.get_app_url()))
        .bearer_auth(&staff_token)
        .json(&serde_json::json!({ "deposit_id": deposit_id }))
        .send()
        .await
        .expect("Failed to send request to deposit endpoint");
    assert_eq!(cancel.status().as_u16(), 200);

    assert_eq!(app.get_vehicle_status(vehicle_id), "Còn Hàng");
}

#[actix_web::test]
async fn customers_only_see_their_own_deposits(){
    let app = TestApp::spawn_app().await;
    let (_, first_token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let (_, second_token) = app.create_user_and_login("minh.ngo@example.com", UserRole::Customer).await;
    let (_, staff_token) = app.create_user_and_login("staff@example.com", UserRole::Staff).await;

    let first_vehicle = app.seed_vehicle(600_000_000, VehicleStatus::Available);
    let second_vehicle = app.seed_vehicle(800_000_000, VehicleStatus::Available);

    assert_eq!(place_deposit(&app, &first_token, first_vehicle).await.status().as_u16(), 200);
    assert_eq!(place_deposit(&app, &second_token, second_vehicle).await.status().as_u16(), 200);

    let own: Vec<serde_json::Value> = app.api_client
        .get(format!("{}/user/deposit?page=1&limit=10", app.get_app_url()))
        .bearer_auth(&first_token)
        .send()
        .await
        .expect("Failed to send request to deposit endpoint")
        .json()
        .await
        .expect("Deposit list was not valid json");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["vehicle_id"], serde_json::json!(first_vehicle));

    let all: Vec<serde_json::Value> = app.api_client
        .get(format!("{}/user/deposit?page=1&limit=10", app.get_app_url()))
        .bearer_auth(&staff_token)
        .send()
        .await
        .expect("Failed to send request to deposit endpoint")
        .json()
        .await
        .expect("Deposit list was not valid json");
    assert_eq!(all.len(), 2);
}

#[actix_web::test]
async fn staff_can_progress_a_deposit_to_completed(){
    let app = TestApp::spawn_app().await;
    let (_, customer_token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;
    let (_, staff_token) = app.create_user_and_login("staff@example.com", UserRole::Staff).await;
    let vehicle_id = app.seed_vehicle(600_000_000, VehicleStatus::Available);

    let response = place_deposit(&app, &customer_token, vehicle_id).await;
    let deposit: serde_json::Value = response.json().await.unwrap();
    let deposit_id: Uuid = serde_json::from_value(deposit["deposit_id"].clone()).unwrap();

    let body = serde_json::json!({
        "deposit_id": deposit_id,
        "status": "completed"
    });

    let update = app.api_client
        .put(format!("{}/staff/deposit", app.get_app_url()))
        .bearer_auth(&staff_token)
        .form(&body)
        .send()
        .await
        .expect("Failed to send request to staff deposit endpoint");
    assert_eq!(update.status().as_u16(), 200);

    use dealership::schema::deposits;
    let mut conn = app.pool.get().unwrap();
    let status: String = deposits::table
        .filter(deposits::deposit_id.eq(deposit_id))
        .select(deposits::status)
        .first(&mut conn)
        .unwrap();
    assert_eq!(status, "completed");
}

#[actix_web::test]
async fn updating_an_unknown_deposit_returns_not_found(){
    let app = TestApp::spawn_app().await;
    let (_, staff_token) = app.create_user_and_login("staff@example.com", UserRole::Staff).await;

    let body = serde_json::json!({
        "deposit_id": Uuid::new_v4(),
        "status": "completed"
    });

    let update = app.api_client
        .put(format!("{}/staff/deposit", app.get_app_url()))
        .bearer_auth(&staff_token)
        .form(&body)
        .send()
        .await
        .expect("Failed to send request to staff deposit endpoint");
    assert_eq!(update.status().as_u16(), 404);
}
