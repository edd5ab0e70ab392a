use dealership::auth::jwt::UserRole;

use crate::helpers::{LoginResponse, TestApp};

#[actix_web::test]
async fn login_with_correct_credentials_returns_token(){
    let app = TestApp::spawn_app().await;
    app.create_user("linh.tran@example.com", "testpassword", UserRole::Customer).await;

    let body = serde_json::json!({
        "email": "linh.tran@example.com",
        "password": "testpassword"
    });

    let response = app.api_client
        .post(format!("{}/login", app.get_app_url()))
        .form(&body)
        .send()
        .await
        .expect("Failed to send request to login endpoint");

    assert_eq!(response.status().as_u16(), 200);

    let login: LoginResponse = response.json().await.expect("Login body was not valid json");
    assert!(!login.token.is_empty());
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized(){
    let app = TestApp::spawn_app().await;
    app.create_user("linh.tran@example.com", "testpassword", UserRole::Customer).await;

    let body = serde_json::json!({
        "email": "linh.tran@example.com",
        "password": "wrongpassword"
    });

    let response = app.api_client
        .post(format!("{}/login", app.get_app_url()))
        .form(&body)
        .send()
        .await
        .expect("Failed to send request to login endpoint");

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn login_with_unknown_email_is_rejected(){
    let app = TestApp::spawn_app().await;

    let body = serde_json::json!({
        "email": "nobody@example.com",
        "password": "testpassword"
    });

    let response = app.api_client
        .post(format!("{}/login", app.get_app_url()))
        .form(&body)
        .send()
        .await
        .expect("Failed to send request to login endpoint");

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn protected_endpoint_rejects_missing_bearer_token(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .get(format!("{}/user/profile", app.get_app_url()))
        .send()
        .await
        .expect("Failed to send request to profile endpoint");

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn staff_endpoint_rejects_customer_token(){
    let app = TestApp::spawn_app().await;
    let (_, token) = app.create_user_and_login("linh.tran@example.com", UserRole::Customer).await;

    let body = serde_json::json!({
        "deposit_id": uuid::Uuid::new_v4(),
        "status": "completed"
    });

    let response = app.api_client
        .put(format!("{}/staff/deposit", app.get_app_url()))
        .bearer_auth(token)
        .form(&body)
        .send()
        .await
        .expect("Failed to send request to staff deposit endpoint");

    assert_eq!(response.status().as_u16(), 401);
}
