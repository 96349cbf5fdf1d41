mod common;

use auth::Claims;
use auth::JwtHandler;
use auth::SigningSecret;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

const ALICE_EMAIL: &str = "alice@example.com";
const ALICE_PASSWORD: &str = "secret123";

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register(ALICE_EMAIL, ALICE_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["email"], ALICE_EMAIL);
    assert_eq!(body["data"]["first_name"], "Alice");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());

    // Registration never issues a token nor echoes credentials
    assert!(body["data"].get("token").is_none());
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    app.register(ALICE_EMAIL, ALICE_PASSWORD).await;
    let response = app.register(ALICE_EMAIL, "another-password").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_email_is_case_insensitive() {
    let app = TestApp::spawn().await;

    let response = app.register(ALICE_EMAIL, ALICE_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.register("Alice@Example.com", ALICE_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.login("ALICE@example.COM", ALICE_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/register")
        .json(&json!({
            "first_name": "",
            "email": "not-an-email",
            "password": "ab"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let violations = body["data"]["violations"]
        .as_array()
        .expect("Missing violations");

    assert!(violations.contains(&json!({"field": "first_name", "rule": "required"})));
    assert!(violations.contains(&json!({"field": "last_name", "rule": "required"})));
    assert!(violations.contains(&json!({"field": "email", "rule": "email"})));
    assert!(violations.contains(&json!({"field": "password", "rule": "min_length", "min": 3})));
    assert!(!body.to_string().contains("\"ab\""));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/login")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 400);
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app.login(ALICE_EMAIL, ALICE_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["token"].as_str().expect("Missing token");

    assert_eq!(token.split('.').count(), 3);

    let claims: Claims = app.jwt_handler.decode(token).expect("Token must verify");
    let expires_in = claims.exp.unwrap() - Utc::now().timestamp();
    assert!(claims.sub.is_some());
    assert!(expires_in > 0 && expires_in <= 3600);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register(ALICE_EMAIL, ALICE_PASSWORD).await;

    let wrong_password = app.login(ALICE_EMAIL, "wrong-password").await;
    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    let wrong_password: Value = wrong_password.json().await.unwrap();

    let unknown_email = app.login("bob@example.com", ALICE_PASSWORD).await;
    assert_eq!(unknown_email.status(), StatusCode::BAD_REQUEST);
    let unknown_email: Value = unknown_email.json().await.unwrap();

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["data"]["message"], "invalid email or password");
    assert!(!wrong_password.to_string().contains("wrong-password"));
}

#[tokio::test]
async fn test_register_login_scenario() {
    let app = TestApp::spawn().await;

    let token = app.register_and_login(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .get_authenticated("/api/v1/users", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let users = body["data"].as_array().expect("Expected a list of users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], ALICE_EMAIL);
    assert!(users[0].get("password_hash").is_none());

    // The token subject is the registered user's id
    let subject = app.jwt_handler.verify(&token).unwrap();
    assert_eq!(users[0]["id"], subject);
}

#[tokio::test]
async fn test_guard_rejections_share_one_body() {
    let app = TestApp::spawn().await;
    let user_id = uuid::Uuid::new_v4().to_string();

    let expired = app
        .jwt_handler
        .encode(
            &Claims::new()
                .with_subject(&user_id)
                .with_issued_at((Utc::now() - Duration::hours(2)).timestamp())
                .with_expiration((Utc::now() - Duration::hours(1)).timestamp()),
        )
        .unwrap();
    let foreign = JwtHandler::new(&SigningSecret::from("some-other-secret-key-of-32-bytes!!"))
        .issue(&user_id, Duration::minutes(5))
        .unwrap();
    let not_a_user = app
        .jwt_handler
        .issue("not-a-uuid", Duration::minutes(5))
        .unwrap();

    let mut bodies = Vec::new();

    let missing = app
        .get("/api/v1/users")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    bodies.push(missing.json::<Value>().await.unwrap());

    for token in ["garbage", expired.as_str(), foreign.as_str(), not_a_user.as_str()] {
        let response = app
            .get_authenticated("/api/v1/users", token)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "token {:?}", token);
        bodies.push(response.json::<Value>().await.unwrap());
    }

    let expected = json!({"status_code": 401, "data": {"message": "permission denied"}});
    for body in bodies {
        assert_eq!(body, expected);
    }
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let app = TestApp::spawn().await;
    let token = app
        .jwt_handler
        .issue(&uuid::Uuid::new_v4().to_string(), Duration::minutes(5))
        .unwrap();

    let response = app
        .get_authenticated("/api/v1/users", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .get("/api/v1/users")
        .header("authorization", format!("bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_products_is_public() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/v1/products")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({"status_code": 200, "data": []}));
}

#[tokio::test]
async fn test_create_product_requires_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/products")
        .json(&json!({"name": "Lamp", "price": 12.5}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_products() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .post_authenticated("/api/v1/products", &token)
        .json(&json!({
            "name": "Lamp",
            "description": "Desk lamp",
            "price": 12.5,
            "quantity": 3
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["name"], "Lamp");
    assert_eq!(body["data"]["image"], "");
    assert_eq!(body["data"]["price"], 12.5);
    assert_eq!(body["data"]["quantity"], 3);

    let response = app
        .get("/api/v1/products")
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = response.json().await.expect("Failed to parse response");

    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Lamp");
}

#[tokio::test]
async fn test_create_product_validation() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .post_authenticated("/api/v1/products", &token)
        .json(&json!({"description": "no name", "price": -2.0}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let violations = body["data"]["violations"].as_array().unwrap();
    assert!(violations.contains(&json!({"field": "name", "rule": "required"})));
    assert!(violations.contains(&json!({"field": "price", "rule": "non_negative"})));
}
