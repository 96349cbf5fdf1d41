use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use auth::SigningSecret;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;
use shop_service::config::PasswordConfig;
use shop_service::domain::product::service::ProductService;
use shop_service::domain::user::service::UserService;
use shop_service::inbound::http::router::create_router;
use shop_service::outbound::repositories::InMemoryProductRepository;
use shop_service::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let secret = SigningSecret::from(TEST_SECRET);

        // Cheap Argon2 cost so each login stays fast
        let password_hasher = PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
        .build_hasher()
        .expect("Failed to build password hasher");

        let authenticator = Arc::new(
            Authenticator::new(&secret, Duration::hours(1), password_hasher)
                .expect("Failed to create authenticator"),
        );

        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&authenticator),
        ));
        let product_service = Arc::new(ProductService::new(Arc::new(
            InMemoryProductRepository::new(),
        )));

        let router = create_router(user_service, product_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(&secret),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register a user and return the response
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/register")
            .json(&json!({
                "first_name": "Alice",
                "last_name": "Liddell",
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register then log in, returning the issued token
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        let response = self.register(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self.login(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }
}
