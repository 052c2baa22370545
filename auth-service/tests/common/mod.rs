use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth_service::domain::user::ports::AuthServicePort;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::clock::SystemClock;
use auth_service::outbound::repositories::InMemoryUserRepository;
use chrono::Duration;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
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

        // Cheap Argon2 parameters keep the suite fast
        let hasher = PasswordHasher::with_cost(64, 1, 1).expect("Failed to build password hasher");
        let authenticator =
            Authenticator::with_hasher(JWT_SECRET, Duration::minutes(15), hasher)
                .expect("Failed to build authenticator");

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(SystemClock),
            Arc::new(authenticator),
            PASSWORD_MIN_LENGTH,
        ));

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            token_codec: TokenCodec::new(JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return the response
    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/signup")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account, log in and return (user id, token)
    pub async fn signup_and_login(&self, email: &str, password: &str) -> (String, String) {
        let body: serde_json::Value = self
            .signup(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        let token = body["data"]["token"].as_str().unwrap().to_string();

        (user_id, token)
    }
}
