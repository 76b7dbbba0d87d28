use clinivox_api::{build_router, state::AppState};
use clinivox_config::Settings;
use clinivox_db::indexes::ensure_indexes;
use mongodb::{Client, Database, options::ClientOptions};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use super::mock_upstream::MockUpstream;

pub const TEST_API_KEY: &str = "test-key";

/// A running test application with its own MongoDB database and a mock
/// server standing in for Google and Claude.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub db: Database,
    pub settings: Settings,
    pub client: reqwest::Client,
    pub upstream: MockUpstream,
}

impl TestApp {
    /// Spawn a new test server connected to the test MongoDB.
    ///
    /// Requires a running MongoDB (default mongodb://localhost:27017).
    /// Set CLINIVOX__DATABASE__URL to override the connection string.
    /// Each test gets a unique database name for isolation.
    pub async fn spawn() -> Self {
        Self::spawn_with_settings(|_| {}).await
    }

    /// Spawn a test server with customized settings.
    ///
    /// The `mutator` closure receives a `&mut Settings` after the test
    /// defaults are applied, so tests can e.g. clear an API key.
    pub async fn spawn_with_settings(mutator: impl FnOnce(&mut Settings)) -> Self {
        let upstream = MockUpstream::spawn().await;
        let db_name = format!("clinivox_test_{}", uuid::Uuid::new_v4().simple());

        let mut settings = Settings::load().expect("Failed to load settings");
        settings.database.name = db_name.clone();
        settings.google.api_key = Some(TEST_API_KEY.to_string());
        settings.google.speech_url = upstream.speech_url();
        settings.google.translate_url = upstream.translate_url();
        settings.claude.api_key = Some(TEST_API_KEY.to_string());
        settings.claude.base_url = upstream.base_url.clone();
        settings.retry.max_retries = 2;
        settings.retry.base_delay_ms = 10;
        settings.retry.max_delay_ms = 50;
        settings.http.timeout_secs = 10;

        mutator(&mut settings);

        let client_options = ClientOptions::parse(&settings.database.url)
            .await
            .expect("Failed to parse MongoDB URL");
        let mongo_client =
            Client::with_options(client_options).expect("Failed to create MongoDB client");
        let db = mongo_client.database(&db_name);

        ensure_indexes(&db).await.expect("Failed to create indexes");

        let app_state =
            AppState::new(db.clone(), settings.clone()).expect("Failed to create AppState");
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            base_url: format!("http://{}", addr),
            db,
            settings,
            client: reqwest::Client::new(),
            upstream,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let db = self.db.clone();
        // Best effort cleanup: drop the test database
        tokio::spawn(async move {
            let _ = db.drop().await;
        });
    }
}
