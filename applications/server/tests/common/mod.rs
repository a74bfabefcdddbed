/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use setlist_core::{Track, TrackId, UserId};
use setlist_server::{create_router, services::AuthService, state::AppState};
use setlist_storage::Database;
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Test application backed by a real SQLite file that cleans up on drop
pub struct TestApp {
    pub app: Router,
    pub auth: Arc<AuthService>,
    pub db: Arc<Database>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = Arc::new(Database::new(&db_url).await.expect("Failed to open database"));

        let auth = Arc::new(AuthService::new(TEST_SECRET, 1));
        let app = create_router(AppState::new(Arc::clone(&db), Arc::clone(&auth)));

        Self {
            app,
            auth,
            db,
            _temp_dir: temp_dir,
        }
    }

    /// Create a user and return it with a valid access token
    pub async fn user(&self, name: &str) -> (UserId, String) {
        let user = setlist_storage::users::create(self.db.pool(), name, None)
            .await
            .expect("Failed to create test user");
        let token = self
            .auth
            .create_access_token(&user.id)
            .expect("Failed to create token");
        (user.id, token)
    }

    /// Add a track to the catalog
    pub async fn track(&self, title: &str, seconds: u64) -> TrackId {
        let track = Track::new(title, Duration::from_secs(seconds));
        let mut conn = self.db.pool().acquire().await.expect("Failed to acquire");
        setlist_storage::tracks::create(&mut conn, &track)
            .await
            .expect("Failed to create test track");
        track.id
    }

    /// Send a request and decode the JSON response body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        json_body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match json_body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), None).await
    }

    pub async fn put(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), None).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}

/// Titles of the `entry` array of a playlist response
pub fn entry_titles(playlist: &Value) -> Vec<String> {
    playlist["entry"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// The stable error code of an error response
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
