use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Router, extract::Path, http::StatusCode, response::IntoResponse, routing::get};
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Method};
use serde_json::Value;
use tempfile::TempDir;

use plant_service::config::CorsConfig;
use plant_service::database::{init_db, migrate};
use plant_service::ownership::{UserDirectory, UserLookup};
use plant_service::state::AppState;
use plant_service::store::PlantStore;

pub mod routes {
    pub const PLANTS: &str = "/api/plants";

    pub fn plant(id: i32) -> String {
        format!("/api/plants/{id}")
    }
}

/// In-process user directory that answers every lookup the same way and counts calls.
pub struct StubUsers {
    answer: UserLookup,
    calls: AtomicUsize,
}

impl StubUsers {
    pub fn new(answer: UserLookup) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for StubUsers {
    async fn lookup(&self, _user_id: i32) -> UserLookup {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    _db_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    /// Spawn with a user directory that confirms every user.
    pub async fn spawn() -> Self {
        Self::spawn_with_users(StubUsers::new(UserLookup::Exists)).await
    }

    pub async fn spawn_with_users(users: Arc<dyn UserDirectory>) -> Self {
        Self::spawn_with(users, CorsConfig::default()).await
    }

    pub async fn spawn_with_cors(cors: CorsConfig) -> Self {
        Self::spawn_with(StubUsers::new(UserLookup::Exists), cors).await
    }

    async fn spawn_with(users: Arc<dyn UserDirectory>, cors: CorsConfig) -> Self {
        let db_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            db_dir.path().join("plants.db").display()
        );
        let db = init_db(&db_url)
            .await
            .expect("Failed to open test database");
        migrate(&db).await.expect("Failed to sync test schema");

        let state = AppState {
            plants: PlantStore::new(db),
            users,
        };
        let app = plant_service::build_router(state, &cors);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            _db_dir: db_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// CORS preflight for a `POST` to `path` from `origin`.
    pub async fn preflight(&self, path: &str, origin: &str) -> TestResponse {
        let res = self
            .client
            .request(Method::OPTIONS, self.url(path))
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .send()
            .await
            .expect("Failed to send OPTIONS request");

        TestResponse::from_response(res).await
    }

    /// Create a plant via the API and return its `id`.
    pub async fn create_plant(&self, name: &str, user_id: i32) -> i32 {
        let res = self
            .post(
                routes::PLANTS,
                &serde_json::json!({
                    "name": name,
                    "description": "Created by test",
                    "user_id": user_id,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_plant failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}

/// Stub user service mounted at `/api/users/exists/{id}`.
///
/// | id | response          |
/// |----|-------------------|
/// | 1  | 200 `true`        |
/// | 2  | 200 `false`       |
/// | 3  | 500               |
/// | *  | 200 non-boolean   |
pub async fn spawn_user_service() -> SocketAddr {
    async fn exists(Path(id): Path<i32>) -> impl IntoResponse {
        match id {
            1 => (StatusCode::OK, "true"),
            2 => (StatusCode::OK, "false"),
            3 => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
            _ => (StatusCode::OK, "yes"),
        }
    }

    let app = Router::new().route("/api/users/exists/{id}", get(exists));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind user service stub");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn refused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
