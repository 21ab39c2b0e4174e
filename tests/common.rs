use farmconnect::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::{
        blob::fs_blob_store::FsBlobStore,
        factory::run_sqlite_migrations,
        repositories::{
            sqlite_user_repo::SqliteUserRepo,
            sqlite_product_repo::SqliteProductRepo,
            memory_session_repo::MemorySessionRepo,
        },
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub const BOUNDARY: &str = "farmconnect-test-boundary";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    pub body: Value,
}

impl TestResponse {
    /// `session_id=<token>` as sent back in a Cookie header, if the response set one.
    #[allow(dead_code)]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .find(|c| c.starts_with("session_id="))
            .map(|c| c.split(';').next().unwrap().to_string())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub upload_dir: String,
    pub state: Arc<AppState>,
    pub sessions: Arc<MemorySessionRepo>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        let upload_dir = format!("test_uploads_{}", Uuid::new_v4());

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            upload_dir: upload_dir.clone(),
            cookie_secure: false,
        };

        let blob_store = FsBlobStore::new(&upload_dir)
            .await
            .expect("Failed to create upload dir");

        let sessions = Arc::new(MemorySessionRepo::new());

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteProductRepo::new(pool.clone())),
            sessions.clone(),
            Arc::new(blob_store),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            upload_dir,
            state,
            sessions,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, headers, bytes, body }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn register(&self, username: &str, password: &str, role: &str) -> TestResponse {
        self.post_json(
            "/api/v1/auth/register",
            None,
            serde_json::json!({ "username": username, "password": password, "role": role }),
        ).await
    }

    /// Logs in on a fresh session and returns the Cookie header value for it.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self.post_json(
            "/api/v1/auth/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        ).await;

        if !response.status.is_success() {
            panic!("Login failed in test helper: status {}", response.status);
        }

        response.session_cookie().expect("No session_id cookie returned")
    }

    pub async fn register_and_login(&self, username: &str, password: &str, role: &str) -> (String, String) {
        let registered = self.register(username, password, role).await;
        assert_eq!(registered.status, StatusCode::OK, "register {} failed: {}", username, registered.body);
        let user_id = registered.body["user"]["id"].as_str().unwrap().to_string();
        let cookie = self.login(username, password).await;
        (user_id, cookie)
    }

    pub async fn upload_product(
        &self,
        cookie: &str,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
    ) -> TestResponse {
        let body = multipart_body(fields, image);
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/products")
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn add_product(&self, cookie: &str, title: &str, description: &str, price: &str, quantity: &str) -> Value {
        let response = self.upload_product(
            cookie,
            &[("title", title), ("description", description), ("price", price), ("quantity", quantity)],
            Some(("produce.png", b"\x89PNG fake image bytes".as_slice())),
        ).await;
        assert_eq!(response.status, StatusCode::CREATED, "add_product failed: {}", response.body);
        response.body
    }
}

#[allow(dead_code)]
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ).as_bytes());
    }
    if let Some((filename, bytes)) = image {
        body.extend_from_slice(format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, filename
        ).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}
