//! Shared harness for the integration tests: an app wired against an
//! in-memory database with recording fakes for object storage and mail.

use api::auth::generate_jwt;
use api::routes::routes;
use api::services::email::{EmailError, Mailer};
use api::services::storage::{FileStore, StorageError, StoredFile, UploadedFile};
use api::state::AppState;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header::CONTENT_TYPE};
use axum::response::Response;
use db::models::user::{Model as UserModel, Rol};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// `FileStore` fake: records every upload and answers with a deterministic URL.
#[derive(Default)]
pub struct RecordingStore {
    uploads: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    /// Folders uploaded to, in call order.
    pub fn folders(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(folder, _)| folder.clone())
            .collect()
    }
}

#[async_trait]
impl FileStore for RecordingStore {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<StoredFile, StorageError> {
        self.uploads
            .lock()
            .unwrap()
            .push((folder.to_string(), file.filename.clone()));
        Ok(StoredFile {
            url: format!("https://cdn.test/{folder}/{}", file.filename),
            public_id: format!("{folder}/{}", file.filename),
        })
    }

    async fn delete(&self, _public_id: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// `Mailer` fake: records recipient and token instead of talking SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, t)| t.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, to_email: &str, token: &str) -> Result<(), EmailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    pub storage: Arc<RecordingStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub async fn make_app() -> TestApp {
    dotenvy::dotenv().ok();
    let db = db::test_utils::setup_test_db().await;
    let storage = Arc::new(RecordingStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(db.clone(), storage.clone(), mailer.clone());
    let app = Router::new().nest("/api", routes(state));
    TestApp {
        app,
        db,
        storage,
        mailer,
    }
}

pub async fn crear_admin(db: &DatabaseConnection) -> (UserModel, String) {
    let usuario = UserModel::create(
        db,
        "Admin",
        "Pruebas",
        "900001",
        "admin@test.com",
        "password123",
        Rol::Admin,
    )
    .await
    .expect("Failed to create admin user");
    let (token, _) = generate_jwt(usuario.id, usuario.rol);
    (usuario, token)
}

pub async fn crear_usuario(db: &DatabaseConnection) -> (UserModel, String) {
    let usuario = UserModel::create(
        db,
        "Usuario",
        "Pruebas",
        "900002",
        "usuario@test.com",
        "password123",
        Rol::User,
    )
    .await
    .expect("Failed to create user");
    let (token, _) = generate_jwt(usuario.id, usuario.rol);
    (usuario, token)
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, payload: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

const BOUNDARY: &str = "X-TEST-BOUNDARY-7f3a91";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBuilder {
    buf: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: &str, uri: &str, token: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(self.buf))
            .unwrap()
    }
}
