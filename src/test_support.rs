use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, security, state::AppState, time::now_rfc3339};
use crate::db::models::{Admin, Class, Lesson, Question, Unit};
use crate::db::{self, Database};
use crate::repositories;

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

/// Settings are loaded from process environment, so tests that touch env
/// vars serialize behind this lock for their whole lifetime.
pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("MANHAJ_ENV", "test");
    std::env::set_var("MANHAJ_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", "test-secret");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::set_var("PUBLIC_DIR", "public-dir-not-present");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
    std::env::remove_var("ADMIN_PASSWORD");
    std::env::remove_var("S3_ENDPOINT");
    std::env::remove_var("S3_ACCESS_KEY");
    std::env::remove_var("S3_SECRET_KEY");
    std::env::remove_var("S3_BUCKET");
    std::env::remove_var("S3_REGION");
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");
}

pub(crate) fn set_test_storage_env() {
    std::env::set_var("S3_ENDPOINT", "http://localhost:9000");
    std::env::set_var("S3_ACCESS_KEY", "test-access-key");
    std::env::set_var("S3_SECRET_KEY", "test-secret-key");
    std::env::set_var("S3_BUCKET", "manhaj-test-bucket");
    std::env::set_var("S3_REGION", "ru-central1");
}

/// Router plus state over a fresh in-memory SQLite database; fully
/// hermetic, nothing external required.
pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let db = Database::connect(&settings).await.expect("database");
    db::schema::ensure_schema(&db).await.expect("schema");

    let state = AppState::new(settings, db, None);
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

pub(crate) async fn connect_memory_db() -> Database {
    db::connect_sqlite("sqlite::memory:").await.expect("memory database")
}

pub(crate) async fn insert_admin(db: &Database, username: &str, password: &str) -> Admin {
    let password_hash = security::hash_password(password).expect("hash password");
    repositories::admins::create(db, username, &password_hash, &now_rfc3339())
        .await
        .expect("insert admin")
}

pub(crate) fn admin_cookie(admin_id: i64, settings: &Settings) -> String {
    let token = security::create_access_token(&admin_id.to_string(), settings, None)
        .expect("access token");
    format!("token={token}")
}

pub(crate) async fn insert_class(db: &Database, name: &str) -> Class {
    repositories::classes::create(db, name, &now_rfc3339()).await.expect("insert class")
}

pub(crate) async fn insert_unit(db: &Database, class_id: i64, title: &str) -> Unit {
    repositories::units::create(db, class_id, title, &now_rfc3339()).await.expect("insert unit")
}

pub(crate) async fn insert_lesson(db: &Database, unit_id: i64, title: &str) -> Lesson {
    repositories::lessons::create(db, unit_id, title, "", &now_rfc3339())
        .await
        .expect("insert lesson")
}

pub(crate) async fn insert_question(
    db: &Database,
    lesson_id: i64,
    correct_answer: &str,
) -> Question {
    repositories::questions::create(
        db,
        lesson_id,
        repositories::questions::QuestionFields {
            question_text: "ما ناتج جمع واحد واثنين؟",
            option_a: "اثنان",
            option_b: "ثلاثة",
            option_c: "أربعة",
            option_d: "خمسة",
            correct_answer,
            display_order: 0,
        },
        &now_rfc3339(),
    )
    .await
    .expect("insert question")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
