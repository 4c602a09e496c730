//! Stub of the task backend, served over real HTTP for the client tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use common::{Credentials, NewTask, NewUser, StatusUpdate, Task, TaskStatus};
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const TOKEN: &str = "stub-token";
pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct-horse";

#[derive(Clone, Default)]
pub struct StubBackend {
    pub tasks: Arc<Mutex<Vec<Task>>>,
    pub requests: Arc<AtomicUsize>,
    pub fail_tasks: Arc<AtomicBool>,
    pub authorization: Arc<Mutex<Vec<Option<String>>>>,
    next_id: Arc<AtomicUsize>,
}

impl StubBackend {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let stub = Self::default();
        *stub.tasks.lock() = tasks;
        stub
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn record(&self, headers: &HeaderMap) -> bool {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let expected = format!("Bearer {}", TOKEN);
        let ok = auth.as_deref() == Some(expected.as_str());
        self.authorization.lock().push(auth);
        ok
    }
}

pub fn task(id: &str, status: TaskStatus, due_date: DateTime<Utc>) -> Task {
    Task {
        id: id.to_string(),
        title: format!("Task {}", id),
        description: String::new(),
        due_date,
        status,
        created_at: None,
        updated_at: None,
    }
}

/// Same shape the real backend produces: naive timestamps, nullable
/// description.
fn backend_json(task: &Task) -> Value {
    let naive = |dt: DateTime<Utc>| dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    let description = if task.description.is_empty() {
        Value::Null
    } else {
        Value::String(task.description.clone())
    };
    json!({
        "id": task.id,
        "title": task.title,
        "description": description,
        "dueDate": naive(task.due_date),
        "status": task.status,
        "createdAt": naive(Utc::now()),
        "updatedAt": naive(Utc::now()),
    })
}

fn user_json() -> Value {
    json!({
        "id": "user-1",
        "name": "Ada",
        "email": EMAIL,
        "createdAt": "2026-01-01T10:00:00"
    })
}

fn error(code: StatusCode, message: &str) -> Response {
    (code, Json(json!({ "error": message }))).into_response()
}

async fn list_tasks(State(stub): State<StubBackend>, headers: HeaderMap) -> Response {
    if !stub.record(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if stub.fail_tasks.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    }
    let body: Vec<Value> = stub.tasks.lock().iter().map(backend_json).collect();
    Json(body).into_response()
}

async fn create_task(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(payload): Json<NewTask>,
) -> Response {
    if !stub.record(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if stub.fail_tasks.load(Ordering::SeqCst) {
        return error(StatusCode::BAD_REQUEST, "boom");
    }
    let id = format!("task-{}", stub.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    let created = Task {
        id,
        title: payload.title,
        description: payload.description,
        due_date: payload.due_date,
        status: TaskStatus::Pending,
        created_at: None,
        updated_at: None,
    };
    let body = backend_json(&created);
    stub.tasks.lock().push(created);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_task(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> Response {
    if !stub.record(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if stub.fail_tasks.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    }
    let mut tasks = stub.tasks.lock();
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.status = payload.status;
            Json(backend_json(task)).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Task not found"),
    }
}

async fn create_user(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(payload): Json<NewUser>,
) -> Response {
    stub.record(&headers);
    if payload.email == EMAIL {
        return error(StatusCode::BAD_REQUEST, "Email already registered");
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "user-2",
            "name": payload.name,
            "email": payload.email,
            "createdAt": "2026-10-18T12:00:00"
        })),
    )
        .into_response()
}

async fn sign_in(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(payload): Json<Credentials>,
) -> Response {
    stub.record(&headers);
    if payload.email != EMAIL || payload.password != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    Json(json!({ "token": TOKEN, "user": user_json() })).into_response()
}

async fn validate(State(stub): State<StubBackend>, headers: HeaderMap) -> Response {
    if !stub.record(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid or expired session");
    }
    Json(user_json()).into_response()
}

pub fn router(stub: StubBackend) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", patch(update_task))
        .route("/users", post(create_user))
        .route("/auth/signin", post(sign_in))
        .route("/auth/validate", get(validate))
        .with_state(stub)
}

/// Serves the stub on an ephemeral port and returns its origin.
pub async fn spawn(stub: StubBackend) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(stub)).await.unwrap();
    });
    format!("http://{}", addr)
}

/// An origin nothing listens on.
pub async fn dead_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
