//! Shared fake backend for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tutorhub::storage::{KeyValueStorage, MemoryStorage};
use tutorhub::{Client, ClientConfig};

pub const VALID_PASSWORD: &str = "correct-horse";
pub const VALID_TOKEN: &str = "tok-valid";

pub struct ApiState {
    pub role: Mutex<String>,
    pub profile_hits: AtomicUsize,
    pub rate_available: AtomicBool,
}

/// In-process API double bound to an ephemeral port.
pub struct FakeApi {
    pub base_url: String,
    pub state: Arc<ApiState>,
}

/// Installs the test log subscriber once; controlled via `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl FakeApi {
    pub async fn spawn() -> Self {
        Self::spawn_with_role("student").await
    }

    pub async fn spawn_with_role(role: &str) -> Self {
        init_tracing();
        let state = Arc::new(ApiState {
            role: Mutex::new(role.to_string()),
            profile_hits: AtomicUsize::new(0),
            rate_available: AtomicBool::new(true),
        });
        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/register", post(register))
            .route("/api/v1/profile/me", get(profile).put(update_profile))
            .route("/api/v1/currency/rate", get(rate))
            .route("/api/v1/bookings", post(create_booking))
            .route("/api/v1/languages", get(languages))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
        }
    }

    /// A fresh client with its own in-memory storage.
    pub fn client(&self) -> (Client, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let storage_dyn: Arc<dyn KeyValueStorage> = storage.clone();
        let client = Client::new(ClientConfig::new(&self.base_url), storage_dyn).unwrap();
        (client, storage)
    }

    pub fn profile_hits(&self) -> usize {
        self.state.profile_hits.load(Ordering::SeqCst)
    }
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

fn user_json(role: &str, full_name: &str) -> Value {
    json!({
        "id": "u-1",
        "full_name": full_name,
        "email": "amina@example.com",
        "role": role,
        "xp": 120
    })
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == VALID_PASSWORD {
        (StatusCode::OK, Json(json!({"token": VALID_TOKEN})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid credentials"})),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "taken@example.com" {
        (
            StatusCode::CONFLICT,
            Json(json!({"error": "Email already registered"})),
        )
    } else {
        (StatusCode::CREATED, Json(json!({"message": "registered"})))
    }
}

async fn profile(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.profile_hits.fetch_add(1, Ordering::SeqCst);
    if !bearer_ok(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        );
    }
    let role = state.role.lock().clone();
    (StatusCode::OK, Json(user_json(&role, "Amina Odhiambo")))
}

async fn update_profile(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        );
    }
    let role = state.role.lock().clone();
    let name = body["full_name"].as_str().unwrap_or("Amina Odhiambo");
    (StatusCode::OK, Json(user_json(&role, name)))
}

async fn create_booking(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "b-9",
            "availability_slot_id": body["availability_slot_id"],
            "checkout_url": "https://pay.example/b-9"
        })),
    )
}

async fn languages(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!([
            {"ID": "lang-1", "Name": "Swahili", "PricePerSession": 12.5}
        ])),
    )
}

async fn rate(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<Value>) {
    if state.rate_available.load(Ordering::SeqCst) {
        (StatusCode::OK, Json(json!({"usd_to_kes": 128.5})))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "rate source unavailable"})),
        )
    }
}
