//! HTTP surface: the message webhook and read-only profile endpoints.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::intent::{Intent, IntentClassifier};
use crate::profile::completion::unanswered_optional_fields;
use crate::profile::prompts::prompt_for_key;
use crate::profile::validation::validate_email;
use crate::profile::{Field, UserRecord, can_access_search};
use crate::session::{ConversationController, SessionRegistry};
use crate::store::UserStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ConversationController>,
    pub registry: Arc<SessionRegistry>,
    pub classifier: Arc<dyn IntentClassifier>,
    pub store: Arc<dyn UserStore>,
}

/// Build the Axum router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/messages", post(handle_message))
        .route("/api/users", post(register_user))
        .route("/api/profiles/{phone}/status", get(profile_status))
        .route("/api/fields/{key}/prompt", get(prompt))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "alumni-assist"
    }))
}

// ── Messages ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub phone: String,
    pub message: String,
    /// Intent from an upstream classifier; classified locally when absent.
    #[serde(default)]
    pub intent: Option<Intent>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub request_id: Uuid,
    pub reply: String,
    pub intent: Intent,
    pub waiting_for: Option<String>,
    pub completion_percentage: u8,
}

async fn handle_message(
    State(state): State<AppState>,
    Json(body): Json<MessageRequest>,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();

    let handle = match state.registry.get_or_load(&body.phone).await {
        Ok(Some(handle)) => handle,
        Ok(None) => {
            info!(%request_id, phone = %body.phone, "Message from unregistered phone");
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "No alumni profile for this phone"})),
            );
        }
        Err(e) => {
            warn!(%request_id, phone = %body.phone, error = %e, "Failed to load session");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Unable to load profile"})),
            );
        }
    };

    let intent = match body.intent {
        Some(intent) => intent,
        None => state.classifier.classify(&body.message).await,
    };

    let mut session = handle.lock().await;
    let reply = state
        .controller
        .handle_authenticated_user(&body.message, &intent, &mut session)
        .await;

    let response = MessageResponse {
        request_id,
        reply,
        intent,
        waiting_for: session.tag(),
        completion_percentage: can_access_search(&session.user).completion_percentage,
    };
    (StatusCode::OK, Json(serde_json::json!(response)))
}

// ── Profiles ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub name: String,
    pub email: String,
}

async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> impl IntoResponse {
    if body.phone.trim().is_empty() || !validate_email(&body.email).is_valid() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "A phone and a valid email are required"})),
        );
    }

    match state.store.find_by_phone(&body.phone).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(serde_json::json!({"error": "Phone already registered"})),
            );
        }
        Ok(None) => {}
        Err(e) => {
            warn!(phone = %body.phone, error = %e, "Registration lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Unable to register"})),
            );
        }
    }

    let user = UserRecord::new(body.phone.trim(), body.name.trim(), body.email.trim().to_lowercase());
    match state.store.upsert_user(&user).await {
        Ok(()) => {
            info!(phone = %user.phone, "Alumni registered");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({"phone": user.phone, "status": "registered"})),
            )
        }
        Err(e) => {
            warn!(phone = %user.phone, error = %e, "Registration failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Unable to register"})),
            )
        }
    }
}

async fn profile_status(State(state): State<AppState>, Path(phone): Path<String>) -> impl IntoResponse {
    match state.store.find_by_phone(&phone).await {
        Ok(Some(user)) => {
            let access = can_access_search(&user);
            let optional: Vec<Field> = unanswered_optional_fields(&user);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "phone": user.phone,
                    "can_access": access.can_access,
                    "completion_percentage": access.completion_percentage,
                    "incomplete_fields": access.incomplete_fields,
                    "unanswered_optional_fields": optional,
                    "completed": user.enhanced_profile.completed,
                })),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Profile not found"})),
        ),
        Err(e) => {
            warn!(%phone, error = %e, "Status lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Unable to load profile"})),
            )
        }
    }
}

/// Unknown keys get the generic prompt rather than an error.
async fn prompt(Path(key): Path<String>) -> impl IntoResponse {
    let field = key.parse::<Field>().ok();
    Json(serde_json::json!({
        "field": field,
        "display_name": field.map(Field::display_name),
        "required": field.is_some_and(Field::is_required),
        "prompt": prompt_for_key(&key),
    }))
}
