use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::contact::mailer::{Mailer, OutgoingMail};
use crate::contact::request::{ContactError, ContactRequest};

/// Shared state of the relay.
pub struct ContactState {
    /// `recipientKey` to address.
    pub recipients: HashMap<String, String>,
    /// Sender address on forwarded mail.
    pub from: String,
    pub mailer: Arc<dyn Mailer>,
}

/// Routes: `POST /api/contact` and `GET /health`.
pub fn router(state: Arc<ContactState>) -> Router {
    Router::new()
        .route("/api/contact", post(contact_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn contact_handler(
    State(state): State<Arc<ContactState>>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ContactError> {
    let Json(request) = body.map_err(|e| ContactError::InvalidBody(e.body_text()))?;

    let contact = request.validate(&state.recipients).map_err(|e| {
        log::info!("Rejected contact request: {e}");
        e
    })?;

    let reference = Uuid::new_v4();
    let mail = OutgoingMail::compose(&state.from, &contact, reference);

    state.mailer.send(&mail).await.map_err(|e| {
        log::error!("Contact {reference} not sent: {e}");
        ContactError::Send(e)
    })?;

    log::info!("Contact {reference} forwarded");
    Ok(Json(json!({ "success": true })))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
