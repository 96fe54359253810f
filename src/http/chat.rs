//! `POST /chat`: one message in, one reply out.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::error::ApiError;
use crate::AppState;

pub const NO_MESSAGE: &str = "No message provided";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// What the `message` field turned out to hold.
#[derive(Debug, PartialEq, Eq)]
pub enum Incoming {
    /// Missing or falsy: `null`, `false`, `0`, `""`, `[]`, `{}`
    Empty,
    Text(String),
    /// Any other JSON value, kept as its JSON text
    Unsupported(String),
}

impl Incoming {
    pub fn from_field(message: Option<Value>) -> Self {
        match message {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Incoming::Empty,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Incoming::Empty,
            Some(Value::String(s)) if s.is_empty() => Incoming::Empty,
            Some(Value::Array(a)) if a.is_empty() => Incoming::Empty,
            Some(Value::Object(o)) if o.is_empty() => Incoming::Empty,
            Some(Value::String(s)) => Incoming::Text(s),
            Some(other) => Incoming::Unsupported(other.to_string()),
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    // Unparsable bodies are server-side failures here, not 4xx.
    let Json(request) = payload.map_err(|e| ApiError::Internal(e.body_text()))?;

    let message = match Incoming::from_field(request.message) {
        Incoming::Empty => return Err(ApiError::BadRequest(NO_MESSAGE.to_string())),
        Incoming::Text(text) => Ok(text),
        Incoming::Unsupported(raw) => Err(raw),
    };

    // Own task: a panic in processing surfaces as a 500.
    let assistant = state.assistant.clone();
    let response = tokio::spawn(async move {
        match message {
            Ok(text) => {
                info!("Chat message received ({} chars)", text.chars().count());
                assistant.process_message(&text).await
            }
            Err(raw) => assistant.process_unsupported(&raw).await,
        }
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ChatResponse { response }))
}
