//! Conversation endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::{json_body, models::DispatchRequest, AppState},
    config::ModelChoice,
    coordinator::validate_message,
    error::Result,
    messages::NewTurn,
};

#[derive(Debug, Default, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// GET /api/chats
pub async fn list_chats(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "success": true, "chats": state.store.list_chats() }))
}

/// POST /api/chats
///
/// The body is optional; `{}` or nothing creates an untitled chat.
pub async fn create_chat(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let req: CreateChatRequest = json_body(&body)?;

    let chat = state.store.create_chat(req.title);
    tracing::info!(chat_id = chat.id, "chat created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "chat": chat })),
    )
        .into_response())
}

/// GET /api/chats/{id}
pub async fn get_chat(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Response> {
    let (chat, messages) = state.store.get_chat(id)?;
    Ok(Json(json!({ "success": true, "chat": chat, "messages": messages })).into_response())
}

/// DELETE /api/chats/{id}
pub async fn delete_chat(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Response> {
    state.store.delete_chat(id)?;
    tracing::info!(chat_id = id, "chat deleted");
    Ok(Json(json!({ "success": true, "message": "Chat deleted" })).into_response())
}

/// POST /api/chats/{id}/messages
///
/// Stores the user turn, routes it, and stores the reply. When the provider
/// fails the user turn is kept and the response is a 502 carrying the error.
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<u64>,
    body: Bytes,
) -> Result<Response> {
    let req: DispatchRequest = json_body(&body)?;
    let message = validate_message(&req.message)?;
    state.store.get_chat(chat_id)?;

    let preference = ModelChoice::from_preference(req.model.as_deref());
    let user_message = state.store.append_turn(chat_id, NewTurn::user(message))?;

    let result = state.coordinator.process_request(message, preference).await;

    match (&result.content, result.success) {
        (Some(content), true) => {
            let assistant_message = state.store.append_turn(
                chat_id,
                NewTurn::assistant(
                    content.clone(),
                    result.model_label.clone(),
                    result.usage.clone().unwrap_or_default(),
                ),
            )?;
            let chat = state.store.retitle_from_first_message(chat_id, message)?;

            Ok(Json(json!({
                "success": true,
                "chat": chat,
                "user_message": user_message,
                "assistant_message": assistant_message,
                "result": result,
            }))
            .into_response())
        }
        _ => {
            tracing::warn!(chat_id, model = %result.model_label, "reply not stored");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "success": false,
                    "error": result.error_message.clone().unwrap_or_else(|| "Request failed".into()),
                    "user_message": user_message,
                    "result": result,
                })),
            )
                .into_response())
        }
    }
}
