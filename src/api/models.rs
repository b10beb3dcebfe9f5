//! Model listing, direct dispatch and health

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::{json_body, AppState},
    config::{catalog, ModelChoice},
    coordinator::validate_message,
    error::Result,
    services::DispatchResult,
};

/// Body shared by the dispatch and send-message routes
#[derive(Debug, Default, Deserialize)]
pub struct DispatchRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /api/dispatch
///
/// Provider failures still answer 200 with `success: false`.
pub async fn dispatch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DispatchResult>> {
    let req: DispatchRequest = json_body(&body)?;
    let message = validate_message(&req.message)?;
    let preference = ModelChoice::from_preference(req.model.as_deref());
    let result = state.coordinator.process_request(message, preference).await;
    Ok(Json(result))
}

/// GET /api/models
pub async fn list_models() -> impl IntoResponse {
    Json(json!({ "success": true, "models": catalog() }))
}

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Gentle AI backend is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::{
        api::{test_support::spawn, AppState},
        config::{Config, ModelChoice},
        coordinator::Coordinator,
        services::testing::ScriptedAdapter,
    };

    fn state() -> AppState {
        let coordinator = Coordinator::new()
            .with_adapter(Arc::new(ScriptedAdapter::replying(ModelChoice::Reasoning, "thought")))
            .with_adapter(Arc::new(ScriptedAdapter::failing(ModelChoice::Visual, "HTTP 500")))
            .with_adapter(Arc::new(ScriptedAdapter::replying(ModelChoice::Creative, "verse")));
        AppState::new(Config::default(), coordinator)
    }

    #[tokio::test]
    async fn test_models_catalog() {
        let base = spawn(state()).await;
        let body: Value = reqwest::get(format!("{base}/api/models"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["models"].as_array().unwrap().len(), 3);
        assert_eq!(body["models"][0]["id"], json!("gentle-ai"));
        assert_eq!(body["models"][0]["auto_routing"], json!(true));
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn(state()).await;
        let response = reqwest::get(format!("{base}/api/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let base = spawn(state()).await;
        let response = reqwest::Client::new()
            .post(format!("{base}/api/dispatch"))
            .json(&json!({"message": "write a poem about the sea"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "modelLabel": "Claude",
                "content": "verse",
                "usage": {"total_tokens": 3}
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_soft_failure_is_http_ok() {
        let base = spawn(state()).await;
        let response = reqwest::Client::new()
            .post(format!("{base}/api/dispatch"))
            .json(&json!({"message": "write a poem", "model": "visual"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["modelLabel"], json!("GPT-5"));
        assert_eq!(body["errorMessage"], json!("GPT-5 API error: HTTP 500"));
        assert!(body.get("content").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_preference_falls_back_to_keywords() {
        let base = spawn(state()).await;
        let body: Value = reqwest::Client::new()
            .post(format!("{base}/api/dispatch"))
            .json(&json!({"message": "analyze this business plan", "model": "gentle-ai"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["modelLabel"], json!("DeepSeek"));
        assert_eq!(body["content"], json!("thought"));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_blank_message() {
        let base = spawn(state()).await;
        let response = reqwest::Client::new()
            .post(format!("{base}/api/dispatch"))
            .json(&json!({"message": "   "}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_dispatch_bad_bodies_use_error_envelope() {
        let base = spawn(state()).await;
        let client = reqwest::Client::new();

        for raw in [r#"{message: "hi"}"#, r#"{"message": 5}"#, ""] {
            let response = client
                .post(format!("{base}/api/dispatch"))
                .header("content-type", "application/json")
                .body(raw)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 400, "body {raw:?}");
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["success"], json!(false));
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_dispatch_without_content_type() {
        let base = spawn(state()).await;
        let response = reqwest::Client::new()
            .post(format!("{base}/api/dispatch"))
            .body(r#"{"message": "analyze this"}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["modelLabel"], json!("DeepSeek"));
    }
}
