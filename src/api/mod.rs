//! HTTP surface
//!
//! | route                         | handler                     |
//! |-------------------------------|-----------------------------|
//! | `GET    /api/chats`           | [`chats::list_chats`]       |
//! | `POST   /api/chats`           | [`chats::create_chat`]      |
//! | `GET    /api/chats/{id}`      | [`chats::get_chat`]         |
//! | `DELETE /api/chats/{id}`      | [`chats::delete_chat`]      |
//! | `POST   /api/chats/{id}/messages` | [`chats::send_message`] |
//! | `POST   /api/dispatch`        | [`models::dispatch`]        |
//! | `GET    /api/models`          | [`models::list_models`]     |
//! | `GET    /api/health`          | [`models::health`]          |

pub mod chats;
pub mod models;

use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{Config, ServerSettings},
    coordinator::Coordinator,
    error::Result,
    store::ConversationStore,
};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub coordinator: Arc<Coordinator>,
    pub store: Arc<ConversationStore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, coordinator: Coordinator) -> Self {
        Self {
            config: Arc::new(config),
            coordinator: Arc::new(coordinator),
            store: Arc::new(ConversationStore::new()),
        }
    }
}

/// Parse a JSON request body
///
/// The `Content-Type` header is not checked. A blank body yields `T::default()`;
/// malformed JSON becomes [`GentleError::Json`](crate::error::GentleError::Json)
/// so the caller answers 400 with the usual error envelope.
pub(crate) fn json_body<T>(body: &Bytes) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Build the API routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chats", get(chats::list_chats).post(chats::create_chat))
        .route(
            "/api/chats/{id}",
            get(chats::get_chat).delete(chats::delete_chat),
        )
        .route("/api/chats/{id}/messages", post(chats::send_message))
        .route("/api/dispatch", post(models::dispatch))
        .route("/api/models", get(models::list_models))
        .route("/api/health", get(models::health))
}

/// Full application: routes, CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);
    router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build a [`CorsLayer`] from the configured origins
fn cors_layer(server: &ServerSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Bind the configured listen address
///
/// `host` may be an IP literal or a hostname such as `localhost`.
///
/// # Errors
///
/// Returns an error if the host does not resolve or the port cannot be bound
pub async fn bind(server: &ServerSettings) -> Result<TcpListener> {
    let listener = TcpListener::bind((server.host.as_str(), server.port)).await?;
    Ok(listener)
}

/// Bind and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the listener cannot bind
pub async fn serve(state: AppState) -> Result<()> {
    let missing = state.config.providers.missing_keys();
    if !missing.is_empty() {
        tracing::warn!(?missing, "API keys not configured; those models will fail");
    }

    let listener = bind(&state.config.server).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
