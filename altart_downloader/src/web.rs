//! Web server for the alt-art downloader frontend
//!
//! Provides REST endpoints for session creation, deck submission, thumbnail
//! listing, single image serving and archive download.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use optcg_common::{is_safe_component, validate_session_id, DeckError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;

use crate::config::AppConfig;
use crate::session::{create_session, list_images};

/// Shared application state
#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
}

/// Deck submission body
#[derive(Debug, Deserialize)]
struct DeckSubmission {
    /// Share link of the deck
    deck: String,
    session_id: String,
}

/// Body of every failed request
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

/// Handler error, rendered as `{"success": false, "error": ...}`
#[derive(Debug)]
enum ApiError {
    Deck(DeckError),
    /// Blocking task panicked or was cancelled
    Internal(String),
}

impl From<DeckError> for ApiError {
    fn from(err: DeckError) -> Self {
        ApiError::Deck(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Deck(e) => match e {
                DeckError::MalformedLink(_)
                | DeckError::LinkTooDeep { .. }
                | DeckError::InvalidSessionId(_)
                | DeckError::InvalidPath(_) => StatusCode::BAD_REQUEST,
                DeckError::UpstreamFetch(_)
                | DeckError::HttpStatus(_)
                | DeckError::Network(_)
                | DeckError::Parse(_) => StatusCode::BAD_GATEWAY,
                DeckError::SessionNotFound(_) | DeckError::ImageNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                DeckError::Io(_) | DeckError::Image(_) | DeckError::Archive(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Deck(e) => e.to_string(),
            ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.message());
        } else {
            log::warn!("Request rejected: {}", self.message());
        }

        let body = ErrorResponse {
            success: false,
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// GET / - liveness check
async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "Hello": "World" }))
}

/// GET /create_session/
async fn create_session_handler(
    State(state): State<AppState>,
) -> Result<Json<String>, ApiError> {
    let session_id = create_session(&state.config.layout())?;
    Ok(Json(session_id))
}

/// POST /submit_deck/ - returns the alt-art card numbers of the deck
async fn submit_deck_handler(
    State(state): State<AppState>,
    Json(submission): Json<DeckSubmission>,
) -> Result<Json<Vec<String>>, ApiError> {
    log::info!(
        "Deck submitted for session {}: {}",
        submission.session_id,
        submission.deck
    );

    let config = Arc::clone(&state.config);
    let alt_arts = tokio::task::spawn_blocking(move || {
        config
            .pipeline()?
            .run(&submission.deck, &submission.session_id)
    })
    .await??;

    Ok(Json(alt_arts))
}

/// GET /images/{session_id} - thumbnail paths; unknown sessions have none
async fn list_images_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    match list_images(&state.config.layout(), &session_id) {
        Ok(images) => Ok(Json(images)),
        Err(DeckError::SessionNotFound(_)) => Ok(Json(Vec::new())),
        Err(e) => Err(e.into()),
    }
}

/// GET /image/{session_id}/{set_name}/{filename}
async fn image_handler(
    State(state): State<AppState>,
    Path((session_id, set_name, filename)): Path<(String, String, String)>,
    request: Request,
) -> Result<Response, ApiError> {
    validate_session_id(&session_id)?;
    for part in [&set_name, &filename] {
        if !is_safe_component(part) {
            return Err(DeckError::InvalidPath(part.clone()).into());
        }
    }

    let path = state
        .config
        .layout()
        .set_dir(&session_id, &set_name)
        .join(&filename);
    if !path.is_file() {
        return Err(DeckError::ImageNotFound(format!(
            "{}/{}/{}",
            session_id, set_name, filename
        ))
        .into());
    }

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.map(Body::new)),
        Err(never) => match never {},
    }
}

/// GET /download/{session_id} - zip of the session's images
async fn download_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let archiver = state.config.archiver();
    let id = session_id.clone();
    let zip_path = tokio::task::spawn_blocking(move || archiver.archive(&id)).await??;

    let bytes = tokio::fs::read(&zip_path).await.map_err(DeckError::from)?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.zip\"", session_id),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(response)
}

/// Build the web server router
pub fn create_router(config: AppConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/create_session/", get(create_session_handler))
        .route("/submit_deck/", post(submit_deck_handler))
        .route("/images/{session_id}", get(list_images_handler))
        .route(
            "/image/{session_id}/{set_name}/{filename}",
            get(image_handler),
        )
        .route("/download/{session_id}", get(download_handler))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Start the web server (async)
///
/// Shuts down gracefully on Ctrl+C.
pub async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&config.data_dir)?;
    log::info!("Data directory: {}", config.data_dir.display());

    let addr = config.listen_addr();
    let app = create_router(config);

    log::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
