// HTTP routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use pokedraft_core::draft::{DraftError, DraftGenerator};

use crate::render::{self, DraftView};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<DraftGenerator>,
}

impl AppState {
    pub fn new(generator: DraftGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/draft", get(draft_page))
        .route("/api/draft", get(draft_json))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home() -> Html<String> {
    Html(render::landing_page())
}

async fn draft_page(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let draft = state.generator.generate_draft().await?;
    Ok(Html(render::draft_page(&draft)))
}

async fn draft_json(State(state): State<AppState>) -> Result<Json<DraftView>, JsonError> {
    let draft = state
        .generator
        .generate_draft()
        .await
        .map_err(|e| JsonError(e.into()))?;
    Ok(Json(DraftView::from(&draft)))
}

async fn not_found() -> WebError {
    WebError::NotFound
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum WebError {
    /// The sampler ran out of attempts; the catalog is most likely down.
    #[error("draft unavailable: {0}")]
    DraftUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("not found")]
    NotFound,
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::DraftUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show to a visitor.
    fn public_message(&self) -> &'static str {
        match self {
            WebError::DraftUnavailable(_) => {
                "The Pokémon data service is not answering right now. Please try again later."
            }
            WebError::Internal(_) => "An unexpected error occurred. Refreshing might fix it.",
            WebError::NotFound => "There is nothing at this address.",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            WebError::DraftUnavailable(_) => "Draft unavailable",
            WebError::Internal(_) => "Something went wrong",
            WebError::NotFound => "Not found",
        }
    }

    fn log(&self) {
        match self {
            WebError::DraftUnavailable(detail) => warn!(%detail, "draft unavailable"),
            WebError::Internal(detail) => error!(%detail, "draft generation failed"),
            WebError::NotFound => {}
        }
    }
}

impl From<DraftError> for WebError {
    fn from(e: DraftError) -> Self {
        match e {
            DraftError::Exhausted { .. } => WebError::DraftUnavailable(e.to_string()),
            DraftError::Lookup(_) | DraftError::EmptyCatalog => WebError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        self.log();
        (
            self.status(),
            Html(render::error_page(self.heading(), self.public_message())),
        )
            .into_response()
    }
}

/// [`WebError`] rendered as a JSON body, for the API routes.
#[derive(Debug)]
pub struct JsonError(pub WebError);

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.log();
        let body = json!({
            "error": err.heading(),
            "message": err.public_message(),
        });
        (err.status(), Json(body)).into_response()
    }
}
