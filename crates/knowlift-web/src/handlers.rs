//! HTTP request handlers for the game.
//!
//! Pages are plain HTML. Rounds and results are exchanged as JSON; the
//! client posts back the interval it was given together with its answer.

use crate::pages;
use crate::session::{GameSession, SessionError, SessionManager};
use axum::{
    extract::{Form, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use knowlift_domain::{
    evaluate, start_round, DomainError, EvaluationResult, Interval, IntervalPayload, LevelCatalog,
    Statistics,
};
use knowlift_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Difficulty tiers
    pub catalog: Arc<LevelCatalog>,
    /// Signs and verifies game session tokens
    pub session_manager: Arc<SessionManager>,
    /// Database checked by `/health`
    pub database: PathBuf,
    /// Answers per level reassessment
    pub answer_window: u32,
}

/// Form posted to `/play`
#[derive(Debug, Deserialize)]
pub struct PlayForm {
    /// Requested tier index
    pub level: Option<String>,
}

/// A new round
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayResponse {
    /// Tier index
    pub level: usize,
    /// Tier name
    pub label: String,
    /// Interval to count
    pub interval: Interval,
}

/// Form posted to `/result`
#[derive(Debug, Deserialize)]
pub struct ResultForm {
    /// JSON-encoded interval payload with the player's answer
    pub data: Option<String>,
    /// Session token from the previous result, if any
    pub session: Option<String>,
}

/// Verdict on one answer plus the session's progress
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    /// Evaluated round
    pub result: EvaluationResult,
    /// Accuracy over the whole session
    pub statistics: Statistics,
    /// Tier for the next round
    pub next_level: usize,
    /// Counters after this answer
    pub answers: GameSession,
    /// Re-signed session token
    pub session: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Whether the database answered
    pub database: bool,
    /// Number of difficulty tiers served
    pub tier_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Domain rule violated
    DomainError(DomainError),
    /// Session token could not be issued
    SessionError(SessionError),
    /// Unknown route
    NotFound(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::DomainError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::SessionError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::NotFound(uri) => {
                warn!(uri = %uri, "Page not found");
                (StatusCode::NOT_FOUND, format!("Page not found: {}", uri))
            }
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::DomainError(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::SessionError(e)
    }
}

async fn index() -> Html<String> {
    pages::index()
}

async fn about() -> Html<String> {
    pages::about()
}

async fn grade(State(state): State<AppState>) -> Html<String> {
    pages::grade(&state.catalog)
}

async fn ladder() -> Html<String> {
    pages::ladder()
}

async fn legal() -> Html<String> {
    pages::legal()
}

/// POST /play - Start a round at the requested tier
///
/// Without a level the player is sent to pick one.
async fn play(
    State(state): State<AppState>,
    Form(form): Form<PlayForm>,
) -> Result<Response, AppError> {
    let Some(raw_level) = form.level.filter(|l| !l.trim().is_empty()) else {
        return Ok(Redirect::to("/grade").into_response());
    };

    let level = state.catalog.fetch_level(&raw_level).ok_or_else(|| {
        AppError::InternalError(format!("Unable to use: {} as a game level.", raw_level))
    })?;

    let interval = start_round(&state.catalog, level, &mut rand::rng())?;
    let label = state.catalog.tier_bounds(level)?.label.to_string();

    Ok(Json(PlayResponse {
        level,
        label,
        interval,
    })
    .into_response())
}

/// POST /result - Evaluate an answer and advance the session
async fn result(
    State(state): State<AppState>,
    Form(form): Form<ResultForm>,
) -> Result<Json<ResultResponse>, AppError> {
    let raw_data = form.data.unwrap_or_default();
    let unusable =
        || AppError::InternalError(format!("Unable to generate results from {}.", raw_data));

    let payload: IntervalPayload = if raw_data.trim().is_empty() {
        IntervalPayload::default()
    } else {
        serde_json::from_str(&raw_data).map_err(|e| {
            error!(reason = "decode", "Unable to decode result data: {}", e);
            unusable()
        })?
    };

    let evaluation = evaluate(&payload).ok_or_else(unusable)?;

    let mut session = state.session_manager.resume(form.session.as_deref());
    let next_level = session.record(
        evaluation.outcome,
        evaluation.interval.game_level,
        &state.catalog,
        state.answer_window,
    );
    let statistics = session.statistics()?;
    let token = state.session_manager.issue(&session)?;

    Ok(Json(ResultResponse {
        result: evaluation,
        statistics,
        next_level,
        answers: session,
        session: token,
    }))
}

/// GET /health - Service and database health
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let path = state.database.clone();
    let reachable = tokio::task::spawn_blocking(move || {
        SqliteStore::open_existing(&path).and_then(|store| store.ping())
    })
    .await
    .map_err(|e| e.to_string())
    .and_then(|r| r.map_err(|e| e.to_string()));

    let database = match reachable {
        Ok(()) => true,
        Err(e) => {
            warn!(reason = %e, "Database unreachable");
            false
        }
    };

    Json(HealthCheckResponse {
        status: if database { "healthy" } else { "degraded" }.to_string(),
        database,
        tier_count: state.catalog.tier_count(),
    })
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.to_string())
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    info!(tiers = state.catalog.tier_count(), "Building routes");
    AxumRouter::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/grade", get(grade))
        .route("/ladder", get(ladder))
        .route("/legal", get(legal))
        .route("/play", post(play))
        .route("/result", post(result))
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_state(state)
}
