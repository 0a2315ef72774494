//! HTTP surface: session lifecycle, question turns, transcript reads.
//!
//! Routes:
//! - `GET  /` — embedded single-page chat shell
//! - `GET  /health` — liveness probe
//! - `POST /api/sessions` — open a session (optionally with an API key)
//! - `GET  /api/sessions/{id}/transcript` — full ordered transcript
//! - `POST /api/sessions/{id}/ask` — run one question/answer turn

mod page;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::Config;
use crate::error::TurnError;
use crate::session::SessionStore;

use types::{
    AskRequest, AskResponse, CreateSessionRequest, CreateSessionResponse, HealthResponse,
    TranscriptResponse,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
}

/// Error body matching the usual OpenAI-style shape.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: String,
}

fn error_response(status: StatusCode, message: String, code: &str) -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            message,
            code: code.to_string(),
        },
    };
    (status, Json(body)).into_response()
}

fn turn_error_response(err: &TurnError) -> Response {
    let status = match err {
        TurnError::MissingCredential | TurnError::Authentication(_) => StatusCode::UNAUTHORIZED,
        TurnError::EmptyQuestion => StatusCode::BAD_REQUEST,
        TurnError::ModelParse { .. }
        | TurnError::Network(_)
        | TurnError::StepLimit(_)
        | TurnError::Model(_) => StatusCode::BAD_GATEWAY,
    };
    let message = match err {
        TurnError::MissingCredential => {
            "Please supply your Groq API key to continue.".to_string()
        }
        other => other.to_string(),
    };
    error_response(status, message, err.code())
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id/transcript", get(get_transcript))
        .route("/api/sessions/:id/ask", post(ask))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        sessions: SessionStore::new(),
        config,
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Listening");
    axum::serve(listener, routes(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    request: Option<Json<CreateSessionRequest>>,
) -> Json<CreateSessionResponse> {
    let api_key = request.and_then(|Json(r)| r.api_key);
    let (id, greeting) = state.sessions.create(api_key, &state.config).await;
    tracing::info!(session = %id, "Session created");
    Json(CreateSessionResponse { id, greeting })
}

async fn get_transcript(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.sessions.get(id).await {
        Some(session) => {
            let session = session.lock().await;
            Json(TranscriptResponse {
                id,
                messages: session.transcript.all().to_vec(),
            })
            .into_response()
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("No session with id {}", id),
            "session_not_found",
        ),
    }
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Response {
    let Some(session) = state.sessions.get(id).await else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("No session with id {}", id),
            "session_not_found",
        );
    };

    // The per-session mutex serializes turns: one in-flight question at a
    // time, as the interaction model requires.
    let mut session = session.lock().await;
    match session.ask(&request.question).await {
        Ok((answer, log)) => Json(AskResponse { answer, log }).into_response(),
        Err(err) => {
            tracing::warn!(session = %id, error = %err, "Turn failed");
            turn_error_response(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_errors_map_to_expected_statuses() {
        let cases = [
            (TurnError::MissingCredential, StatusCode::UNAUTHORIZED),
            (
                TurnError::Authentication("bad key".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (TurnError::EmptyQuestion, StatusCode::BAD_REQUEST),
            (TurnError::ModelParse { attempts: 4 }, StatusCode::BAD_GATEWAY),
            (TurnError::StepLimit(10), StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            let response = turn_error_response(&err);
            assert_eq!(response.status(), expected, "for {:?}", err);
        }
    }
}
