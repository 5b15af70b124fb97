mod analysis;
mod flashcard;
mod quiz;
mod upload;

use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form, Json,
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, error, info};

pub use analysis::{
    api_progress, generate_plan, progress_page, revision_plan_page, weak_topics_page,
};
pub use flashcard::{flashcards_page, upload_flashcards};
pub use quiz::{answer_question, quiz_page, upload_quiz};
pub use upload::{ask_question, upload_page, upload_results};

use crate::{
    config::AppConfig,
    errors::ApiError,
    models::ResultRow,
    router::AppState,
    session::{Session, SessionId},
    templates::{Chrome, GuardTemplate, View},
};

pub(crate) fn handle_render(res: askama::Result<String>) -> Result<Html<String>, ApiError> {
    match res {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            error!("Template rendering failed: {}", e);
            Err(ApiError::TemplateError(e))
        }
    }
}

pub(crate) fn chrome(view: View, session: &Session, config: &AppConfig) -> Chrome {
    Chrome::new(view, session.break_due(Utc::now(), config.break_interval))
}

/// Renders `render` with the uploaded rows, or the upload prompt when there
/// are none yet.
pub(crate) fn with_results<F>(
    view: View,
    session: &Session,
    config: &AppConfig,
    render: F,
) -> Result<Html<String>, ApiError>
where
    F: FnOnce(&[ResultRow], Chrome) -> askama::Result<String>,
{
    let chrome = chrome(view, session, config);
    match &session.results {
        Some(table) => handle_render(render(&table.rows, chrome)),
        None => {
            debug!("No mock test uploaded yet, prompting for upload");
            handle_render(GuardTemplate { chrome }.render())
        }
    }
}

/// Returns the bytes of the multipart field named `file`.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await?;
            debug!("Received upload of {} bytes", bytes.len());
            return Ok(bytes);
        }
    }
    Err(ApiError::MissingUploadField)
}

pub async fn styles() -> Result<impl IntoResponse, ApiError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/css")
        .body(include_str!("../templates/styles.css").to_owned())?;

    Ok(response)
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "app": env!("CARGO_PKG_NAME"),
        "activeSessions": state.sessions.len()
    }))
}

/// Keeps a redirect target on this site. Browsers treat `\` like `/`, so
/// `/\host` is as much an off-site target as `//host`.
fn local_path(back: Option<String>) -> String {
    back.filter(|path| {
        path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
            && !path.chars().any(char::is_control)
    })
    .unwrap_or_else(|| "/".to_string())
}

#[derive(Deserialize)]
pub struct BreakForm {
    pub back: Option<String>,
}

pub async fn take_break(
    Extension(session_id): Extension<SessionId>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<BreakForm>,
) -> Redirect {
    state.with_session(&session_id, |session| session.take_break(Utc::now()));
    info!("Session {} took a break", session_id);
    Redirect::to(&local_path(form.back))
}
