use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Multipart, State},
    response::Html,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    assistant::AskOutcome,
    config::AppConfig,
    errors::ApiError,
    router::AppState,
    routes::{chrome, handle_render, read_upload},
    session::{Exchange, Session, SessionId},
    table,
    templates::{Preview, UploadTemplate, View},
};

fn render_upload(
    session: &Session,
    config: &AppConfig,
    success: Option<String>,
) -> Result<Html<String>, ApiError> {
    let preview = session.results.as_ref().map(|table| Preview {
        headers: table.headers.clone(),
        records: table.records.clone(),
    });
    let mut template = UploadTemplate {
        chrome: chrome(View::Upload, session, config),
        success,
        preview,
        question: String::new(),
        answer: None,
        error: None,
        blank_warning: false,
    };
    if let Some(exchange) = &session.last_exchange {
        template.question = exchange.question.clone();
        match &exchange.outcome {
            AskOutcome::Answer(text) => template.answer = Some(text.clone()),
            AskOutcome::Error(message) => template.error = Some(message.clone()),
            AskOutcome::Blank => template.blank_warning = true,
        }
    }
    handle_render(template.render())
}

pub async fn upload_page(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    state.with_session(&session_id, |session| render_upload(session, &config, None))
}

pub async fn upload_results(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let bytes = read_upload(multipart).await?;
    let table = table::read_results(&bytes)?;
    info!(
        "Session {} uploaded a mock test with {} rows",
        session_id,
        table.rows.len()
    );
    state.with_session(&session_id, |session| {
        session.replace_results(table);
        render_upload(
            session,
            &config,
            Some("File uploaded successfully!".to_string()),
        )
    })
}

#[derive(Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

pub async fn ask_question(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<AskForm>,
) -> Result<Html<String>, ApiError> {
    let outcome = state.assistant.ask(&form.question).await;
    state.with_session(&session_id, |session| {
        session.last_exchange = Some(Exchange {
            question: form.question,
            outcome,
        });
        render_upload(session, &config, None)
    })
}
