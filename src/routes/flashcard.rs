use std::sync::Arc;

use askama::Template;
use axum::{
    Extension,
    extract::{Multipart, Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    analysis,
    config::AppConfig,
    errors::ApiError,
    router::AppState,
    routes::{read_upload, with_results},
    session::SessionId,
    table,
    templates::{Card, CardStyle, FlashcardsTemplate, View},
};

#[derive(Deserialize)]
pub struct FlashcardQuery {
    pub card: Option<usize>,
    #[serde(default)]
    pub reveal: bool,
}

pub async fn flashcards_page(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlashcardQuery>,
) -> Result<Html<String>, ApiError> {
    state.with_session(&session_id, |session| {
        with_results(View::Flashcards, session, &config, |rows, chrome| {
            let cards = session
                .flashcards
                .as_deref()
                .map(|bank| analysis::in_weak_topics(bank, &analysis::weak_topics(rows)))
                .unwrap_or_default();
            // the slider only offers 1..=len, out-of-range query values are clamped
            let index = query.card.unwrap_or(1).clamp(1, cards.len().max(1));
            let mut faces = Vec::new();
            if let Some(card) = analysis::select(&cards, index) {
                faces.push(Card::new(CardStyle::Plain, "Topic:", card.topic.clone()));
                faces.push(Card::new(CardStyle::Plain, "Question:", card.question.clone()));
                if query.reveal {
                    faces.push(Card::new(CardStyle::Success, "Answer:", card.answer.clone()));
                }
            }
            FlashcardsTemplate {
                chrome,
                bank_loaded: session.flashcards.is_some(),
                total: cards.len(),
                index,
                revealed: query.reveal,
                cards: faces,
            }
            .render()
        })
    })
}

pub async fn upload_flashcards(
    Extension(session_id): Extension<SessionId>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let bytes = read_upload(multipart).await?;
    let cards = table::read_flashcards(&bytes)?;
    info!("Session {} uploaded {} flashcards", session_id, cards.len());
    state.with_session(&session_id, |session| session.flashcards = Some(cards));
    Ok(Redirect::to(View::Flashcards.path()))
}
