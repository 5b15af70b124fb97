use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    analysis,
    config::AppConfig,
    errors::ApiError,
    models::QuizItem,
    router::AppState,
    routes::{read_upload, with_results},
    session::{Session, SessionId},
    table,
    templates::{Card, CardStyle, QuizOption, QuizQuestion, QuizTemplate, View},
};

/// Quiz items whose topic is weak in the uploaded mock test.
fn items_in_scope(session: &Session) -> Vec<QuizItem> {
    match (&session.results, &session.quiz_bank) {
        (Some(table), Some(bank)) => {
            analysis::in_weak_topics(bank, &analysis::weak_topics(&table.rows))
        }
        _ => Vec::new(),
    }
}

fn question_view(index: usize, item: &QuizItem, response: Option<&String>) -> QuizQuestion {
    let mut cards = vec![Card::new(
        CardStyle::Plain,
        format!("Q{}:", index + 1),
        item.question.clone(),
    )];
    match response {
        Some(choice) if *choice == item.answer => {
            cards.push(Card::new(CardStyle::Success, "Correct!", ""))
        }
        Some(_) => cards.push(Card::new(
            CardStyle::Failure,
            "Wrong!",
            format!("Correct answer: {}", item.answer),
        )),
        None => {}
    }
    QuizQuestion {
        index,
        options: item
            .options
            .iter()
            .map(|option| QuizOption {
                text: option.clone(),
                checked: response == Some(option),
            })
            .collect(),
        cards,
    }
}

pub async fn quiz_page(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    state.with_session(&session_id, |session| {
        with_results(View::Quiz, session, &config, |_rows, chrome| {
            let items = items_in_scope(session);
            let questions = items
                .iter()
                .enumerate()
                .map(|(index, item)| question_view(index, item, session.quiz_responses.get(&index)))
                .collect();
            QuizTemplate {
                chrome,
                bank_loaded: session.quiz_bank.is_some(),
                questions,
                score: analysis::score(&items, &session.quiz_responses),
                total: items.len(),
            }
            .render()
        })
    })
}

pub async fn upload_quiz(
    Extension(session_id): Extension<SessionId>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let bytes = read_upload(multipart).await?;
    let items = table::read_quiz_bank(&bytes)?;
    info!("Session {} uploaded {} quiz items", session_id, items.len());
    state.with_session(&session_id, |session| session.replace_quiz_bank(items));
    Ok(Redirect::to(View::Quiz.path()))
}

#[derive(Deserialize)]
pub struct AnswerForm {
    pub choice: String,
}

pub async fn answer_question(
    Extension(session_id): Extension<SessionId>,
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Form(form): Form<AnswerForm>,
) -> Redirect {
    state.with_session(&session_id, |session| {
        if index < items_in_scope(session).len() {
            info!("Session {} answered quiz item {}", session_id, index);
            session.quiz_responses.insert(index, form.choice);
        } else {
            warn!(
                "Session {} answered quiz item {} which is not in scope",
                session_id, index
            );
        }
    });
    Redirect::to(&format!("/quiz#q{index}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_question_feedback() {
        let item = QuizItem {
            topic: "Probability".into(),
            question: "P(two heads)?".into(),
            options: ["0.25", "0.5", "0.75", "1"].map(String::from),
            answer: "0.25".into(),
        };

        let unanswered = question_view(0, &item, None);
        assert_eq!(unanswered.cards.len(), 1);
        assert!(unanswered.options.iter().all(|o| !o.checked));

        let wrong = "0.5".to_string();
        let view = question_view(2, &item, Some(&wrong));
        assert_eq!(view.cards[0].label, "Q3:");
        assert_eq!(view.cards[1].style, CardStyle::Failure);
        assert_eq!(view.cards[1].value, "Correct answer: 0.25");
        assert!(view.options[1].checked);

        let right = "0.25".to_string();
        let view = question_view(0, &item, Some(&right));
        assert_eq!(view.cards[1].style, CardStyle::Success);
    }
}
