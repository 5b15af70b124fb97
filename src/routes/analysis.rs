use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Json,
    extract::State,
    response::{Html, Redirect},
};
use tracing::info;

use crate::{
    analysis,
    config::AppConfig,
    errors::ApiError,
    models::ProgressSummary,
    router::AppState,
    routes::with_results,
    session::SessionId,
    templates::{Card, CardStyle, PlanTemplate, ProgressTemplate, View, WeakTopicsTemplate},
};

pub async fn weak_topics_page(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    state.with_session(&session_id, |session| {
        with_results(View::WeakTopics, session, &config, |rows, chrome| {
            let cards = analysis::aggregate(rows)
                .into_iter()
                .map(|count| {
                    Card::new(
                        CardStyle::Highlight,
                        format!("{}:", count.topic),
                        format!("{} mistakes", count.mistakes),
                    )
                })
                .collect();
            WeakTopicsTemplate { chrome, cards }.render()
        })
    })
}

pub async fn revision_plan_page(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    state.with_session(&session_id, |session| {
        let plan = session.plan.clone();
        with_results(View::Plan, session, &config, |rows, chrome| {
            let days = plan.map(|plan| plan.days).unwrap_or_default();
            let plan_cards = days
                .iter()
                .map(|day| {
                    Card::new(
                        CardStyle::Highlight,
                        format!("Day {}:", day.day),
                        day.topic.clone(),
                    )
                })
                .collect();
            let material_cards = days
                .iter()
                .filter_map(|day| {
                    analysis::study_material(&day.topic).map(|url| {
                        Card::new(CardStyle::Material, "", day.topic.clone()).with_link(url)
                    })
                })
                .collect();
            PlanTemplate {
                chrome,
                has_weak_topics: rows.iter().any(|row| !row.correct),
                generated: !days.is_empty(),
                plan_cards,
                material_cards,
            }
            .render()
        })
    })
}

/// The only place a plan is computed; views show the held plan.
pub async fn generate_plan(
    Extension(session_id): Extension<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Redirect {
    state.with_session(&session_id, |session| {
        if let Some(table) = &session.results {
            session.plan = analysis::plan_from_rows(&table.rows);
            info!(
                "Session {} generated a plan: {:?}",
                session_id,
                session
                    .plan
                    .as_ref()
                    .map(|plan| plan.days.iter().map(|d| d.topic.as_str()).collect::<Vec<_>>())
            );
        }
    });
    Redirect::to(View::Plan.path())
}

pub async fn progress_page(
    Extension(session_id): Extension<SessionId>,
    Extension(config): Extension<AppConfig>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    state.with_session(&session_id, |session| {
        with_results(View::Progress, session, &config, |rows, chrome| {
            ProgressTemplate {
                chrome,
                summary: analysis::progress(rows),
            }
            .render()
        })
    })
}

pub async fn api_progress(
    Extension(session_id): Extension<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProgressSummary>, ApiError> {
    state.with_session(&session_id, |session| {
        session
            .results
            .as_ref()
            .map(|table| Json(analysis::progress(&table.rows)))
            .ok_or(ApiError::NoResults)
    })
}
