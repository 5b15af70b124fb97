use std::{sync::Arc, time::Duration};

use axum::{
    Extension, Router, middleware,
    routing::{get, post},
};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use tracing::info;

use crate::{
    assistant::Assistant,
    config::AppConfig,
    routes,
    session::{SESSION_LIFETIME, Session, SessionId, session_middleware},
};

const REAP_INTERVAL: Duration = Duration::from_secs(10 * 60);

pub struct AppState {
    pub sessions: DashMap<SessionId, Session>,
    pub assistant: Assistant,
}

impl AppState {
    /// Runs `f` against the caller's session, creating it on first use.
    /// The map entry stays locked while `f` runs, so `f` must not await.
    pub fn with_session<R>(&self, id: &SessionId, f: impl FnOnce(&mut Session) -> R) -> R {
        let now = Utc::now();
        let mut session = self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(now));
        session.touch(now);
        f(session.value_mut())
    }

    /// Drops sessions with no request for longer than `max_idle` and returns
    /// how many were dropped.
    pub fn evict_idle(&self, now: DateTime<Utc>, max_idle: TimeDelta) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_idle(now, max_idle));
        before.saturating_sub(self.sessions.len())
    }
}

/// Periodically evicts sessions whose cookie has expired.
fn spawn_session_reaper(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REAP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = state.evict_idle(Utc::now(), SESSION_LIFETIME);
            if evicted > 0 {
                info!(
                    "Evicted {} idle sessions, {} remain",
                    evicted,
                    state.sessions.len()
                );
            }
        }
    });
}

pub fn init_router(config: AppConfig) -> Router {
    let state = Arc::new(AppState {
        sessions: DashMap::new(),
        assistant: Assistant::new(config.assistant.clone()),
    });
    spawn_session_reaper(state.clone());
    // Routes that don't need a session cookie
    let public_routes = Router::new()
        .route("/health", get(routes::health_handler))
        .route("/styles.css", get(routes::styles))
        .with_state(state.clone());
    let session_routes = Router::new()
        .route("/", get(routes::upload_page))
        .route("/upload", post(routes::upload_results))
        .route("/ask", post(routes::ask_question))
        .route("/break", post(routes::take_break))
        .route("/weak-topics", get(routes::weak_topics_page))
        .route("/plan", get(routes::revision_plan_page))
        .route("/plan/generate", post(routes::generate_plan))
        .route("/progress", get(routes::progress_page))
        .route("/api/progress", get(routes::api_progress))
        .route("/quiz", get(routes::quiz_page))
        .route("/quiz/upload", post(routes::upload_quiz))
        .route("/quiz/{index}/answer", post(routes::answer_question))
        .route("/flashcards", get(routes::flashcards_page))
        .route("/flashcards/upload", post(routes::upload_flashcards))
        .layer(middleware::from_fn(session_middleware))
        .with_state(state);
    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(Extension(config))
}
