//! Per-browser session context.
use std::{collections::HashMap, fmt::Display};

use axum::{
    Extension,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{SignedCookieJar, cookie};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use crate::{
    assistant::AskOutcome,
    config::AppConfig,
    models::{Flashcard, QuizItem, ResultTable, RevisionPlan},
};

pub const SESSION_COOKIE: &str = "coach_session";

/// How long a session lives without requests. The cookie expires after the
/// same span, and idle server-side state is evicted after it.
pub const SESSION_LIFETIME: TimeDelta = TimeDelta::days(1);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The last assistant question and what came back.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub question: String,
    pub outcome: AskOutcome,
}

#[derive(Debug)]
pub struct Session {
    pub results: Option<ResultTable>,
    pub plan: Option<RevisionPlan>,
    pub quiz_bank: Option<Vec<QuizItem>>,
    pub quiz_responses: HashMap<usize, String>,
    pub flashcards: Option<Vec<Flashcard>>,
    pub last_exchange: Option<Exchange>,
    pub last_break: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            results: None,
            plan: None,
            quiz_bank: None,
            quiz_responses: HashMap::new(),
            flashcards: None,
            last_exchange: None,
            last_break: now,
            last_seen: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    pub fn is_idle(&self, now: DateTime<Utc>, max_idle: TimeDelta) -> bool {
        now - self.last_seen > max_idle
    }

    /// A new result file invalidates everything derived from the old one.
    pub fn replace_results(&mut self, table: ResultTable) {
        self.results = Some(table);
        self.plan = None;
        self.quiz_responses.clear();
    }

    pub fn replace_quiz_bank(&mut self, items: Vec<QuizItem>) {
        self.quiz_bank = Some(items);
        self.quiz_responses.clear();
    }

    pub fn break_due(&self, now: DateTime<Utc>, interval: TimeDelta) -> bool {
        now - self.last_break > interval
    }

    pub fn take_break(&mut self, now: DateTime<Utc>) {
        self.last_break = now;
    }
}

/// Attaches a `SessionId` to every request, issuing a signed cookie for new
/// browsers.
pub async fn session_middleware(
    Extension(config): Extension<AppConfig>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut cookies = SignedCookieJar::from_headers(req.headers(), config.cookie_secret.clone());
    let session_id = match cookies.get(SESSION_COOKIE) {
        Some(cookie) => SessionId(cookie.value().to_string()),
        None => {
            let session_id = SessionId::generate();
            info!("Starting new session {}", session_id);
            cookies = add_session_cookie(cookies, &session_id, config.cookie_secure);
            session_id
        }
    };
    debug!(
        "Processing request: {} {} (session {})",
        req.method(),
        req.uri(),
        session_id
    );
    req.extensions_mut().insert(session_id);
    let resp = next.run(req).await;
    (cookies, resp).into_response()
}

fn add_session_cookie(
    cookies: SignedCookieJar,
    session_id: &SessionId,
    secure: bool,
) -> SignedCookieJar {
    cookies.add(
        cookie::Cookie::build((SESSION_COOKIE, session_id.0.clone()))
            .path("/")
            .http_only(true)
            .secure(secure)
            .max_age(time::Duration::seconds(SESSION_LIFETIME.num_seconds()))
            .same_site(cookie::SameSite::Strict)
            .build(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::{PlanDay, ResultRow};

    fn table(topic: &str) -> ResultTable {
        ResultTable {
            headers: vec!["Topic".into(), "Correct".into()],
            records: vec![vec![topic.into(), "False".into()]],
            rows: vec![ResultRow {
                topic: topic.into(),
                correct: false,
            }],
        }
    }

    #[test]
    fn test_new_results_reset_derived_state() {
        let now = Utc::now();
        let mut session = Session::new(now);
        session.replace_results(table("Algebra"));
        session.plan = Some(RevisionPlan {
            days: vec![PlanDay {
                day: 1,
                topic: "Algebra".into(),
            }],
        });
        session.quiz_bank = Some(Vec::new());
        session.quiz_responses.insert(0, "x".into());

        session.replace_results(table("Optics"));
        assert!(session.plan.is_none());
        assert!(session.quiz_responses.is_empty());
        assert!(session.quiz_bank.is_some());
        assert_eq!(session.last_break, now);
    }

    #[test]
    fn test_break_reminder() {
        let start = Utc::now();
        let mut session = Session::new(start);
        let interval = TimeDelta::minutes(30);
        assert!(!session.break_due(start + TimeDelta::minutes(30), interval));
        assert!(session.break_due(start + TimeDelta::minutes(31), interval));

        session.take_break(start + TimeDelta::minutes(31));
        assert!(!session.break_due(start + TimeDelta::minutes(40), interval));
    }

    #[test]
    fn test_idle_sessions() {
        let start = Utc::now();
        let ttl = SESSION_LIFETIME;
        let mut session = Session::new(start);
        assert!(!session.is_idle(start + ttl, ttl));
        assert!(session.is_idle(start + ttl + TimeDelta::seconds(1), ttl));

        session.touch(start + TimeDelta::hours(12));
        assert!(!session.is_idle(start + ttl + TimeDelta::hours(1), ttl));
    }
}
