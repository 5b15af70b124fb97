use askama::Template;

use crate::models::ProgressSummary;

/// The six menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    WeakTopics,
    Plan,
    Progress,
    Quiz,
    Flashcards,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Upload,
        View::WeakTopics,
        View::Plan,
        View::Progress,
        View::Quiz,
        View::Flashcards,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Upload => "Upload Mock Test",
            View::WeakTopics => "Weak Topic Analysis",
            View::Plan => "7-Day Plan",
            View::Progress => "Progress Dashboard",
            View::Quiz => "Take Quiz",
            View::Flashcards => "Flashcards",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            View::Upload => "/",
            View::WeakTopics => "/weak-topics",
            View::Plan => "/plan",
            View::Progress => "/progress",
            View::Quiz => "/quiz",
            View::Flashcards => "/flashcards",
        }
    }
}

pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// Everything the shared layout needs: navigation and the break banner.
pub struct Chrome {
    pub menu: Vec<MenuItem>,
    pub path: &'static str,
    pub break_due: bool,
}

impl Chrome {
    pub fn new(active: View, break_due: bool) -> Self {
        Self {
            menu: View::ALL
                .iter()
                .map(|&view| MenuItem {
                    label: view.label(),
                    path: view.path(),
                    active: view == active,
                })
                .collect(),
            path: active.path(),
            break_due,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// Weak topics and plan days.
    Highlight,
    /// Study material links.
    Material,
    /// Quiz questions and flashcard faces.
    Plain,
    Success,
    Failure,
}

impl CardStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            CardStyle::Highlight => "card-highlight",
            CardStyle::Material => "card-material",
            CardStyle::Plain => "card-plain",
            CardStyle::Success => "card-success",
            CardStyle::Failure => "card-failure",
        }
    }
}

/// A labeled card, rendered by `card.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub style: CardStyle,
    pub label: String,
    pub value: String,
    pub link: Option<String>,
}

impl Card {
    pub fn new(style: CardStyle, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            style,
            label: label.into(),
            value: value.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, href: impl Into<String>) -> Self {
        self.link = Some(href.into());
        self
    }
}

#[derive(Template)]
#[template(path = "guard.html")]
pub struct GuardTemplate {
    pub chrome: Chrome,
}

pub struct Preview {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadTemplate {
    pub chrome: Chrome,
    pub success: Option<String>,
    pub preview: Option<Preview>,
    pub question: String,
    pub answer: Option<String>,
    pub error: Option<String>,
    pub blank_warning: bool,
}

#[derive(Template)]
#[template(path = "weak_topics.html")]
pub struct WeakTopicsTemplate {
    pub chrome: Chrome,
    pub cards: Vec<Card>,
}

#[derive(Template)]
#[template(path = "plan.html")]
pub struct PlanTemplate {
    pub chrome: Chrome,
    pub has_weak_topics: bool,
    pub generated: bool,
    pub plan_cards: Vec<Card>,
    pub material_cards: Vec<Card>,
}

#[derive(Template)]
#[template(path = "progress.html")]
pub struct ProgressTemplate {
    pub chrome: Chrome,
    pub summary: ProgressSummary,
}

pub struct QuizOption {
    pub text: String,
    pub checked: bool,
}

pub struct QuizQuestion {
    pub index: usize,
    pub options: Vec<QuizOption>,
    /// The question card, followed by a feedback card once answered.
    pub cards: Vec<Card>,
}

#[derive(Template)]
#[template(path = "quiz.html")]
pub struct QuizTemplate {
    pub chrome: Chrome,
    pub bank_loaded: bool,
    pub questions: Vec<QuizQuestion>,
    pub score: usize,
    pub total: usize,
}

#[derive(Template)]
#[template(path = "flashcards.html")]
pub struct FlashcardsTemplate {
    pub chrome: Chrome,
    pub bank_loaded: bool,
    pub total: usize,
    pub index: usize,
    pub revealed: bool,
    pub cards: Vec<Card>,
}
