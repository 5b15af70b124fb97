use serde::{Deserialize, Serialize};

/// One row of the uploaded mock test results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub topic: String,
    pub correct: bool,
}

/// The uploaded result file: raw cells for the preview plus the parsed rows.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub mistakes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDay {
    pub day: usize,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionPlan {
    pub days: Vec<PlanDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub topic: String,
    pub question: String,
    pub options: [String; 4],
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub topic: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_wrong: usize,
    pub weak_topic_count: usize,
    pub topics: Vec<TopicBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicBar {
    pub topic: String,
    pub mistakes: usize,
    /// Bar length relative to the topic with the most mistakes, 0..=100.
    pub percent: u32,
}

/// Anything that belongs to a topic and can be filtered by the weak-topic set.
pub trait Topical {
    fn topic(&self) -> &str;
}

impl Topical for QuizItem {
    fn topic(&self) -> &str {
        &self.topic
    }
}

impl Topical for Flashcard {
    fn topic(&self) -> &str {
        &self.topic
    }
}
