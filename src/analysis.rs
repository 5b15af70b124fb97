//! Weak-topic aggregation, revision planning, quiz scoring and card selection.
use std::collections::{HashMap, HashSet};

use crate::models::{
    PlanDay, ProgressSummary, QuizItem, ResultRow, RevisionPlan, TopicBar, TopicCount, Topical,
};

pub const PLAN_DAYS: usize = 7;

const STUDY_MATERIAL: &[(&str, &str)] = &[
    ("Quadratic Equations", "https://youtu.be/QUADRATIC_VIDEO"),
    ("Probability", "https://youtu.be/PROBABILITY_VIDEO"),
    ("Kinematics", "https://youtu.be/KINEMATICS_VIDEO"),
    ("Current Electricity", "https://youtu.be/ELECTRICITY_VIDEO"),
    ("Organic Reactions", "https://youtu.be/ORGANIC_REACTIONS_VIDEO"),
];

/// An incorrect row with a blank topic names no topic and is not a mistake
/// against any of them.
fn is_mistake(row: &ResultRow) -> bool {
    !row.correct && !row.topic.trim().is_empty()
}

/// Mistakes per topic, most mistakes first. Ties keep the order in which
/// the topic first appeared among the incorrect rows.
pub fn aggregate(rows: &[ResultRow]) -> Vec<TopicCount> {
    let mut counts: Vec<TopicCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for row in rows.iter().filter(|row| is_mistake(row)) {
        match positions.get(row.topic.as_str()) {
            Some(&idx) => counts[idx].mistakes += 1,
            None => {
                positions.insert(row.topic.as_str(), counts.len());
                counts.push(TopicCount {
                    topic: row.topic.clone(),
                    mistakes: 1,
                });
            }
        }
    }
    // stable sort keeps first-seen order for equal counts
    counts.sort_by(|a, b| b.mistakes.cmp(&a.mistakes));
    counts
}

pub fn weak_topics(rows: &[ResultRow]) -> HashSet<String> {
    rows.iter()
        .filter(|row| is_mistake(row))
        .map(|row| row.topic.clone())
        .collect()
}

/// Fills seven days by cycling through the ranked topics. `None` means there
/// is nothing to plan.
pub fn plan(ranked_topics: &[String]) -> Option<RevisionPlan> {
    if ranked_topics.is_empty() {
        return None;
    }
    let days = ranked_topics
        .iter()
        .cycle()
        .take(PLAN_DAYS)
        .enumerate()
        .map(|(i, topic)| PlanDay {
            day: i + 1,
            topic: topic.clone(),
        })
        .collect();
    Some(RevisionPlan { days })
}

pub fn plan_from_rows(rows: &[ResultRow]) -> Option<RevisionPlan> {
    let ranked: Vec<String> = aggregate(rows).into_iter().map(|c| c.topic).collect();
    plan(&ranked)
}

pub fn study_material(topic: &str) -> Option<&'static str> {
    STUDY_MATERIAL
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, url)| *url)
}

pub fn in_weak_topics<T: Topical + Clone>(items: &[T], weak: &HashSet<String>) -> Vec<T> {
    items
        .iter()
        .filter(|item| weak.contains(item.topic()))
        .cloned()
        .collect()
}

/// Counts answered items whose response matches the answer exactly.
/// Unanswered items count neither way.
pub fn score(items: &[QuizItem], responses: &HashMap<usize, String>) -> usize {
    items
        .iter()
        .enumerate()
        .filter(|(idx, item)| responses.get(idx).is_some_and(|r| *r == item.answer))
        .count()
}

/// 1-based card selection.
pub fn select<T>(cards: &[T], index: usize) -> Option<&T> {
    index.checked_sub(1).and_then(|i| cards.get(i))
}

pub fn progress(rows: &[ResultRow]) -> ProgressSummary {
    let counts = aggregate(rows);
    let total_wrong = counts.iter().map(|c| c.mistakes).sum();
    let max = counts.first().map(|c| c.mistakes).unwrap_or(0);
    let topics = counts
        .iter()
        .map(|c| TopicBar {
            topic: c.topic.clone(),
            mistakes: c.mistakes,
            percent: if max == 0 {
                0
            } else {
                (c.mistakes * 100 / max) as u32
            },
        })
        .collect();
    ProgressSummary {
        total_wrong,
        weak_topic_count: counts.len(),
        topics,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(topic: &str, correct: bool) -> ResultRow {
        ResultRow {
            topic: topic.to_string(),
            correct,
        }
    }

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn plan_topics(plan: &RevisionPlan) -> Vec<&str> {
        plan.days.iter().map(|d| d.topic.as_str()).collect()
    }

    #[test]
    fn test_aggregate_example() {
        let rows = vec![
            row("Algebra", false),
            row("Algebra", false),
            row("Geometry", true),
            row("Geometry", false),
        ];
        let ranked = aggregate(&rows);
        assert_eq!(
            ranked,
            vec![
                TopicCount {
                    topic: "Algebra".into(),
                    mistakes: 2,
                },
                TopicCount {
                    topic: "Geometry".into(),
                    mistakes: 1,
                },
            ]
        );

        let plan = plan_from_rows(&rows).unwrap();
        assert_eq!(
            plan_topics(&plan),
            vec!["Algebra", "Geometry", "Algebra", "Geometry", "Algebra", "Geometry", "Algebra"]
        );
        let days: Vec<usize> = plan.days.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_aggregate_ties_keep_first_seen_order() {
        let rows = vec![
            row("Kinematics", false),
            row("Probability", false),
            row("Optics", true),
            row("Probability", false),
            row("Optics", false),
            row("Kinematics", false),
            row("Algebra", false),
        ];
        let ranked: Vec<(String, usize)> = aggregate(&rows)
            .into_iter()
            .map(|c| (c.topic, c.mistakes))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("Kinematics".to_string(), 2),
                ("Probability".to_string(), 2),
                ("Optics".to_string(), 1),
                ("Algebra".to_string(), 1),
            ]
        );
        let total: usize = aggregate(&rows).iter().map(|c| c.mistakes).sum();
        assert_eq!(total, rows.iter().filter(|r| !r.correct).count());
    }

    #[test]
    fn test_no_incorrect_rows() {
        assert!(aggregate(&[]).is_empty());
        let rows = vec![row("Algebra", true), row("Geometry", true)];
        assert!(aggregate(&rows).is_empty());
        assert!(weak_topics(&rows).is_empty());
        assert!(plan_from_rows(&rows).is_none());
        assert!(plan(&[]).is_none());
    }

    #[test]
    fn test_blank_topics_are_not_weak() {
        let rows = vec![
            row("", false),
            row("  ", false),
            row("Algebra", true),
        ];
        assert!(aggregate(&rows).is_empty());
        assert!(weak_topics(&rows).is_empty());
        assert!(plan_from_rows(&rows).is_none());

        let rows = vec![row("", false), row("Optics", false), row(" ", false)];
        let plan = plan_from_rows(&rows).unwrap();
        assert!(plan.days.iter().all(|d| d.topic == "Optics"));
        assert_eq!(progress(&rows).total_wrong, 1);
    }

    #[test]
    fn test_plan_cycles_short_lists() {
        for len in 1..=PLAN_DAYS {
            let ranked: Vec<String> = (1..=len).map(|i| format!("T{i}")).collect();
            let plan = plan(&ranked).unwrap();
            assert_eq!(plan.days.len(), PLAN_DAYS);
            for day in &plan.days {
                assert_eq!(day.topic, ranked[(day.day - 1) % len]);
            }
        }
    }

    #[test]
    fn test_plan_truncates_long_lists() {
        let ranked = topics(&["T1", "T2", "T3", "T4", "T5", "T6", "T7", "T8"]);
        let plan = plan(&ranked).unwrap();
        assert_eq!(
            plan_topics(&plan),
            vec!["T1", "T2", "T3", "T4", "T5", "T6", "T7"]
        );
    }

    fn quiz_item(topic: &str, answer: &str) -> QuizItem {
        QuizItem {
            topic: topic.to_string(),
            question: format!("{topic}?"),
            options: ["a", "b", "c", "d"].map(String::from),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_score_ignores_unanswered() {
        let items = vec![quiz_item("Algebra", "b"), quiz_item("Geometry", "c")];
        let responses = HashMap::from([(0, "b".to_string())]);
        assert_eq!(score(&items, &responses), 1);
        assert_eq!(items.len(), 2);

        let responses = HashMap::from([(0, "a".to_string()), (1, "c".to_string())]);
        assert_eq!(score(&items, &responses), 1);
        assert_eq!(score(&items, &HashMap::new()), 0);
    }

    #[test]
    fn test_filter_by_weak_topics() {
        let rows = vec![row("Algebra", false), row("Geometry", true)];
        let weak = weak_topics(&rows);
        let items = vec![
            quiz_item("Geometry", "a"),
            quiz_item("Algebra", "b"),
            quiz_item("Optics", "c"),
        ];
        let in_scope = in_weak_topics(&items, &weak);
        assert_eq!(in_scope, vec![quiz_item("Algebra", "b")]);
    }

    #[test]
    fn test_select_is_one_based() {
        let cards = vec!["first", "second"];
        assert_eq!(select(&cards, 1), Some(&"first"));
        assert_eq!(select(&cards, 2), Some(&"second"));
        assert_eq!(select(&cards, 0), None);
        assert_eq!(select(&cards, 3), None);
    }

    #[test]
    fn test_progress_summary() {
        let rows = vec![
            row("Probability", false),
            row("Probability", false),
            row("Probability", false),
            row("Probability", false),
            row("Kinematics", false),
            row("Kinematics", true),
        ];
        let summary = progress(&rows);
        assert_eq!(summary.total_wrong, 5);
        assert_eq!(summary.weak_topic_count, 2);
        assert_eq!(summary.topics[0].percent, 100);
        assert_eq!(summary.topics[1].percent, 25);

        let empty = progress(&[]);
        assert_eq!(empty.total_wrong, 0);
        assert!(empty.topics.is_empty());
    }

    #[test]
    fn test_study_material_lookup() {
        assert_eq!(
            study_material("Probability"),
            Some("https://youtu.be/PROBABILITY_VIDEO")
        );
        assert_eq!(study_material("Algebra"), None);
    }
}
