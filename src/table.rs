//! CSV loading for the three uploadable tables.
use std::fmt::Display;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::{
    errors::ApiError,
    models::{Flashcard, QuizItem, ResultRow, ResultTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Results,
    Quiz,
    Flashcards,
}

impl TableKind {
    fn required_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Results => &["Topic", "Correct"],
            TableKind::Quiz => &[
                "Topic", "Question", "Option1", "Option2", "Option3", "Option4", "Answer",
            ],
            TableKind::Flashcards => &["Topic", "Question", "Answer"],
        }
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Results => write!(f, "mock test file"),
            TableKind::Quiz => write!(f, "quiz file"),
            TableKind::Flashcards => write!(f, "flashcards file"),
        }
    }
}

#[derive(Deserialize)]
struct QuizRecord {
    #[serde(rename = "Topic")]
    topic: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Option1")]
    option1: String,
    #[serde(rename = "Option2")]
    option2: String,
    #[serde(rename = "Option3")]
    option3: String,
    #[serde(rename = "Option4")]
    option4: String,
    #[serde(rename = "Answer")]
    answer: String,
}

impl From<QuizRecord> for QuizItem {
    fn from(r: QuizRecord) -> Self {
        QuizItem {
            topic: r.topic,
            question: r.question,
            options: [r.option1, r.option2, r.option3, r.option4],
            answer: r.answer,
        }
    }
}

#[derive(Deserialize)]
struct FlashcardRecord {
    #[serde(rename = "Topic")]
    topic: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Answer")]
    answer: String,
}

impl From<FlashcardRecord> for Flashcard {
    fn from(r: FlashcardRecord) -> Self {
        Flashcard {
            topic: r.topic,
            question: r.question,
            answer: r.answer,
        }
    }
}

/// Only an explicit false-like cell marks a row as incorrect; anything
/// unrecognised (including an empty cell) is not counted as a mistake.
pub fn is_false_like(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "false" | "f" | "0" | "no" | "n"
    )
}

fn column_index(
    kind: TableKind,
    headers: &StringRecord,
    column: &str,
) -> Result<usize, ApiError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ApiError::MissingColumn {
            kind,
            column: column.to_string(),
        })
}

fn check_columns(kind: TableKind, headers: &StringRecord) -> Result<(), ApiError> {
    for column in kind.required_columns() {
        column_index(kind, headers, column)?;
    }
    Ok(())
}

fn reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new().trim(Trim::All).from_reader(bytes)
}

pub fn read_results(bytes: &[u8]) -> Result<ResultTable, ApiError> {
    let kind = TableKind::Results;
    let mut rdr = reader(bytes);
    let headers = rdr
        .headers()
        .map_err(|e| ApiError::CsvError(kind, e))?
        .clone();
    check_columns(kind, &headers)?;
    let topic_idx = column_index(kind, &headers, "Topic")?;
    let correct_idx = column_index(kind, &headers, "Correct")?;

    let mut table = ResultTable {
        headers: headers.iter().map(str::to_string).collect(),
        ..ResultTable::default()
    };
    for record in rdr.records() {
        let record = record.map_err(|e| ApiError::CsvError(kind, e))?;
        table.rows.push(ResultRow {
            topic: record.get(topic_idx).unwrap_or_default().to_string(),
            correct: !is_false_like(record.get(correct_idx).unwrap_or_default()),
        });
        table.records.push(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

fn read_typed<R, T>(kind: TableKind, bytes: &[u8]) -> Result<Vec<T>, ApiError>
where
    R: for<'de> Deserialize<'de>,
    T: From<R>,
{
    let mut rdr = reader(bytes);
    let headers = rdr
        .headers()
        .map_err(|e| ApiError::CsvError(kind, e))?
        .clone();
    check_columns(kind, &headers)?;
    rdr.deserialize::<R>()
        .map(|record| record.map(T::from).map_err(|e| ApiError::CsvError(kind, e)))
        .collect()
}

pub fn read_quiz_bank(bytes: &[u8]) -> Result<Vec<QuizItem>, ApiError> {
    read_typed::<QuizRecord, QuizItem>(TableKind::Quiz, bytes)
}

pub fn read_flashcards(bytes: &[u8]) -> Result<Vec<Flashcard>, ApiError> {
    read_typed::<FlashcardRecord, Flashcard>(TableKind::Flashcards, bytes)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_results() {
        let sample = "Student,Topic,Correct\n\
Asha,Algebra,False\n\
Asha,Geometry,True\n\
Asha, Algebra ,false\n\
Asha,Probability,maybe\n";
        let table = read_results(sample.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Student", "Topic", "Correct"]);
        assert_eq!(table.records.len(), 4);
        assert_eq!(
            table.rows,
            vec![
                ResultRow {
                    topic: "Algebra".into(),
                    correct: false,
                },
                ResultRow {
                    topic: "Geometry".into(),
                    correct: true,
                },
                ResultRow {
                    topic: "Algebra".into(),
                    correct: false,
                },
                ResultRow {
                    topic: "Probability".into(),
                    correct: true,
                },
            ]
        );
    }

    #[test]
    fn test_blank_topic_cells_are_kept_but_never_weak() {
        let table = read_results(b"Topic,Correct\n,False\n  ,False\nAlgebra,True\n").unwrap();
        assert_eq!(table.records.len(), 3);
        assert!(crate::analysis::aggregate(&table.rows).is_empty());
        assert!(crate::analysis::plan_from_rows(&table.rows).is_none());
    }

    #[test]
    fn test_ragged_row_is_a_csv_error() {
        let err = read_results(b"Topic,Correct\nAlgebra,False,extra\n").unwrap_err();
        assert!(matches!(err, ApiError::CsvError(TableKind::Results, _)));
    }

    #[test]
    fn test_missing_column() {
        let err = read_results(b"Topic,Score\nAlgebra,3\n").unwrap_err();
        match err {
            ApiError::MissingColumn { kind, column } => {
                assert_eq!(kind, TableKind::Results);
                assert_eq!(column, "Correct");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            read_results(b""),
            Err(ApiError::MissingColumn { .. })
        ));
        assert!(matches!(
            read_flashcards(b"Topic,Question\nAlgebra,What is x?\n"),
            Err(ApiError::MissingColumn { kind: TableKind::Flashcards, .. })
        ));
    }

    #[test]
    fn test_read_quiz_bank() {
        let sample = "Topic,Question,Option1,Option2,Option3,Option4,Answer,Source\n\
Algebra,2x = 4. x?,1,2,3,4,2,book\n\
Probability,P(heads)?,0.25,0.5,0.75,1,0.5,web\n";
        let items = read_quiz_bank(sample.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].topic, "Algebra");
        assert_eq!(items[0].options, ["1", "2", "3", "4"].map(String::from));
        assert_eq!(items[1].answer, "0.5");
    }

    #[test]
    fn test_read_flashcards() {
        let sample = "Topic,Question,Answer\nKinematics,\"v = u + at, what is a?\",acceleration\n";
        let cards = read_flashcards(sample.as_bytes()).unwrap();
        assert_eq!(
            cards,
            vec![Flashcard {
                topic: "Kinematics".into(),
                question: "v = u + at, what is a?".into(),
                answer: "acceleration".into(),
            }]
        );
    }

    #[test]
    fn test_false_like_cells() {
        for cell in ["False", "FALSE", " false ", "0", "no", "N", "f"] {
            assert!(is_false_like(cell), "{cell}");
        }
        for cell in ["True", "1", "", "nan", "yes"] {
            assert!(!is_false_like(cell), "{cell}");
        }
    }
}
