//! Question order and answer key
//!
//! Per-version question sequences with their correct answers, plus the
//! student-to-version assignment table. Only the synthesizer reads the
//! correct answers; extraction never sees them.

use crate::error::{Error, Result};
use crate::layout::QuestionType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer value reported for a free-text region that contains writing.
pub const HANDWRITTEN_MARKER: &str = "[handwritten content detected]";

/// A selectable option as listed in the answer key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
}

/// One question of a version, in presentation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedQuestion {
    pub question_number: u32,
    pub question_id: String,
    pub question_type: QuestionType,
    /// Correct option label for choice questions, `None` for free text
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// The question sequence of one test version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionOrder {
    pub version_id: String,
    pub questions: Vec<OrderedQuestion>,
}

impl VersionOrder {
    /// Look up a question by id.
    pub fn question(&self, question_id: &str) -> Option<&OrderedQuestion> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }
}

/// All versions of a test and the student assignments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionOrder {
    pub versions: BTreeMap<String, VersionOrder>,
    #[serde(default)]
    pub student_assignments: BTreeMap<String, String>,
}

impl QuestionOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version keyed by its id.
    pub fn with_version(mut self, version: VersionOrder) -> Self {
        self.versions.insert(version.version_id.clone(), version);
        self
    }

    /// Assign a student to a version.
    pub fn with_assignment(mut self, student_id: &str, version_id: &str) -> Self {
        self.student_assignments
            .insert(student_id.to_string(), version_id.to_string());
        self
    }

    pub fn version(&self, version_id: &str) -> Option<&VersionOrder> {
        self.versions.get(version_id)
    }

    /// The version a student is assigned to, if any.
    pub fn version_for_student(&self, student_id: &str) -> Option<&str> {
        self.student_assignments.get(student_id).map(String::as_str)
    }

    /// Parse a question order from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON and
    /// [`Error::InvalidLayout`] if a map key disagrees with the
    /// `version_id` it holds.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let order: Self = serde_json::from_str(json)?;
        if let Some((key, v)) = order.versions.iter().find(|(k, v)| **k != v.version_id) {
            return Err(Error::InvalidLayout(format!(
                "version key '{key}' holds version '{}'",
                v.version_id
            )));
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_JSON: &str = r#"{
        "versions": {
            "A": {
                "version_id": "A",
                "questions": [
                    {"question_number": 1, "question_id": "q1", "question_type": "multiple_choice",
                     "correct_answer": "C", "options": [{"label": "A"}, {"label": "B"}, {"label": "C"}]},
                    {"question_number": 2, "question_id": "q2", "question_type": "essay"}
                ]
            }
        },
        "student_assignments": {"1234": "A"}
    }"#;

    #[test]
    fn test_parse_order() {
        let order = QuestionOrder::from_json_str(ORDER_JSON).unwrap();
        let v = order.version("A").unwrap();
        assert_eq!(v.questions.len(), 2);
        assert_eq!(v.question("q1").unwrap().correct_answer.as_deref(), Some("C"));
        assert_eq!(v.question("q2").unwrap().correct_answer, None);
        assert_eq!(order.version_for_student("1234"), Some("A"));
        assert_eq!(order.version_for_student("9"), None);
    }

    #[test]
    fn test_mismatched_version_key() {
        let bad = ORDER_JSON.replacen("\"version_id\": \"A\"", "\"version_id\": \"B\"", 1);
        assert!(matches!(
            QuestionOrder::from_json_str(&bad),
            Err(Error::InvalidLayout(_))
        ));
    }
}
