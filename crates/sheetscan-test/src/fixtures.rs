//! Shared layouts and answer keys for regression tests
//!
//! The sample sheet is a 150 x 130 mm page with:
//! - four 4 mm marks, 10 mm in from each corner
//! - a one-position version grid (`ABCD`) and a three-digit student grid
//! - three multiple-choice questions (A-D), one true/false question and
//!   one short-answer region

use sheetscan_core::{
    AnswerField, AnswerOption, BubbleGrid, IdField, OrderedQuestion, Question, QuestionOrder,
    QuestionType, Region, TemplateLayout, VersionOrder,
};

/// Resolution used by most regression tests.
pub const TEST_DPI: u32 = 150;

fn choice_question(id: &str, number: u32, y_mm: f64, labels: &[&str]) -> Question {
    let qtype = if labels.len() == 2 {
        QuestionType::TrueFalse
    } else {
        QuestionType::MultipleChoice
    };
    labels
        .iter()
        .enumerate()
        .fold(Question::choice(id, number, qtype), |q, (j, label)| {
            q.with_field(AnswerField::circle(label, 30.0 + 20.0 * j as f64, y_mm, 3.0))
        })
}

/// The sample sheet layout at the given resolution.
pub fn sample_layout(dpi: u32) -> TemplateLayout {
    TemplateLayout::new(150.0, 130.0, dpi)
        .with_corner_marks(10.0, 4.0)
        .with_version_field(IdField::BubbleGrid(BubbleGrid {
            x_mm: 25.0,
            y_mm: 20.0,
            charset: "ABCD".into(),
            positions: 1,
            pitch_mm: 5.0,
            radius_mm: 1.8,
        }))
        .with_student_field(IdField::BubbleGrid(BubbleGrid {
            x_mm: 60.0,
            y_mm: 20.0,
            charset: "0123456789".into(),
            positions: 3,
            pitch_mm: 5.0,
            radius_mm: 1.8,
        }))
        .with_question(choice_question("q1", 1, 45.0, &["A", "B", "C", "D"]))
        .with_question(choice_question("q2", 2, 60.0, &["A", "B", "C", "D"]))
        .with_question(choice_question("q3", 3, 75.0, &["A", "B", "C", "D"]))
        .with_question(choice_question("q4", 4, 90.0, &["T", "F"]))
        .with_question(Question::free_text(
            "q5",
            5,
            QuestionType::ShortAnswer,
            Region::new(25.0, 100.0, 100.0, 12.0),
        ))
}

fn ordered(
    number: u32,
    id: &str,
    question_type: QuestionType,
    correct: Option<&str>,
    labels: &[&str],
) -> OrderedQuestion {
    OrderedQuestion {
        question_number: number,
        question_id: id.to_string(),
        question_type,
        correct_answer: correct.map(str::to_string),
        options: labels
            .iter()
            .map(|l| AnswerOption {
                label: l.to_string(),
            })
            .collect(),
    }
}

fn version(version_id: &str, answers: [&str; 4]) -> VersionOrder {
    let abcd = ["A", "B", "C", "D"];
    VersionOrder {
        version_id: version_id.to_string(),
        questions: vec![
            ordered(1, "q1", QuestionType::MultipleChoice, Some(answers[0]), &abcd),
            ordered(2, "q2", QuestionType::MultipleChoice, Some(answers[1]), &abcd),
            ordered(3, "q3", QuestionType::MultipleChoice, Some(answers[2]), &abcd),
            ordered(4, "q4", QuestionType::TrueFalse, Some(answers[3]), &["T", "F"]),
            ordered(5, "q5", QuestionType::ShortAnswer, None, &[]),
        ],
    }
}

/// Answer key for [`sample_layout`]: versions `A` and `B`, with student
/// `123` assigned to `A` and `456` to `B`.
pub fn sample_order() -> QuestionOrder {
    QuestionOrder::new()
        .with_version(version("A", ["B", "D", "A", "T"]))
        .with_version(version("B", ["C", "A", "D", "F"]))
        .with_assignment("123", "A")
        .with_assignment("456", "B")
}

/// A 100 x 80 mm sheet with a single A-D question of 3 mm bubbles.
pub fn single_question_layout(dpi: u32) -> TemplateLayout {
    let q = ["A", "B", "C", "D"].iter().enumerate().fold(
        Question::choice("q1", 1, QuestionType::MultipleChoice),
        |q, (j, label)| q.with_field(AnswerField::circle(label, 25.0 + 15.0 * j as f64, 40.0, 3.0)),
    );
    TemplateLayout::new(100.0, 80.0, dpi)
        .with_corner_marks(10.0, 4.0)
        .with_question(q)
}

/// Single-version answer key for [`single_question_layout`].
pub fn single_question_order(correct: &str) -> QuestionOrder {
    QuestionOrder::new().with_version(VersionOrder {
        version_id: "A".to_string(),
        questions: vec![ordered(
            1,
            "q1",
            QuestionType::MultipleChoice,
            Some(correct),
            &["A", "B", "C", "D"],
        )],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        sample_layout(TEST_DPI).validate().unwrap();
        single_question_layout(300).validate().unwrap();
        let order = sample_order();
        assert_eq!(order.version_for_student("456"), Some("B"));
        assert_eq!(
            order.version("A").unwrap().question("q4").unwrap().correct_answer.as_deref(),
            Some("T")
        );
    }
}
