//! Sheet synthesis
//!
//! Builds one sheet from a layout, a question order and
//! [`SynthOptions`]. All validation happens before the first pixel is
//! drawn; the returned [`GroundTruth`] records what each field was meant
//! to show.

use crate::render::{
    draw_answer_field, draw_handwriting, draw_region_outline, draw_registration_mark,
};
use crate::{FillDecision, SynthError, SynthOptions, SynthResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sheetscan_core::{
    Canvas, CanvasMut, DEFAULT_BACKGROUND, HANDWRITTEN_MARKER, IdField, Question, QuestionOrder,
    TemplateLayout,
};
use tracing::{debug, info, instrument};

/// Intended content of one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthEntry {
    pub question_id: String,
    pub decision: FillDecision,
    /// Correct option from the key (`None` for free text)
    pub correct_answer: Option<String>,
    /// What a perfect reader should report for this question
    pub expected_answer: Option<String>,
}

/// Ground truth of a synthetic sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruth {
    pub version_id: String,
    pub student_id: String,
    /// One entry per layout question, in layout order
    pub answers: Vec<TruthEntry>,
}

impl GroundTruth {
    /// Look up the entry for a question.
    pub fn entry(&self, question_id: &str) -> Option<&TruthEntry> {
        self.answers.iter().find(|e| e.question_id == question_id)
    }
}

/// A rendered sheet and its ground truth
#[derive(Debug, Clone)]
pub struct SyntheticSheet {
    pub canvas: Canvas,
    pub truth: GroundTruth,
}

/// A validated question ready to render
struct PlannedQuestion<'a> {
    question: &'a Question,
    correct: Option<&'a str>,
}

fn resolve_version(order: &QuestionOrder, options: &SynthOptions) -> SynthResult<String> {
    if let Some(v) = &options.version_id {
        return Ok(v.clone());
    }
    if let Some(v) = order.version_for_student(&options.student_id) {
        return Ok(v.to_string());
    }
    // a single-version test needs no assignment
    match order.versions.keys().collect::<Vec<_>>().as_slice() {
        [only] => Ok((*only).clone()),
        _ => Err(SynthError::UnknownVersion(options.student_id.clone())),
    }
}

fn check_identifier(
    field: Option<&IdField>,
    name: &'static str,
    value: &str,
) -> SynthResult<()> {
    match field {
        Some(IdField::BubbleGrid(grid)) if !value.is_empty() && !grid.accepts(value) => {
            Err(SynthError::InvalidIdentifier {
                field: name,
                value: value.to_string(),
            })
        }
        _ => Ok(()),
    }
}

fn plan<'a>(
    layout: &'a TemplateLayout,
    order: &'a QuestionOrder,
    version_id: &str,
) -> SynthResult<Vec<PlannedQuestion<'a>>> {
    let version = order
        .version(version_id)
        .ok_or_else(|| SynthError::UnknownVersion(version_id.to_string()))?;

    layout
        .questions
        .iter()
        .map(|question| {
            let ordered = version
                .question(&question.question_id)
                .ok_or_else(|| SynthError::UnknownQuestion(question.question_id.clone()))?;
            if !question.question_type.is_choice() {
                return Ok(PlannedQuestion {
                    question,
                    correct: None,
                });
            }
            let correct = ordered
                .correct_answer
                .as_deref()
                .ok_or_else(|| SynthError::MissingAnswer(question.question_id.clone()))?;
            if !question.labels().contains(&correct) {
                return Err(SynthError::UnknownAnswerLabel {
                    question_id: question.question_id.clone(),
                    label: correct.to_string(),
                });
            }
            Ok(PlannedQuestion {
                question,
                correct: Some(correct),
            })
        })
        .collect()
}

/// Write an identifier into its field.
fn draw_identifier(canvas: &mut CanvasMut, field: &IdField, value: &str, rng: &mut StdRng) {
    match field {
        IdField::BubbleGrid(grid) => {
            let symbols: Vec<char> = value.chars().collect();
            for position in 0..grid.positions {
                let wanted = symbols.get(position as usize).map(|c| c.to_string());
                for f in grid.row_fields(position) {
                    let filled = wanted.as_deref() == Some(f.label.as_str());
                    draw_answer_field(canvas, &f, filled);
                }
            }
        }
        IdField::Text(region) => {
            draw_region_outline(canvas, region);
            if !value.is_empty() {
                draw_handwriting(canvas, region, rng);
            }
        }
    }
}

/// Render a synthetic answer sheet.
///
/// The version is `options.version_id` if set, else the student's
/// assignment in `order`, else the only version of `order`. Each question
/// of the layout gets one [`FillDecision`]; the sheet is then distorted
/// by rotation, skew and noise in that order.
///
/// # Errors
///
/// - [`SynthError::InvalidParameter`] / [`SynthError::Transform`] for bad options
/// - [`SynthError::Core`] if the layout is invalid
/// - [`SynthError::UnknownVersion`], [`SynthError::UnknownQuestion`],
///   [`SynthError::MissingAnswer`], [`SynthError::UnknownAnswerLabel`] if
///   the layout and the answer key disagree
/// - [`SynthError::InvalidIdentifier`] if an id does not fit its grid
#[instrument(skip_all, fields(seed = options.seed, student = %options.student_id))]
pub fn synthesize(
    layout: &TemplateLayout,
    order: &QuestionOrder,
    options: &SynthOptions,
) -> SynthResult<SyntheticSheet> {
    options.validate()?;
    layout.validate()?;

    let version_id = resolve_version(order, options)?;
    let planned = plan(layout, order, &version_id)?;
    check_identifier(layout.id_fields.version_id.as_ref(), "version_id", &version_id)?;
    check_identifier(
        layout.id_fields.student_id.as_ref(),
        "student_id",
        &options.student_id,
    )?;

    let mut rng = StdRng::seed_from_u64(options.seed);

    let decisions: Vec<FillDecision> = planned
        .iter()
        .map(|p| match p.correct {
            Some(correct) => FillDecision::resolve(
                correct,
                &p.question.labels(),
                options.accuracy,
                options.blank_rate,
                &mut rng,
            ),
            None => FillDecision::resolve_free_text(options.accuracy, &mut rng),
        })
        .collect();

    let (width, height) = layout.page_info.pixel_size();
    let mut canvas = CanvasMut::new(width, height, DEFAULT_BACKGROUND)?;
    canvas.set_dpi(layout.page_info.dpi)?;

    for mark in &layout.registration_marks {
        draw_registration_mark(&mut canvas, mark);
    }
    if let Some(field) = &layout.id_fields.version_id {
        draw_identifier(&mut canvas, field, &version_id, &mut rng);
    }
    if let Some(field) = &layout.id_fields.student_id {
        draw_identifier(&mut canvas, field, &options.student_id, &mut rng);
    }

    let mut answers = Vec::with_capacity(planned.len());
    for (p, decision) in planned.iter().zip(decisions) {
        let q = p.question;
        let expected_answer = match p.correct {
            Some(correct) => {
                let marked = decision.marked(correct);
                for f in &q.answer_fields {
                    draw_answer_field(&mut canvas, f, marked == Some(f.label.as_str()));
                }
                marked.map(str::to_string)
            }
            None => {
                if let Some(region) = &q.ocr_region {
                    draw_region_outline(&mut canvas, region);
                    if decision == FillDecision::Correct {
                        draw_handwriting(&mut canvas, region, &mut rng);
                    }
                }
                (decision == FillDecision::Correct).then(|| HANDWRITTEN_MARKER.to_string())
            }
        };
        debug!(question = %q.question_id, ?decision, "rendered question");
        answers.push(TruthEntry {
            question_id: q.question_id.clone(),
            decision,
            correct_answer: p.correct.map(str::to_string),
            expected_answer,
        });
    }

    let clean: Canvas = canvas.into();
    let canvas = options.distortion().apply(&clean, &mut rng)?;

    info!(
        version = %version_id,
        questions = answers.len(),
        width,
        height,
        "synthesized sheet"
    );

    Ok(SyntheticSheet {
        canvas,
        truth: GroundTruth {
            version_id,
            student_id: options.student_id.clone(),
            answers,
        },
    })
}
