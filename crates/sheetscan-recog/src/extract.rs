//! Answer extraction
//!
//! [`extract`] runs the whole reader over one canvas:
//!
//! 1. locate the registration marks and fit the nominal-to-canvas map
//! 2. read the identification fields
//! 3. classify every choice question with the fill detector and every
//!    free-text question with the ink estimator
//! 4. aggregate [`QualityMetrics`]
//!
//! A sheet whose marks cannot be matched is not an error: the result
//! carries the failure, no answers and the `poor_image_quality` flag.

use crate::fill::detect_fields;
use crate::identify::identify;
use crate::ink::estimate_region;
use crate::register::Registration;
use crate::result::{
    AnswerResult, ExtractionMethod, Identification, ImageFlag, QualityBucket, QualityMetrics,
    RectificationFailure, ScanResult,
};
use crate::{RecogError, RecogResult, ScanConfig};
use sheetscan_core::{Canvas, Question, TemplateLayout};
use sheetscan_transform::AffineMatrix;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

fn read_question(
    canvas: &Canvas,
    transform: &AffineMatrix,
    question: &Question,
    config: &ScanConfig,
) -> AnswerResult {
    let mut result = AnswerResult {
        question_id: question.question_id.clone(),
        question_number: question.question_number,
        question_type: question.question_type,
        selected_answer: None,
        confidence: 0.0,
        warnings: BTreeSet::new(),
        needs_review: true,
        method: ExtractionMethod::Skipped,
        raw_fill_data: Vec::new(),
        ink_density: None,
    };

    if question.question_type.is_choice() {
        let outcome = detect_fields(canvas, transform, &question.answer_fields, config);
        result.selected_answer = outcome.selected;
        result.confidence = outcome.confidence;
        result.warnings = outcome.warnings;
        result.needs_review = outcome.needs_review;
        result.method = ExtractionMethod::BubbleDetection;
        result.raw_fill_data = outcome.samples;
    } else if config.features.handwriting_detection {
        if let Some(region) = &question.ocr_region {
            let outcome = estimate_region(canvas, transform, region, config);
            result.selected_answer = outcome.selected;
            result.confidence = outcome.confidence;
            result.warnings = outcome.warnings;
            result.needs_review = outcome.needs_review;
            result.method = ExtractionMethod::InkDensity;
            result.ink_density = outcome.density;
        }
    }

    debug!(
        question = %result.question_id,
        selected = ?result.selected_answer,
        confidence = result.confidence,
        "read question"
    );
    result
}

/// Extract answers from a scanned sheet.
///
/// # Arguments
///
/// * `canvas` - Sheet to read; its dpi converts layout millimeters
/// * `layout` - Geometry of the sheet
/// * `config` - Thresholds and enabled features
///
/// # Returns
///
/// A [`ScanResult`] with one answer per layout question, in layout order.
/// When too few registration marks are found the result has
/// [`ScanResult::failure`] set and no answers.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] for an invalid configuration
/// and [`RecogError::Core`] for an invalid layout.
///
/// # Example
///
/// ```no_run
/// use sheetscan_core::TemplateLayout;
/// use sheetscan_recog::{ScanConfig, extract};
/// # fn demo(canvas: &sheetscan_core::Canvas) -> sheetscan_recog::RecogResult<()> {
/// let layout = TemplateLayout::from_json_file("layout.json")?;
/// let result = extract(canvas, &layout, &ScanConfig::default())?;
/// for answer in &result.answers {
///     println!("{}: {:?}", answer.question_id, answer.selected_answer);
/// }
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all, fields(width = canvas.width(), height = canvas.height(), dpi = canvas.dpi()))]
pub fn extract(
    canvas: &Canvas,
    layout: &TemplateLayout,
    config: &ScanConfig,
) -> RecogResult<ScanResult> {
    config.validate()?;
    layout.validate()?;

    let registration = Registration::locate(canvas, layout, config);
    let transform = match registration.correction(config) {
        Ok(t) => t,
        Err(RecogError::RectificationFailure { found, required }) => {
            warn!(found, required, "too few registration marks, sheet not read");
            return Ok(ScanResult::unrectified(
                registration.report(None),
                RectificationFailure { found, required },
            ));
        }
        Err(e) => return Err(e),
    };

    let identification = if config.features.identification {
        identify(canvas, &transform, &layout.id_fields, config)
    } else {
        Identification::default()
    };

    let answers: Vec<AnswerResult> = layout
        .questions
        .iter()
        .map(|q| read_question(canvas, &transform, q, config))
        .collect();

    let quality = QualityMetrics::from_answers(&answers);
    let mut flags = BTreeSet::new();
    if quality.quality == QualityBucket::Poor {
        flags.insert(ImageFlag::PoorImageQuality);
    }

    info!(
        marks = registration.found_count(),
        answered = quality.answered_count,
        flagged = quality.flagged_count,
        confidence = quality.overall_confidence,
        "extracted sheet"
    );

    Ok(ScanResult {
        identification,
        answers,
        quality,
        flags,
        rectification: registration.report(Some(&transform)),
        failure: None,
    })
}
