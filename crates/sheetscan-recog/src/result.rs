//! Extraction results
//!
//! [`ScanResult`] is the serializable output of one extraction: the
//! identification readings, one [`AnswerResult`] per layout question,
//! aggregate [`QualityMetrics`] and the registration report.

use crate::fill::FillSample;
use crate::register::RectificationReport;
use serde::{Deserialize, Serialize};
use sheetscan_core::QuestionType;
use std::collections::BTreeSet;
use std::fmt;

/// Per-field warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    /// No bubble reached the fill threshold
    NoBubbleFilled,
    /// More than one bubble reached the fill threshold
    MultipleBubblesFilled,
    /// Confidence fell below the review threshold
    LowConfidence,
    /// A free-text region held no detectable writing
    OcrFailed,
    /// A free-text region does not lie on the rectified canvas
    RegionNotFound,
}

impl Warning {
    /// Wire name of the warning.
    pub fn as_str(self) -> &'static str {
        match self {
            Warning::NoBubbleFilled => "no_bubble_filled",
            Warning::MultipleBubblesFilled => "multiple_bubbles_filled",
            Warning::LowConfidence => "low_confidence",
            Warning::OcrFailed => "ocr_failed",
            Warning::RegionNotFound => "region_not_found",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an answer was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    BubbleDetection,
    InkDensity,
    /// The stage for this question type is disabled
    Skipped,
}

/// Extraction result for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question_id: String,
    pub question_number: u32,
    pub question_type: QuestionType,
    /// Label of the selected option, the handwriting marker, or `None`
    pub selected_answer: Option<String>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    pub warnings: BTreeSet<Warning>,
    pub needs_review: bool,
    pub method: ExtractionMethod,
    /// Fill ratio of every option, in layout order (choice questions)
    #[serde(default)]
    pub raw_fill_data: Vec<FillSample>,
    /// Dark-pixel density of the region (free-text questions)
    #[serde(default)]
    pub ink_density: Option<f64>,
}

impl AnswerResult {
    /// Whether the answer raised a warning or needs manual review.
    pub fn is_flagged(&self) -> bool {
        self.needs_review || !self.warnings.is_empty()
    }
}

/// Reading of one identification field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdReading {
    /// Decoded identifier, or the handwriting marker for text fields
    pub value: Option<String>,
    pub confidence: f64,
    pub warnings: BTreeSet<Warning>,
    pub needs_review: bool,
}

/// Identification readings of a sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Identification {
    pub version_id: Option<IdReading>,
    pub student_id: Option<IdReading>,
}

/// Coarse image quality derived from the overall confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBucket {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityBucket {
    /// Bucket for an overall confidence.
    ///
    /// `>= 0.9` excellent, `>= 0.7` good, `>= 0.5` fair, otherwise poor.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            QualityBucket::Excellent
        } else if confidence >= 0.7 {
            QualityBucket::Good
        } else if confidence >= 0.5 {
            QualityBucket::Fair
        } else {
            QualityBucket::Poor
        }
    }
}

/// Aggregate quality of an extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Mean confidence over answered questions; over every question when
    /// none were answered, and 0 when there are no questions
    pub overall_confidence: f64,
    /// Questions with a selected answer
    pub answered_count: usize,
    /// Questions with a warning or routed to manual review
    pub flagged_count: usize,
    /// Questions carrying [`Warning::LowConfidence`]
    pub low_confidence_count: usize,
    pub quality: QualityBucket,
}

impl QualityMetrics {
    /// Compute the metrics of a list of answers.
    pub fn from_answers(answers: &[AnswerResult]) -> Self {
        let answered: Vec<f64> = answers
            .iter()
            .filter(|a| a.selected_answer.is_some())
            .map(|a| a.confidence)
            .collect();
        // An unanswered sheet is judged by how clearly its fields read blank
        let overall_confidence = if !answered.is_empty() {
            answered.iter().sum::<f64>() / answered.len() as f64
        } else if !answers.is_empty() {
            answers.iter().map(|a| a.confidence).sum::<f64>() / answers.len() as f64
        } else {
            0.0
        };
        Self {
            overall_confidence,
            answered_count: answered.len(),
            flagged_count: answers.iter().filter(|a| a.is_flagged()).count(),
            low_confidence_count: answers
                .iter()
                .filter(|a| a.warnings.contains(&Warning::LowConfidence))
                .count(),
            quality: QualityBucket::from_confidence(overall_confidence),
        }
    }
}

/// Sheet-level flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFlag {
    /// Rectification failed or the overall quality is poor
    PoorImageQuality,
}

/// Why a sheet could not be rectified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectificationFailure {
    pub found: usize,
    pub required: usize,
}

/// Output of one extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub identification: Identification,
    /// One entry per layout question, in layout order; empty when the
    /// sheet could not be rectified
    pub answers: Vec<AnswerResult>,
    pub quality: QualityMetrics,
    pub flags: BTreeSet<ImageFlag>,
    pub rectification: RectificationReport,
    /// Set when too few registration marks were found
    pub failure: Option<RectificationFailure>,
}

impl ScanResult {
    /// Result for a sheet whose marks could not be matched.
    pub fn unrectified(rectification: RectificationReport, failure: RectificationFailure) -> Self {
        Self {
            identification: Identification::default(),
            answers: Vec::new(),
            quality: QualityMetrics::from_answers(&[]),
            flags: BTreeSet::from([ImageFlag::PoorImageQuality]),
            rectification,
            failure: Some(failure),
        }
    }

    /// Look up the result for a question.
    pub fn answer(&self, question_id: &str) -> Option<&AnswerResult> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Whether the sheet was registered against its layout.
    pub fn is_rectified(&self) -> bool {
        self.failure.is_none()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
