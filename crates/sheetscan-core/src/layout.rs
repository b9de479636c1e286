//! Template layout geometry
//!
//! The layout is produced by the document generator and consumed
//! read-only here. All coordinates are millimeters measured from the
//! top-left corner of the page; centers for circles, top-left corners for
//! regions.
//!
//! # JSON shape
//!
//! ```text
//! {
//!   "page_info": { "width_mm": 210, "height_mm": 297, "dpi": 300 },
//!   "registration_marks": [ { "id": "top_left", "x_mm": 10, "y_mm": 10, "size_mm": 5 }, ... ],
//!   "id_fields": { "version_id": { "type": "bubble_grid", ... }, "student_id": { "type": "text", ... } },
//!   "questions": [
//!     { "question_id": "q1", "question_number": 1, "type": "multiple_choice",
//!       "answer_fields": [ { "label": "A", "x_mm": 30, "y_mm": 50, "radius_mm": 3 } ] },
//!     { "question_id": "q2", "question_number": 2, "type": "short_answer",
//!       "ocr_region": { "x_mm": 25, "y_mm": 70, "width_mm": 100, "height_mm": 12 } }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, mm_to_px};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

fn default_mark_size() -> f64 {
    5.0
}

fn default_bubble_radius() -> f64 {
    3.0
}

fn default_grid_pitch() -> f64 {
    5.0
}

fn default_grid_radius() -> f64 {
    1.8
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Physical page description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page width in millimeters
    pub width_mm: f64,
    /// Page height in millimeters
    pub height_mm: f64,
    /// Rendering resolution
    pub dpi: u32,
}

impl PageInfo {
    /// Canvas size in pixels at the page resolution.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            mm_to_px(self.width_mm, self.dpi).round() as u32,
            mm_to_px(self.height_mm, self.dpi).round() as u32,
        )
    }
}

/// Nominal position of one registration mark
///
/// `size_mm` is the radius of the solid disc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationMarkSpec {
    pub id: String,
    pub x_mm: f64,
    pub y_mm: f64,
    #[serde(default = "default_mark_size")]
    pub size_mm: f64,
}

impl RegistrationMarkSpec {
    pub fn center_px(&self, dpi: u32) -> Point {
        Point::from_mm(self.x_mm, self.y_mm, dpi)
    }

    pub fn radius_px(&self, dpi: u32) -> f64 {
        mm_to_px(self.size_mm, dpi)
    }
}

/// Shape of a selectable answer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Round bubble
    #[default]
    Circle,
    /// Square check box; `radius_mm` is its half side
    Box,
}

/// One selectable option of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerField {
    pub label: String,
    pub x_mm: f64,
    pub y_mm: f64,
    #[serde(default = "default_bubble_radius")]
    pub radius_mm: f64,
    #[serde(default)]
    pub field_type: FieldType,
}

impl AnswerField {
    /// A round bubble centered at (`x_mm`, `y_mm`).
    pub fn circle(label: &str, x_mm: f64, y_mm: f64, radius_mm: f64) -> Self {
        Self {
            label: label.to_string(),
            x_mm,
            y_mm,
            radius_mm,
            field_type: FieldType::Circle,
        }
    }

    /// A square box centered at (`x_mm`, `y_mm`) with half side `half_mm`.
    pub fn square(label: &str, x_mm: f64, y_mm: f64, half_mm: f64) -> Self {
        Self {
            label: label.to_string(),
            x_mm,
            y_mm,
            radius_mm: half_mm,
            field_type: FieldType::Box,
        }
    }

    pub fn center_px(&self, dpi: u32) -> Point {
        Point::from_mm(self.x_mm, self.y_mm, dpi)
    }

    pub fn radius_px(&self, dpi: u32) -> f64 {
        mm_to_px(self.radius_mm, dpi)
    }
}

/// A rectangular free-text region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Region {
    pub fn new(x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self {
            x_mm,
            y_mm,
            width_mm,
            height_mm,
        }
    }

    /// The region in pixel space.
    pub fn to_px(&self, dpi: u32) -> Rect {
        Rect::new(
            mm_to_px(self.x_mm, dpi),
            mm_to_px(self.y_mm, dpi),
            mm_to_px(self.width_mm, dpi),
            mm_to_px(self.height_mm, dpi),
        )
    }
}

/// A grid of bubbles encoding an identifier
///
/// Row `p` holds the bubbles for character position `p`; column `i` is
/// the `i`-th symbol of `charset`. Exactly one bubble per row is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleGrid {
    pub x_mm: f64,
    pub y_mm: f64,
    pub charset: String,
    pub positions: u32,
    #[serde(default = "default_grid_pitch")]
    pub pitch_mm: f64,
    #[serde(default = "default_grid_radius")]
    pub radius_mm: f64,
}

impl BubbleGrid {
    /// The bubbles of one character position, labelled by symbol.
    pub fn row_fields(&self, position: u32) -> Vec<AnswerField> {
        let y_mm = self.y_mm + position as f64 * self.pitch_mm;
        self.charset
            .chars()
            .enumerate()
            .map(|(i, symbol)| {
                AnswerField::circle(
                    &symbol.to_string(),
                    self.x_mm + i as f64 * self.pitch_mm,
                    y_mm,
                    self.radius_mm,
                )
            })
            .collect()
    }

    /// Whether `value` can be written into this grid.
    pub fn accepts(&self, value: &str) -> bool {
        value.chars().count() == self.positions as usize
            && value.chars().all(|c| self.charset.contains(c))
    }
}

/// How an identification field is captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdField {
    /// Handwritten box; only presence can be read back
    Text(Region),
    /// Bubble grid; the identifier can be decoded
    BubbleGrid(BubbleGrid),
}

/// Identification fields of a sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdFields {
    #[serde(default)]
    pub version_id: Option<IdField>,
    #[serde(default)]
    pub student_id: Option<IdField>,
}

/// Question kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl QuestionType {
    /// Whether the answer is selected from bubbles.
    pub fn is_choice(self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

/// Geometry of one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub question_number: u32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub answer_fields: Vec<AnswerField>,
    #[serde(default)]
    pub ocr_region: Option<Region>,
}

impl Question {
    /// A bubble question with no fields yet.
    pub fn choice(question_id: &str, question_number: u32, question_type: QuestionType) -> Self {
        Self {
            question_id: question_id.to_string(),
            question_number,
            question_type,
            answer_fields: Vec::new(),
            ocr_region: None,
        }
    }

    /// A free-text question answered inside `region`.
    pub fn free_text(
        question_id: &str,
        question_number: u32,
        question_type: QuestionType,
        region: Region,
    ) -> Self {
        Self {
            question_id: question_id.to_string(),
            question_number,
            question_type,
            answer_fields: Vec::new(),
            ocr_region: Some(region),
        }
    }

    /// Add an answer field.
    pub fn with_field(mut self, field: AnswerField) -> Self {
        self.answer_fields.push(field);
        self
    }

    /// Labels of the answer fields, in layout order.
    pub fn labels(&self) -> Vec<&str> {
        self.answer_fields.iter().map(|f| f.label.as_str()).collect()
    }
}

/// Complete sheet geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    pub page_info: PageInfo,
    pub registration_marks: Vec<RegistrationMarkSpec>,
    #[serde(default)]
    pub id_fields: IdFields,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl TemplateLayout {
    /// Number of registration marks a layout must declare.
    pub const MARK_COUNT: usize = 4;

    /// Start an empty layout for the given page.
    pub fn new(width_mm: f64, height_mm: f64, dpi: u32) -> Self {
        Self {
            page_info: PageInfo {
                width_mm,
                height_mm,
                dpi,
            },
            registration_marks: Vec::new(),
            id_fields: IdFields::default(),
            questions: Vec::new(),
        }
    }

    /// Add a registration mark of radius `size_mm`.
    pub fn with_mark(mut self, id: &str, x_mm: f64, y_mm: f64, size_mm: f64) -> Self {
        self.registration_marks.push(RegistrationMarkSpec {
            id: id.to_string(),
            x_mm,
            y_mm,
            size_mm,
        });
        self
    }

    /// Add four marks of radius `size_mm`, each `inset_mm` in from a corner.
    pub fn with_corner_marks(self, inset_mm: f64, size_mm: f64) -> Self {
        let right = self.page_info.width_mm - inset_mm;
        let bottom = self.page_info.height_mm - inset_mm;
        self.with_mark("top_left", inset_mm, inset_mm, size_mm)
            .with_mark("top_right", right, inset_mm, size_mm)
            .with_mark("bottom_left", inset_mm, bottom, size_mm)
            .with_mark("bottom_right", right, bottom, size_mm)
    }

    pub fn with_version_field(mut self, field: IdField) -> Self {
        self.id_fields.version_id = Some(field);
        self
    }

    pub fn with_student_field(mut self, field: IdField) -> Self {
        self.id_fields.student_id = Some(field);
        self
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Look up a question by id.
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }

    /// Parse a layout from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON and
    /// [`Error::InvalidLayout`] if the geometry is inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read a layout from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the structural invariants the renderer and detectors rely on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let page = &self.page_info;
        if !positive(page.width_mm) || !positive(page.height_mm) || page.dpi == 0 {
            return Err(Error::InvalidLayout(format!(
                "page {}x{} mm at {} dpi",
                page.width_mm, page.height_mm, page.dpi
            )));
        }
        let (w, h) = page.pixel_size();
        if w == 0 || h == 0 {
            return Err(Error::InvalidLayout("page rounds to zero pixels".into()));
        }

        if self.registration_marks.len() != Self::MARK_COUNT {
            return Err(Error::InvalidLayout(format!(
                "expected {} registration marks, found {}",
                Self::MARK_COUNT,
                self.registration_marks.len()
            )));
        }
        if let Some(mark) = self.registration_marks.iter().find(|m| !positive(m.size_mm)) {
            return Err(Error::InvalidLayout(format!(
                "mark '{}' has size {}",
                mark.id, mark.size_mm
            )));
        }

        for (name, field) in [
            ("version_id", &self.id_fields.version_id),
            ("student_id", &self.id_fields.student_id),
        ] {
            match field {
                Some(IdField::BubbleGrid(grid)) => {
                    let distinct: BTreeSet<char> = grid.charset.chars().collect();
                    if grid.charset.is_empty()
                        || distinct.len() != grid.charset.chars().count()
                        || grid.positions == 0
                        || !positive(grid.pitch_mm)
                        || !positive(grid.radius_mm)
                    {
                        return Err(Error::InvalidLayout(format!(
                            "{name}: invalid bubble grid"
                        )));
                    }
                }
                Some(IdField::Text(region)) => {
                    if !positive(region.width_mm) || !positive(region.height_mm) {
                        return Err(Error::InvalidLayout(format!("{name}: empty text region")));
                    }
                }
                None => {}
            }
        }

        let mut ids = BTreeSet::new();
        for q in &self.questions {
            if !ids.insert(q.question_id.as_str()) {
                return Err(Error::InvalidLayout(format!(
                    "duplicate question id '{}'",
                    q.question_id
                )));
            }
            if q.question_type.is_choice() {
                if q.answer_fields.is_empty() {
                    return Err(Error::InvalidLayout(format!(
                        "question '{}' has no answer fields",
                        q.question_id
                    )));
                }
                let mut labels = BTreeSet::new();
                for f in &q.answer_fields {
                    if !labels.insert(f.label.as_str()) || !positive(f.radius_mm) {
                        return Err(Error::InvalidLayout(format!(
                            "question '{}': bad field '{}'",
                            q.question_id, f.label
                        )));
                    }
                }
            } else {
                match &q.ocr_region {
                    Some(r) if positive(r.width_mm) && positive(r.height_mm) => {}
                    _ => {
                        return Err(Error::InvalidLayout(format!(
                            "question '{}' needs a non-empty ocr_region",
                            q.question_id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TemplateLayout {
        TemplateLayout::new(100.0, 80.0, 200)
            .with_corner_marks(10.0, 4.0)
            .with_question(
                Question::choice("q1", 1, QuestionType::MultipleChoice)
                    .with_field(AnswerField::circle("A", 30.0, 40.0, 3.0))
                    .with_field(AnswerField::circle("B", 50.0, 40.0, 3.0)),
            )
            .with_question(Question::free_text(
                "q2",
                2,
                QuestionType::Essay,
                Region::new(20.0, 50.0, 60.0, 15.0),
            ))
    }

    #[test]
    fn test_valid_layout() {
        let layout = sample();
        layout.validate().unwrap();
        assert_eq!(layout.page_info.pixel_size(), (787, 630));
        assert_eq!(layout.registration_marks[3].x_mm, 90.0);
        assert_eq!(layout.question("q1").unwrap().labels(), vec!["A", "B"]);
    }

    #[test]
    fn test_json_roundtrip() {
        let layout = sample().with_student_field(IdField::BubbleGrid(BubbleGrid {
            x_mm: 20.0,
            y_mm: 20.0,
            charset: "0123456789".into(),
            positions: 3,
            pitch_mm: 5.0,
            radius_mm: 1.8,
        }));
        let json = layout.to_json_string().unwrap();
        assert!(json.contains("\"type\": \"bubble_grid\""));
        assert!(json.contains("\"type\": \"multiple_choice\""));
        let back = TemplateLayout::from_json_str(&json).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "page_info": {"width_mm": 50, "height_mm": 50, "dpi": 100},
            "registration_marks": [
                {"id": "a", "x_mm": 5, "y_mm": 5},
                {"id": "b", "x_mm": 45, "y_mm": 5},
                {"id": "c", "x_mm": 5, "y_mm": 45},
                {"id": "d", "x_mm": 45, "y_mm": 45}
            ],
            "questions": [
                {"question_id": "q1", "question_number": 1, "type": "true_false",
                 "answer_fields": [{"label": "T", "x_mm": 20, "y_mm": 20},
                                   {"label": "F", "x_mm": 30, "y_mm": 20, "field_type": "box"}]}
            ]
        }"#;
        let layout = TemplateLayout::from_json_str(json).unwrap();
        assert_eq!(layout.registration_marks[0].size_mm, 5.0);
        let q = &layout.questions[0];
        assert_eq!(q.answer_fields[0].radius_mm, 3.0);
        assert_eq!(q.answer_fields[0].field_type, FieldType::Circle);
        assert_eq!(q.answer_fields[1].field_type, FieldType::Box);
        assert!(layout.id_fields.version_id.is_none());
    }

    #[test]
    fn test_invalid_layouts() {
        let mut three_marks = sample();
        three_marks.registration_marks.pop();
        assert!(matches!(three_marks.validate(), Err(Error::InvalidLayout(_))));

        let dup = sample().with_question(Question::choice("q1", 3, QuestionType::TrueFalse));
        assert!(dup.validate().is_err());

        let no_fields = sample().with_question(Question::choice("q9", 9, QuestionType::TrueFalse));
        assert!(no_fields.validate().is_err());

        let mut no_region = sample();
        no_region.questions[1].ocr_region = None;
        assert!(no_region.validate().is_err());

        let bad_grid = sample().with_version_field(IdField::BubbleGrid(BubbleGrid {
            x_mm: 0.0,
            y_mm: 0.0,
            charset: "AAB".into(),
            positions: 1,
            pitch_mm: 5.0,
            radius_mm: 1.8,
        }));
        assert!(bad_grid.validate().is_err());
    }

    #[test]
    fn test_bubble_grid_rows() {
        let grid = BubbleGrid {
            x_mm: 10.0,
            y_mm: 20.0,
            charset: "ABCD".into(),
            positions: 2,
            pitch_mm: 5.0,
            radius_mm: 1.5,
        };
        let row = grid.row_fields(1);
        assert_eq!(row.len(), 4);
        assert_eq!(row[2].label, "C");
        assert_eq!(row[2].x_mm, 20.0);
        assert_eq!(row[2].y_mm, 25.0);
        assert!(grid.accepts("DA"));
        assert!(!grid.accepts("D"));
        assert!(!grid.accepts("DE"));
    }
}
