//! sheetscan-core - Basic data structures for answer-sheet processing
//!
//! This crate provides the fundamental data structures used throughout
//! the sheetscan pipeline:
//!
//! - [`Canvas`] / [`CanvasMut`] - Grayscale raster (immutable / mutable)
//! - [`DarkIntegral`] - Summed-area table of dark pixels
//! - [`Point`] / [`Rect`] - Geometry in millimeter or pixel space
//! - [`TemplateLayout`] - Resolution-independent sheet geometry
//! - [`QuestionOrder`] - Per-version question sequence and answer key
//!
//! All layout coordinates are millimeters. They are converted to pixels
//! through [`mm_to_px`] and nowhere else.

pub mod answer_key;
pub mod canvas;
pub mod error;
pub mod geometry;
pub mod layout;

pub use answer_key::{
    AnswerOption, HANDWRITTEN_MARKER, OrderedQuestion, QuestionOrder, VersionOrder,
};
pub use canvas::{Canvas, CanvasMut, DEFAULT_BACKGROUND, DEFAULT_DPI, DarkIntegral};
pub use error::{Error, Result};
pub use geometry::{MM_PER_INCH, Point, Rect, mm_to_px};
pub use layout::{
    AnswerField, BubbleGrid, FieldType, IdField, IdFields, PageInfo, Question, QuestionType,
    Region, RegistrationMarkSpec, TemplateLayout,
};
