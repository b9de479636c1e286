//! sheetscan - Optical answer sheets for Rust
//!
//! Generates synthetic answer sheets with known ground truth, degrades
//! them like a scanner would, and reads them back.
//!
//! # Overview
//!
//! The pipeline has four entry points:
//!
//! - [`synthesize`]: layout + answer key + options -> canvas and ground truth
//! - [`encode`] / [`decode`]: canvas <-> sparse JSON or plain PGM bytes
//! - [`extract`]: canvas + layout -> per-question answers and quality
//!
//! Layout geometry is expressed in millimeters and converted to pixels
//! with the canvas resolution, so one layout serves any dpi.
//!
//! # Example
//!
//! ```no_run
//! use sheetscan::{ImageFormat, QuestionOrder, SynthOptions, TemplateLayout};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layout = TemplateLayout::from_json_file("layout.json")?;
//! let order = QuestionOrder::from_json_str(&std::fs::read_to_string("order.json")?)?;
//!
//! let sheet = sheetscan::synthesize(&layout, &order, &SynthOptions::new().with_seed(7))?;
//! let bytes = sheetscan::encode(&sheet.canvas, ImageFormat::Pgm)?;
//! let canvas = sheetscan::decode(&bytes, ImageFormat::Pgm)?;
//! let result = sheetscan::extract(&canvas, &layout)?;
//! println!("{}", result.to_json_string()?);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{Error, Result};

pub use sheetscan_core::{
    AnswerField, BubbleGrid, Canvas, CanvasMut, FieldType, HANDWRITTEN_MARKER, IdField, IdFields,
    PageInfo, Point, Question, QuestionOrder, QuestionType, Rect, Region, RegistrationMarkSpec,
    TemplateLayout, mm_to_px,
};
pub use sheetscan_io::ImageFormat;
pub use sheetscan_recog::{
    AnswerResult, ExtractionMethod, FeatureSet, ImageFlag, QualityBucket, QualityMetrics,
    ScanConfig, ScanResult, Tier, Warning,
};
pub use sheetscan_synth::{GroundTruth, SynthOptions, SyntheticSheet};
pub use sheetscan_transform::Distortion;

// Domain crates as modules for everything not re-exported above
pub use sheetscan_io as io;
pub use sheetscan_recog as recog;
pub use sheetscan_synth as synth;
pub use sheetscan_transform as transform;

/// Render a synthetic sheet.
///
/// See [`sheetscan_synth::synthesize`].
pub fn synthesize(
    layout: &TemplateLayout,
    order: &QuestionOrder,
    options: &SynthOptions,
) -> Result<SyntheticSheet> {
    Ok(sheetscan_synth::synthesize(layout, order, options)?)
}

/// Encode a canvas in the given format.
pub fn encode(canvas: &Canvas, format: ImageFormat) -> Result<Vec<u8>> {
    Ok(sheetscan_io::encode(canvas, format)?)
}

/// Decode a canvas from bytes in the given format.
pub fn decode(data: &[u8], format: ImageFormat) -> Result<Canvas> {
    Ok(sheetscan_io::decode(data, format)?)
}

/// Read a sheet with the default [`ScanConfig`].
pub fn extract(canvas: &Canvas, layout: &TemplateLayout) -> Result<ScanResult> {
    extract_with_config(canvas, layout, &ScanConfig::default())
}

/// Read a sheet with an explicit configuration.
pub fn extract_with_config(
    canvas: &Canvas,
    layout: &TemplateLayout,
    config: &ScanConfig,
) -> Result<ScanResult> {
    Ok(sheetscan_recog::extract(canvas, layout, config)?)
}
