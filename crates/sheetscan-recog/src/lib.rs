//! sheetscan-recog - Reading answers back from scanned sheets
//!
//! This crate turns a canvas and its layout into a [`ScanResult`]:
//!
//! - [`register`]: registration mark search and the nominal-to-canvas map
//! - [`fill`]: bubble fill ratios and choice classification
//! - [`ink`]: presence of writing in free-text regions
//! - [`identify`]: version and student identifier fields
//! - [`extract()`]: the full reader, configured by [`ScanConfig`]
//!
//! # Example
//!
//! ```no_run
//! use sheetscan_recog::{ScanConfig, Tier, extract};
//! # fn demo(
//! #     canvas: &sheetscan_core::Canvas,
//! #     layout: &sheetscan_core::TemplateLayout,
//! # ) -> sheetscan_recog::RecogResult<()> {
//! let result = extract(canvas, layout, &ScanConfig::for_tier(Tier::Pro))?;
//! println!("{:?}", result.quality.quality);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
pub mod extract;
pub mod fill;
pub mod identify;
pub mod ink;
pub mod register;
pub mod result;

pub use config::{FeatureSet, MAX_MARK_SEARCH_TOLERANCE_MM, ScanConfig, Tier};
pub use error::{RecogError, RecogResult};
pub use extract::extract;
pub use fill::{FillSample, fill_confidence};
pub use ink::ink_confidence;
pub use register::{RectificationReport, Registration};
pub use result::{
    AnswerResult, ExtractionMethod, IdReading, Identification, ImageFlag, QualityBucket,
    QualityMetrics, RectificationFailure, ScanResult, Warning,
};
