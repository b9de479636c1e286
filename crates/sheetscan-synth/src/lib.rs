//! sheetscan-synth - Synthetic answer sheets
//!
//! Renders a layout and answer key into a canvas whose ground truth is
//! known, then degrades it with the distortion engine:
//!
//! - [`render`]: registration marks, bubbles, boxes and pseudo-handwriting
//! - [`FillDecision`]: per-field choice between the correct option, a
//!   distractor, or leaving the field blank
//! - [`synthesize`]: the full sheet, returned with its [`GroundTruth`]
//!
//! All randomness comes from one generator seeded by
//! [`SynthOptions::seed`], so equal inputs give byte-identical sheets.

mod decision;
mod error;
mod options;
pub mod render;
mod synthesize;

pub use decision::FillDecision;
pub use error::{SynthError, SynthResult};
pub use options::SynthOptions;
pub use synthesize::{GroundTruth, SyntheticSheet, TruthEntry, synthesize};
