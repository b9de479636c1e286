//! Extraction configuration
//!
//! Every threshold the extractor uses lives in [`ScanConfig`]. Defaults are
//! tuned for sheets produced by the synthesizer and for flatbed scans at
//! 150-300 dpi.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use sheetscan_recog::{ScanConfig, Tier};
//!
//! // Built-in defaults with every feature enabled
//! let config = ScanConfig::default();
//!
//! // Feature set of a product tier
//! let free = ScanConfig::for_tier(Tier::Free);
//!
//! // Partial JSON; missing fields fall back to defaults
//! let tuned = ScanConfig::from_json_str(r#"{ "fill_threshold": 0.35 }"#)?;
//! # Ok::<(), sheetscan_recog::RecogError>(())
//! ```

use crate::{RecogError, RecogResult};
use serde::{Deserialize, Serialize};
use sheetscan_core::TemplateLayout;
use std::path::Path;

/// Upper bound on `mark_search_tolerance_mm`.
pub const MAX_MARK_SEARCH_TOLERANCE_MM: f64 = 50.0;

/// Product tier, which decides the enabled [`FeatureSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Bubble detection with translation-only registration
    Free,
    /// Adds affine correction and identification
    Pro,
    /// Everything, including handwriting detection
    Enterprise,
}

impl Tier {
    /// Features enabled for this tier.
    pub fn features(self) -> FeatureSet {
        match self {
            Tier::Free => FeatureSet {
                affine_correction: false,
                identification: false,
                handwriting_detection: false,
            },
            Tier::Pro => FeatureSet {
                affine_correction: true,
                identification: true,
                handwriting_detection: false,
            },
            Tier::Enterprise => FeatureSet::default(),
        }
    }
}

/// Optional stages of the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSet {
    /// Fit a full affine model to the marks; otherwise only translate
    pub affine_correction: bool,
    /// Read the version and student identifier fields
    pub identification: bool,
    /// Estimate ink density in free-text regions
    pub handwriting_detection: bool,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self {
            affine_correction: true,
            identification: true,
            handwriting_detection: true,
        }
    }
}

/// Thresholds and switches for one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Pixels strictly below this intensity count as dark
    pub dark_threshold: u8,

    /// Minimum fill ratio for a bubble to count as filled
    pub fill_threshold: f64,

    /// Answers below this confidence get `low_confidence`
    pub review_threshold: f64,

    /// Half-width of the square searched around each nominal mark center
    pub mark_search_tolerance_mm: f64,

    /// Minimum mark score (inner dark fraction minus ring dark fraction)
    pub mark_min_score: f64,

    /// Marks that must be found before the sheet can be rectified
    pub min_marks_required: usize,

    /// Distance kept from a bubble's outline when sampling its interior
    pub bubble_inset_mm: f64,

    /// Distance kept from a free-text region's border when sampling ink
    pub region_inset_mm: f64,

    /// Ink density at or below which a region is considered empty
    pub writing_threshold: f64,

    /// Density scale of the ink confidence curve
    pub ink_saturation: f64,

    /// Enabled stages
    pub features: FeatureSet,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 128,
            fill_threshold: 0.30,
            review_threshold: 0.70,
            mark_search_tolerance_mm: 5.0,
            mark_min_score: 0.5,
            min_marks_required: 3,
            bubble_inset_mm: 0.4,
            region_inset_mm: 1.0,
            writing_threshold: 0.01,
            ink_saturation: 0.02,
            features: FeatureSet::default(),
        }
    }
}

impl ScanConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default thresholds with the feature set of `tier`.
    pub fn for_tier(tier: Tier) -> Self {
        Self {
            features: tier.features(),
            ..Self::default()
        }
    }

    /// Set the fill threshold
    pub fn with_fill_threshold(mut self, threshold: f64) -> Self {
        self.fill_threshold = threshold;
        self
    }

    /// Set the review threshold
    pub fn with_review_threshold(mut self, threshold: f64) -> Self {
        self.review_threshold = threshold;
        self
    }

    /// Set the mark search tolerance
    pub fn with_mark_search_tolerance(mut self, tolerance_mm: f64) -> Self {
        self.mark_search_tolerance_mm = tolerance_mm;
        self
    }

    /// Set the number of marks required for rectification
    pub fn with_min_marks_required(mut self, count: usize) -> Self {
        self.min_marks_required = count;
        self
    }

    /// Replace the feature set
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> RecogResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> RecogResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        if self.dark_threshold == 0 {
            return Err(RecogError::InvalidParameter(
                "dark_threshold must be positive".to_string(),
            ));
        }
        if !(self.fill_threshold > 0.0 && self.fill_threshold <= 1.0) {
            return Err(RecogError::InvalidParameter(
                "fill_threshold must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.review_threshold) {
            return Err(RecogError::InvalidParameter(
                "review_threshold must be in [0, 1]".to_string(),
            ));
        }
        if !(self.mark_search_tolerance_mm > 0.0
            && self.mark_search_tolerance_mm <= MAX_MARK_SEARCH_TOLERANCE_MM)
        {
            return Err(RecogError::InvalidParameter(format!(
                "mark_search_tolerance_mm must be in (0, {MAX_MARK_SEARCH_TOLERANCE_MM}]"
            )));
        }
        if !(self.mark_min_score > 0.0 && self.mark_min_score <= 1.0) {
            return Err(RecogError::InvalidParameter(
                "mark_min_score must be in (0, 1]".to_string(),
            ));
        }
        if !(3..=TemplateLayout::MARK_COUNT).contains(&self.min_marks_required) {
            return Err(RecogError::InvalidParameter(format!(
                "min_marks_required must be between 3 and {}",
                TemplateLayout::MARK_COUNT
            )));
        }
        if !(self.bubble_inset_mm >= 0.0 && self.region_inset_mm >= 0.0) {
            return Err(RecogError::InvalidParameter(
                "insets must not be negative".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.writing_threshold) {
            return Err(RecogError::InvalidParameter(
                "writing_threshold must be in [0, 1)".to_string(),
            ));
        }
        if self.ink_saturation.is_nan() || self.ink_saturation <= 0.0 {
            return Err(RecogError::InvalidParameter(
                "ink_saturation must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dark_threshold, 128);
        assert!(config.features.affine_correction);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ScanConfig::from_json_str(
            r#"{ "fill_threshold": 0.4, "features": { "identification": false } }"#,
        )
        .unwrap();
        assert_eq!(config.fill_threshold, 0.4);
        assert_eq!(config.review_threshold, 0.70);
        assert!(!config.features.identification);
        assert!(config.features.handwriting_detection);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ScanConfig::new().with_fill_threshold(0.0).validate().is_err());
        assert!(ScanConfig::new().with_review_threshold(1.5).validate().is_err());
        assert!(ScanConfig::new().with_min_marks_required(2).validate().is_err());
        assert!(ScanConfig::new().with_min_marks_required(5).validate().is_err());
        assert!(
            ScanConfig::new()
                .with_mark_search_tolerance(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            ScanConfig::new()
                .with_mark_search_tolerance(1e30)
                .validate()
                .is_err()
        );
        assert!(ScanConfig::from_json_str(r#"{ "fill_threshold": -1 }"#).is_err());
        assert!(ScanConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_tiers() {
        let free = ScanConfig::for_tier(Tier::Free);
        assert!(!free.features.affine_correction);
        assert!(!free.features.identification);
        assert!(!free.features.handwriting_detection);
        let pro = Tier::Pro.features();
        assert!(pro.affine_correction && pro.identification);
        assert!(!pro.handwriting_detection);
        assert_eq!(Tier::Enterprise.features(), FeatureSet::default());
    }
}
