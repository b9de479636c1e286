//! Synthesis options

use crate::{SynthError, SynthResult};
use sheetscan_transform::Distortion;

/// Options for sheet synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct SynthOptions {
    /// Probability that a field shows the correct answer (default: 0.9)
    pub accuracy: f64,

    /// Share of incorrect outcomes left blank rather than filled with a
    /// distractor (default: 0.2)
    pub blank_rate: f64,

    /// Noise amplitude in intensity levels (default: 0)
    pub noise: u8,

    /// Rotation in degrees, clockwise positive (default: 0.0)
    pub rotation: f64,

    /// Horizontal shear factor (default: 0.0)
    pub skew: f64,

    /// Seed for every random choice of the sheet (default: 0)
    pub seed: u64,

    /// Student identifier; empty leaves the student field blank
    pub student_id: String,

    /// Version to render; `None` looks up the student's assignment
    pub version_id: Option<String>,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            accuracy: 0.9,
            blank_rate: 0.2,
            noise: 0,
            rotation: 0.0,
            skew: 0.0,
            seed: 0,
            student_id: String::new(),
            version_id: None,
        }
    }
}

impl SynthOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probability of marking the correct answer
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the share of wrong outcomes left blank
    pub fn with_blank_rate(mut self, blank_rate: f64) -> Self {
        self.blank_rate = blank_rate;
        self
    }

    /// Set the noise amplitude
    pub fn with_noise(mut self, noise: u8) -> Self {
        self.noise = noise;
        self
    }

    /// Set the rotation angle in degrees
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the shear factor
    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = skew;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the student identifier
    pub fn with_student(mut self, student_id: &str) -> Self {
        self.student_id = student_id.to_string();
        self
    }

    /// Render a specific version instead of the student's assignment
    pub fn with_version(mut self, version_id: &str) -> Self {
        self.version_id = Some(version_id.to_string());
        self
    }

    /// The distortion these options describe.
    pub fn distortion(&self) -> Distortion {
        Distortion::new(self.rotation, self.skew, self.noise)
    }

    /// Validate options
    pub fn validate(&self) -> SynthResult<()> {
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(SynthError::InvalidParameter(format!(
                "accuracy must be in [0, 1], got {}",
                self.accuracy
            )));
        }
        if !(0.0..=1.0).contains(&self.blank_rate) {
            return Err(SynthError::InvalidParameter(format!(
                "blank_rate must be in [0, 1], got {}",
                self.blank_rate
            )));
        }
        self.distortion().validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = SynthOptions::new();
        assert_eq!(opts.accuracy, 0.9);
        assert!(opts.distortion().is_identity());
        opts.validate().unwrap();
    }

    #[test]
    fn test_builder() {
        let opts = SynthOptions::new()
            .with_accuracy(0.5)
            .with_noise(20)
            .with_rotation(1.5)
            .with_skew(0.01)
            .with_seed(9)
            .with_student("123")
            .with_version("B");
        assert_eq!(opts.distortion(), Distortion::new(1.5, 0.01, 20));
        assert_eq!(opts.version_id.as_deref(), Some("B"));
        opts.validate().unwrap();
    }

    #[test]
    fn test_invalid() {
        assert!(SynthOptions::new().with_accuracy(1.2).validate().is_err());
        assert!(SynthOptions::new().with_accuracy(f64::NAN).validate().is_err());
        assert!(SynthOptions::new().with_blank_rate(-0.1).validate().is_err());
        assert!(matches!(
            SynthOptions::new().with_skew(f64::NAN).validate(),
            Err(SynthError::Transform(_))
        ));
    }
}
