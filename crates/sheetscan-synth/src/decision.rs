//! Per-field fill decisions
//!
//! Each answer field is resolved exactly once, up front, from the
//! synthesis generator. Rendering then follows the decision without
//! drawing further random numbers for the choice.

use rand::Rng;

/// What a synthetic student does with one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillDecision {
    /// Mark the correct option (or write an answer in a text region)
    Correct,
    /// Mark this wrong option
    Distractor(String),
    /// Leave the question unanswered
    Blank,
}

impl FillDecision {
    /// Resolve a choice question.
    ///
    /// With probability `accuracy` the correct option is marked. Otherwise
    /// the field is left blank with probability `blank_rate`, or a wrong
    /// option is picked uniformly. With no wrong options available the
    /// field is left blank.
    ///
    /// `accuracy` and `blank_rate` must lie in `[0, 1]`.
    pub fn resolve<R: Rng>(
        correct: &str,
        labels: &[&str],
        accuracy: f64,
        blank_rate: f64,
        rng: &mut R,
    ) -> Self {
        if rng.random_bool(accuracy) {
            return FillDecision::Correct;
        }
        let distractors: Vec<&str> = labels.iter().copied().filter(|&l| l != correct).collect();
        if distractors.is_empty() || rng.random_bool(blank_rate) {
            return FillDecision::Blank;
        }
        let pick = rng.random_range(0..distractors.len());
        FillDecision::Distractor(distractors[pick].to_string())
    }

    /// Resolve a free-text question: write with probability `accuracy`.
    pub fn resolve_free_text<R: Rng>(accuracy: f64, rng: &mut R) -> Self {
        if rng.random_bool(accuracy) {
            FillDecision::Correct
        } else {
            FillDecision::Blank
        }
    }

    /// The option label this decision marks, given the correct one.
    pub fn marked<'a>(&'a self, correct: &'a str) -> Option<&'a str> {
        match self {
            FillDecision::Correct => Some(correct),
            FillDecision::Distractor(label) => Some(label),
            FillDecision::Blank => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const LABELS: [&str; 4] = ["A", "B", "C", "D"];

    #[test]
    fn test_certain_outcomes() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(
                FillDecision::resolve("B", &LABELS, 1.0, 0.5, &mut rng),
                FillDecision::Correct
            );
            assert_eq!(
                FillDecision::resolve("B", &LABELS, 0.0, 1.0, &mut rng),
                FillDecision::Blank
            );
            match FillDecision::resolve("B", &LABELS, 0.0, 0.0, &mut rng) {
                FillDecision::Distractor(l) => assert_ne!(l, "B"),
                other => panic!("expected distractor, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rates() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 4000;
        let mut correct = 0;
        let mut blank = 0;
        for _ in 0..n {
            match FillDecision::resolve("A", &LABELS, 0.7, 0.5, &mut rng) {
                FillDecision::Correct => correct += 1,
                FillDecision::Blank => blank += 1,
                FillDecision::Distractor(_) => {}
            }
        }
        let correct = correct as f64 / n as f64;
        let blank = blank as f64 / n as f64;
        assert!((correct - 0.7).abs() < 0.03, "correct rate {correct}");
        assert!((blank - 0.15).abs() < 0.03, "blank rate {blank}");
    }

    #[test]
    fn test_single_option_falls_back_to_blank() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            FillDecision::resolve("T", &["T"], 0.0, 0.0, &mut rng),
            FillDecision::Blank
        );
    }

    #[test]
    fn test_marked() {
        assert_eq!(FillDecision::Correct.marked("C"), Some("C"));
        assert_eq!(FillDecision::Distractor("A".into()).marked("C"), Some("A"));
        assert_eq!(FillDecision::Blank.marked("C"), None);
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            FillDecision::resolve_free_text(0.0, &mut rng),
            FillDecision::Blank
        );
    }
}
