//! Score validation and score-to-grade mapping.
//!
//! The mapping is policy, so it sits behind the [`GradeScale`] trait. The
//! default [`ThresholdScale::five_point`] is a step function on a 0-5 score.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Lowest accepted score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest accepted score.
pub const MAX_SCORE: f64 = 5.0;

/// Maximum length of a teacher's feedback comment.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Grade label used when there is no score or the score is below every step.
pub const GRADE_NEEDS_REVISION: &str = "needs_revision";

/* --------------------------------------------------------------------------
Scale
-------------------------------------------------------------------------- */

/// Maps an optional numeric score to a grade label.
pub trait GradeScale: Send + Sync {
    fn grade_for(&self, score: Option<f64>) -> String;
}

/// A descending list of `(min_score, label)` steps with a fallback label.
#[derive(Debug, Clone)]
pub struct ThresholdScale {
    steps: Vec<(f64, String)>,
    fallback: String,
}

impl ThresholdScale {
    /// Build a scale. Steps are sorted highest threshold first.
    pub fn new(mut steps: Vec<(f64, String)>, fallback: impl Into<String>) -> Self {
        steps.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self {
            steps,
            fallback: fallback.into(),
        }
    }

    /// `>=4.5 -> "5"`, `>=3.5 -> "4"`, `>=2.5 -> "3"`, `>=1.5 -> "2"`,
    /// anything else (or no score) -> `needs_revision`.
    pub fn five_point() -> Self {
        Self::new(
            vec![
                (4.5, "5".to_string()),
                (3.5, "4".to_string()),
                (2.5, "3".to_string()),
                (1.5, "2".to_string()),
            ],
            GRADE_NEEDS_REVISION,
        )
    }
}

impl Default for ThresholdScale {
    fn default() -> Self {
        Self::five_point()
    }
}

impl GradeScale for ThresholdScale {
    fn grade_for(&self, score: Option<f64>) -> String {
        let Some(score) = score else {
            return self.fallback.clone();
        };
        self.steps
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate an optional score against `[MIN_SCORE, MAX_SCORE]`.
pub fn validate_score(score: Option<f64>) -> Result<(), CoreError> {
    match score {
        None => Ok(()),
        Some(s) if s.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&s) => Ok(()),
        Some(s) => Err(CoreError::Validation(format!(
            "Score {s} is out of range. Must be between {MIN_SCORE} and {MAX_SCORE}"
        ))),
    }
}

/// Validate a feedback comment length.
pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_point_thresholds() {
        let scale = ThresholdScale::five_point();
        assert_eq!(scale.grade_for(Some(5.0)), "5");
        assert_eq!(scale.grade_for(Some(4.5)), "5");
        assert_eq!(scale.grade_for(Some(4.2)), "4");
        assert_eq!(scale.grade_for(Some(3.5)), "4");
        assert_eq!(scale.grade_for(Some(2.5)), "3");
        assert_eq!(scale.grade_for(Some(1.5)), "2");
        assert_eq!(scale.grade_for(Some(1.49)), GRADE_NEEDS_REVISION);
    }

    #[test]
    fn missing_score_needs_revision() {
        assert_eq!(ThresholdScale::default().grade_for(None), GRADE_NEEDS_REVISION);
    }

    #[test]
    fn custom_steps_are_sorted() {
        let scale = ThresholdScale::new(
            vec![(50.0, "pass".to_string()), (90.0, "distinction".to_string())],
            "fail",
        );
        assert_eq!(scale.grade_for(Some(95.0)), "distinction");
        assert_eq!(scale.grade_for(Some(60.0)), "pass");
        assert_eq!(scale.grade_for(Some(10.0)), "fail");
    }

    #[test]
    fn score_range() {
        assert!(validate_score(None).is_ok());
        assert!(validate_score(Some(0.0)).is_ok());
        assert!(validate_score(Some(5.0)).is_ok());
        assert!(validate_score(Some(-0.1)).is_err());
        assert!(validate_score(Some(5.01)).is_err());
        assert!(validate_score(Some(f64::NAN)).is_err());
    }

    #[test]
    fn comment_length() {
        assert!(validate_comment("").is_ok());
        assert!(validate_comment(&"a".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
    }
}
