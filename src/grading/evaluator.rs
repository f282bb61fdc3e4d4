//! Answer evaluator
//!
//! Grades numeric entries against reference values with an absolute
//! tolerance, and option picks against the canonical option text. The
//! evaluator keeps no state: every call grades a fresh question instance.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, CalcError, CalcResult};

/// Absolute tolerance applied to numeric answers unless a field overrides it
pub const DEFAULT_TOLERANCE: f64 = 0.011;

pub const CORRECT_MESSAGE: &str = "Correct!";
pub const NUMERIC_INCORRECT_MESSAGE: &str =
    "One or more answers are incorrect. Please review the solution below.";

/// Reference value for one numeric answer field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedValue {
    pub value: f64,
    /// Overrides the evaluator's default tolerance when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

impl ExpectedValue {
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            tolerance: None,
        }
    }

    pub const fn with_tolerance(value: f64, tolerance: f64) -> Self {
        Self {
            value,
            tolerance: Some(tolerance),
        }
    }

    /// Whether `submitted` is within `tolerance` of this value
    fn accepts(&self, submitted: Option<f64>, tolerance: f64) -> bool {
        match submitted {
            Some(v) if v.is_finite() => (v - self.value).abs() <= tolerance,
            _ => false,
        }
    }
}

/// Outcome of grading one question instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictResult {
    pub all_correct: bool,
    /// One entry per submitted field, in submission order
    pub per_field_correctness: Vec<bool>,
    pub message: String,
}

/// Answer key of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerKey {
    Numeric { values: Vec<ExpectedValue> },
    Choice { answer: String },
}

/// A learner's submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    /// `None` marks a blank or unparseable entry
    Numeric { values: Vec<Option<f64>> },
    Choice { answer: String },
}

/// Stateless grader carrying the default numeric tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerEvaluator {
    default_tolerance: f64,
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self {
            default_tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl AnswerEvaluator {
    /// Fails when the tolerance is negative or not finite
    pub fn new(default_tolerance: f64) -> CalcResult<Self> {
        let default_tolerance = require_non_negative("tolerance", default_tolerance)?;
        Ok(Self { default_tolerance })
    }

    pub fn default_tolerance(&self) -> f64 {
        self.default_tolerance
    }

    /// Grade numeric entries position by position
    pub fn evaluate_numeric(
        &self,
        expected: &[ExpectedValue],
        submitted: &[Option<f64>],
    ) -> CalcResult<VerdictResult> {
        if expected.len() != submitted.len() {
            return Err(CalcError::ArityMismatch {
                expected: expected.len(),
                submitted: submitted.len(),
            });
        }

        let tolerances = expected
            .iter()
            .map(|e| match e.tolerance {
                Some(t) => require_non_negative("tolerance", t),
                None => Ok(self.default_tolerance),
            })
            .collect::<CalcResult<Vec<f64>>>()?;

        let per_field_correctness: Vec<bool> = expected
            .iter()
            .zip(submitted)
            .zip(tolerances)
            .map(|((e, s), tolerance)| e.accepts(*s, tolerance))
            .collect();
        let blank = submitted.iter().filter(|s| s.is_none()).count();
        if blank > 0 {
            tracing::debug!("{} of {} numeric answers were blank or unparseable", blank, submitted.len());
        }

        let all_correct = per_field_correctness.iter().all(|c| *c);
        let message = if all_correct {
            CORRECT_MESSAGE
        } else {
            NUMERIC_INCORRECT_MESSAGE
        };

        Ok(VerdictResult {
            all_correct,
            per_field_correctness,
            message: message.to_string(),
        })
    }

    /// Dispatch on the shape of the answer key
    pub fn evaluate(&self, key: &AnswerKey, submission: &Submission) -> CalcResult<VerdictResult> {
        match (key, submission) {
            (AnswerKey::Numeric { values }, Submission::Numeric { values: submitted }) => {
                self.evaluate_numeric(values, submitted)
            }
            (AnswerKey::Choice { answer }, Submission::Choice { answer: submitted }) => {
                Ok(evaluate_choice(answer, submitted))
            }
            (AnswerKey::Numeric { values }, Submission::Choice { .. }) => {
                Err(CalcError::ArityMismatch {
                    expected: values.len(),
                    submitted: 0,
                })
            }
            (AnswerKey::Choice { .. }, Submission::Numeric { values }) => {
                Err(CalcError::ArityMismatch {
                    expected: 1,
                    submitted: values.len(),
                })
            }
        }
    }
}

/// Grade numeric entries with [`DEFAULT_TOLERANCE`]
pub fn evaluate_numeric(
    expected: &[ExpectedValue],
    submitted: &[Option<f64>],
) -> CalcResult<VerdictResult> {
    AnswerEvaluator::default().evaluate_numeric(expected, submitted)
}

/// Grade a multiple-choice or true/false pick by exact, case-sensitive match
///
/// The message always names the canonical answer.
pub fn evaluate_choice(expected: &str, submitted: &str) -> VerdictResult {
    let correct = expected == submitted;
    let message = if correct {
        format!("Correct! The answer is: {}", expected)
    } else {
        format!("Incorrect. The correct answer is: {}", expected)
    };
    VerdictResult {
        all_correct: correct,
        per_field_correctness: vec![correct],
        message,
    }
}

/// Parse one raw text entry; blank, unparseable or non-finite text gives `None`
pub fn parse_entry(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse raw text entries in order
pub fn parse_entries<S: AsRef<str>>(raw: &[S]) -> Vec<Option<f64>> {
    raw.iter().map(|s| parse_entry(s.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(values: &[f64]) -> Vec<ExpectedValue> {
        values.iter().copied().map(ExpectedValue::new).collect()
    }

    #[test]
    fn test_exact_match() {
        let v = evaluate_numeric(&key(&[50.0, 950.0]), &[Some(50.0), Some(950.0)]).unwrap();
        assert!(v.all_correct);
        assert_eq!(v.per_field_correctness, vec![true, true]);
        assert_eq!(v.message, CORRECT_MESSAGE);
    }

    #[test]
    fn test_within_tolerance() {
        let v = evaluate_numeric(&key(&[50.0, 950.0]), &[Some(49.99), Some(950.0)]).unwrap();
        assert!(v.all_correct);
    }

    #[test]
    fn test_outside_tolerance() {
        let v = evaluate_numeric(&key(&[50.0, 950.0]), &[Some(48.0), Some(950.0)]).unwrap();
        assert!(!v.all_correct);
        assert_eq!(v.per_field_correctness, vec![false, true]);
        assert_eq!(v.message, NUMERIC_INCORRECT_MESSAGE);
    }

    #[test]
    fn test_blank_and_non_finite_are_incorrect() {
        let v = evaluate_numeric(&key(&[1.2, 1198.8]), &[None, Some(f64::NAN)]).unwrap();
        assert_eq!(v.per_field_correctness, vec![false, false]);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = evaluate_numeric(&key(&[50.0, 950.0]), &[Some(50.0)]).unwrap_err();
        assert_eq!(err, CalcError::ArityMismatch { expected: 2, submitted: 1 });
    }

    #[test]
    fn test_per_field_tolerance_override() {
        let expected = [ExpectedValue::with_tolerance(200.0, 5.0)];
        let v = evaluate_numeric(&expected, &[Some(196.0)]).unwrap();
        assert!(v.all_correct);
    }

    #[test]
    fn test_configured_default_tolerance() {
        let strict = AnswerEvaluator::new(0.0).unwrap();
        let v = strict.evaluate_numeric(&key(&[9.9]), &[Some(9.905)]).unwrap();
        assert!(!v.all_correct);
        let v = AnswerEvaluator::default().evaluate_numeric(&key(&[9.9]), &[Some(9.905)]).unwrap();
        assert!(v.all_correct);
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = evaluate_numeric(&[ExpectedValue::with_tolerance(50.0, bad)], &[Some(50.0)])
                .unwrap_err();
            assert!(
                matches!(err, CalcError::InvalidInput { ref field, .. } if field == "tolerance"),
                "{}",
                bad
            );
            assert!(AnswerEvaluator::new(bad).is_err());
        }
    }

    #[test]
    fn test_choice_correct() {
        let v = evaluate_choice("Bacteria", "Bacteria");
        assert!(v.all_correct);
        assert_eq!(v.per_field_correctness, vec![true]);
        assert!(v.message.contains("Bacteria"));
    }

    #[test]
    fn test_choice_incorrect_reveals_answer() {
        let v = evaluate_choice("Bacteria", "Yeast");
        assert!(!v.all_correct);
        assert_eq!(v.message, "Incorrect. The correct answer is: Bacteria");
    }

    #[test]
    fn test_choice_is_case_sensitive() {
        assert!(!evaluate_choice("False", "false").all_correct);
    }

    #[test]
    fn test_evaluate_dispatch() {
        let evaluator = AnswerEvaluator::default();
        let choice = AnswerKey::Choice { answer: "True".into() };
        let v = evaluator
            .evaluate(&choice, &Submission::Choice { answer: "True".into() })
            .unwrap();
        assert!(v.all_correct);

        let numeric = AnswerKey::Numeric { values: key(&[200.0]) };
        let v = evaluator
            .evaluate(&numeric, &Submission::Numeric { values: vec![Some(200.0)] })
            .unwrap();
        assert!(v.all_correct);

        let err = evaluator
            .evaluate(&numeric, &Submission::Choice { answer: "200".into() })
            .unwrap_err();
        assert!(matches!(err, CalcError::ArityMismatch { .. }));
    }

    #[test]
    fn test_repeated_grading_is_independent() {
        let expected = key(&[100.0, 9.9]);
        let first = evaluate_numeric(&expected, &[Some(1.0), Some(9.9)]).unwrap();
        let second = evaluate_numeric(&expected, &[Some(100.0), Some(9.9)]).unwrap();
        assert!(!first.all_correct);
        assert!(second.all_correct);
    }

    #[test]
    fn test_parse_entries() {
        let parsed = parse_entries(&["50", " 950.5 ", "abc", "", "inf"]);
        assert_eq!(parsed, vec![Some(50.0), Some(950.5), None, None, None]);
    }
}
