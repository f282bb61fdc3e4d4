//! Grading module
//!
//! One evaluator for every quiz, true/false and practice problem.

pub mod evaluator;

pub use evaluator::{
    evaluate_choice, evaluate_numeric, parse_entries, parse_entry, AnswerEvaluator, AnswerKey,
    ExpectedValue, Submission, VerdictResult, DEFAULT_TOLERANCE,
};
