//! Quiz question model
//!
//! Multiple-choice and true/false questions, graded by option text.

use serde::{Deserialize, Serialize};

use crate::error::CalcResult;
use crate::grading::{AnswerEvaluator, AnswerKey, Submission, VerdictResult};

/// Question type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    MultipleChoice,
    #[serde(rename = "tf")]
    TrueFalse,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "mcq",
            QuestionKind::TrueFalse => "tf",
        }
    }
}

/// A question with its canonical answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub kind: QuestionKind,
    pub explanation: Option<String>,
    /// Appended to the verdict message when set
    pub feedback_correct: Option<String>,
    pub feedback_incorrect: Option<String>,
}

/// Question as shown to a learner, without the answer
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub prompt: String,
    pub kind: &'static str,
    pub options: Vec<String>,
}

/// Verdict for a question with the explanation attached
#[derive(Debug, Clone, Serialize)]
pub struct QuestionFeedback {
    pub verdict: VerdictResult,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn mcq(prompt: &str, options: &[&str], answer: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
            kind: QuestionKind::MultipleChoice,
            explanation: None,
            feedback_correct: None,
            feedback_incorrect: None,
        }
    }

    pub fn true_false(prompt: &str, answer: bool) -> Self {
        Self {
            kind: QuestionKind::TrueFalse,
            ..Self::mcq(prompt, &["True", "False"], if answer { "True" } else { "False" })
        }
    }

    pub fn explained(mut self, explanation: &str) -> Self {
        self.explanation = Some(explanation.to_string());
        self
    }

    pub fn with_feedback(mut self, correct: &str, incorrect: &str) -> Self {
        self.feedback_correct = Some(correct.to_string());
        self.feedback_incorrect = Some(incorrect.to_string());
        self
    }

    pub fn answer_key(&self) -> AnswerKey {
        AnswerKey::Choice {
            answer: self.answer.clone(),
        }
    }

    pub fn view(&self, number: usize) -> QuestionView {
        QuestionView {
            number,
            prompt: self.prompt.clone(),
            kind: self.kind.as_str(),
            options: self.options.clone(),
        }
    }

    /// Grade a picked option
    pub fn check(&self, evaluator: &AnswerEvaluator, submitted: &str) -> CalcResult<QuestionFeedback> {
        let submission = Submission::Choice {
            answer: submitted.to_string(),
        };
        let mut verdict = evaluator.evaluate(&self.answer_key(), &submission)?;
        let custom = if verdict.all_correct {
            self.feedback_correct.as_deref()
        } else {
            self.feedback_incorrect.as_deref()
        };
        if let Some(text) = custom {
            verdict.message = format!("{} {}", verdict.message, text);
        }
        Ok(QuestionFeedback {
            verdict,
            correct_answer: self.answer.clone(),
            explanation: self.explanation.clone(),
        })
    }
}
