//! Lab Tutor tools module
//!
//! MCP tool implementations: calculators, quiz checking and status.

pub mod calculators;
pub mod quizzes;
pub mod status;

use thiserror::Error;

use crate::error::CalcError;

/// Failure of a tool call
#[derive(Debug, Error)]
pub enum ToolError {
    /// Unknown module, scenario, question or practice problem
    #[error("{0}")]
    NotFound(String),

    /// The learner's input could not be computed or graded
    #[error(transparent)]
    Calc(#[from] CalcError),
}

pub type ToolResult<T> = Result<T, ToolError>;
