//! Analysis error types

use coach_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Evaluator unavailable: {0}")]
    EvaluatorUnavailable(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

impl From<CoreError> for AnalysisError {
    fn from(e: CoreError) -> Self {
        AnalysisError::InvalidPosition(e.to_string())
    }
}
