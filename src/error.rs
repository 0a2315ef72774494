//! Turn-level error taxonomy.
//!
//! Everything that can make a single question/answer turn fail outright lands
//! here. Tool failures are deliberately absent: the dispatch loop folds them
//! back into the scratchpad as observations so the model can adapt.

use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("No API key configured for this session")]
    MissingCredential,

    #[error("Model provider rejected the credential: {0}")]
    Authentication(String),

    #[error("Model reply could not be parsed as a directive after {attempts} attempts")]
    ModelParse { attempts: usize },

    #[error("Network error talking to the model provider: {0}")]
    Network(String),

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Turn did not complete within {0} steps")]
    StepLimit(usize),

    #[error("Model provider error: {0}")]
    Model(String),
}

impl From<LlmError> for TurnError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Authentication(msg) => TurnError::Authentication(msg),
            LlmError::Network(msg) => TurnError::Network(msg),
            LlmError::Api { status, message } => {
                TurnError::Model(format!("upstream returned {}: {}", status, message))
            }
            LlmError::EmptyResponse => TurnError::Model("model returned an empty reply".into()),
        }
    }
}

impl TurnError {
    /// Stable machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            TurnError::MissingCredential => "missing_credential",
            TurnError::Authentication(_) => "authentication_error",
            TurnError::ModelParse { .. } => "model_parse_error",
            TurnError::Network(_) => "network_error",
            TurnError::EmptyQuestion => "empty_question",
            TurnError::StepLimit(_) => "step_limit",
            TurnError::Model(_) => "model_error",
        }
    }
}
