use std::fmt;
use thiserror::Error;

use crate::providers::base::ProviderError;
use crate::tools::ToolError;

/// The step of a `generate` call an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FirstCall,
    ToolExecution,
    SecondCall,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::FirstCall => write!(f, "first call"),
            Phase::ToolExecution => write!(f, "tool execution"),
            Phase::SecondCall => write!(f, "second call"),
        }
    }
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Authentication configuration error: {message}")]
    AuthConfiguration {
        /// `None` when the client could not be built at construction
        phase: Option<Phase>,
        message: String,
    },

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Backend unavailable during {phase}: {message}")]
    BackendUnavailable { phase: Phase, message: String },

    #[error("Tool '{tool}' failed: {source}")]
    ToolExecution {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Malformed response during {phase}: {message}")]
    MalformedResponse { phase: Phase, message: String },
}

impl GenerateError {
    pub(crate) fn from_provider(phase: Phase, err: ProviderError) -> Self {
        match err {
            ProviderError::Unauthorized(message) => GenerateError::AuthConfiguration {
                phase: Some(phase),
                message,
            },
            ProviderError::Request(message) => GenerateError::BackendUnavailable { phase, message },
            ProviderError::Malformed(message) => GenerateError::MalformedResponse { phase, message },
        }
    }

    /// The phase the failure happened in, if it happened inside `generate`
    pub fn phase(&self) -> Option<Phase> {
        match self {
            GenerateError::BackendUnavailable { phase, .. }
            | GenerateError::MalformedResponse { phase, .. } => Some(*phase),
            GenerateError::AuthConfiguration { phase, .. } => *phase,
            GenerateError::ToolExecution { .. } => Some(Phase::ToolExecution),
            GenerateError::EmptyQuery => None,
        }
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;
