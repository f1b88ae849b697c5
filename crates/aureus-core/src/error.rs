//! Error types.
//!
//! `ProviderError` lives here rather than in `aureus-providers` so the
//! question source can classify backend failures when logging a fallback.

use thiserror::Error;

/// Errors that can occur when interacting with a question-generation backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error will not go away by asking again.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// A question record that breaks the question invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("expected {expected} options, got {actual}")]
    WrongOptionCount { expected: usize, actual: usize },

    #[error("option is empty")]
    EmptyOption,

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct answer {0:?} is not one of the options")]
    CorrectNotInOptions(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

/// Failure to turn backend text into a question list.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("response is not valid question JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("expected {expected} questions, got {actual}")]
    TooFewQuestions { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("gemini-0".into()).is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert!(!ProviderError::NetworkError("reset".into()).is_permanent());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        let err = ProviderError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.retry_after_ms(), Some(5000));
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
        assert_eq!(ProviderError::Timeout(1).retry_after_ms(), None);
    }

    #[test]
    fn invalid_question_message_names_index() {
        let err = ParseError::InvalidQuestion {
            index: 2,
            source: QuestionError::CorrectNotInOptions("Zeus".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("question 2"));
        assert!(msg.contains("Zeus"));
    }
}
