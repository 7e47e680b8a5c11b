use thiserror::Error;

/// Configuration problems are fatal at load time, before any records are
/// touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be > 0 (got {value})")]
    NonPositive { field: &'static str, value: i64 },

    #[error("llm.model must not be empty")]
    EmptyModel,

    #[error("llm.endpoint is not a valid http(s) URL: {endpoint} ({reason})")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-request failures from the generation backend. Classified into
/// retryable (transient) and non-retryable; a chunk only fails after the
/// retry policy runs out or a non-retryable error occurs.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("malformed response from backend: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Transient failures worth another attempt: connection problems,
    /// timeouts, rate limiting (429) and server-side errors (5xx).
    /// Any other HTTP status or a malformed body fails the chunk
    /// immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport(_) | LlmError::Timeout(_) => true,
            LlmError::Backend { status, .. } => *status == 429 || (500u16..600).contains(status),
            LlmError::InvalidResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_timeout_are_retryable() {
        assert!(LlmError::Transport("connection refused".into()).is_retryable());
        assert!(LlmError::Timeout(60).is_retryable());
    }

    #[test]
    fn backend_status_classification() {
        let retryable = [429, 500, 502, 503];
        for status in retryable {
            assert!(
                LlmError::Backend {
                    status,
                    body: String::new()
                }
                .is_retryable(),
                "{status} should be retryable"
            );
        }

        let fatal = [400, 401, 404, 422];
        for status in fatal {
            assert!(
                !LlmError::Backend {
                    status,
                    body: String::new()
                }
                .is_retryable(),
                "{status} should fail the chunk immediately"
            );
        }
    }

    #[test]
    fn malformed_response_is_fatal() {
        assert!(!LlmError::InvalidResponse("no choices".into()).is_retryable());
    }
}
