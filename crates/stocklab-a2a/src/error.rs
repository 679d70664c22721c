//! Typed failures of an A2A request/poll/extract cycle

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, A2aError>;

#[derive(Debug, Error)]
pub enum A2aError {
    /// The endpoint refused or could not accept the connection
    #[error("Cannot connect to A2A server at {endpoint}. Please ensure the server is running: {hint}")]
    Connection { endpoint: String, hint: String },

    #[error("Request to A2A server at {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    /// Malformed or erroring JSON-RPC exchange, or a completed task without a payload
    #[error("A2A protocol error: {0}")]
    Protocol(String),

    #[error("Task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },

    #[error("Task {task_id} was canceled")]
    TaskCanceled { task_id: String },

    #[error("Task {task_id} did not complete within {attempts} polling attempts")]
    PollingTimeout { task_id: String, attempts: u32 },

    /// The extracted payload does not match the expected report schema
    #[error("Result failed validation: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl A2aError {
    /// Stable short name for display and matching
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "ConnectionError",
            Self::Timeout { .. } => "TimeoutError",
            Self::Protocol(_) => "ProtocolError",
            Self::TaskFailed { .. } => "TaskFailedError",
            Self::TaskCanceled { .. } => "TaskCanceledError",
            Self::PollingTimeout { .. } => "PollingTimeoutError",
            Self::Validation(_) => "ValidationError",
            Self::InvalidRequest(_) => "InvalidRequestError",
        }
    }

    /// Remediation text for failures the user can fix locally
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Connection { hint, .. } => Some(hint),
            _ => None,
        }
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_message() {
        let err = A2aError::Connection {
            endpoint: "http://localhost:8001".to_string(),
            hint: "start the server".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://localhost:8001"));
        assert!(msg.contains("start the server"));
        assert_eq!(err.kind(), "ConnectionError");
        assert_eq!(err.hint(), Some("start the server"));
    }

    #[test]
    fn test_timeout_keeps_subsecond_precision() {
        let err = A2aError::Timeout {
            endpoint: "http://localhost:8001".to_string(),
            timeout: Duration::from_millis(200),
        };
        assert!(err.to_string().ends_with("timed out after 200ms"));
    }

    #[test]
    fn test_polling_timeout_names_attempts() {
        let err = A2aError::PollingTimeout {
            task_id: "t-1".to_string(),
            attempts: 60,
        };
        assert!(err.to_string().contains("60 polling attempts"));
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            A2aError::Timeout { endpoint: String::new(), timeout: Duration::from_secs(1) },
            A2aError::protocol("x"),
            A2aError::TaskFailed { task_id: String::new(), message: String::new() },
            A2aError::TaskCanceled { task_id: String::new() },
            A2aError::Validation(String::new()),
            A2aError::InvalidRequest(String::new()),
        ];
        let mut kinds: Vec<_> = errors.iter().map(A2aError::kind).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }
}
