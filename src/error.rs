use thiserror::Error;

/// Maximum characters to include in error message body for debugging.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// CMQ answers `ReceiveMessage` on an empty queue with this code once the
/// polling window has elapsed.
pub const NO_MESSAGE_CODE: i64 = 7000;

/// Errors that can occur when using the CMQ SDK.
#[derive(Debug, Error)]
pub enum CmqError {
    /// HTTP/network layer error from reqwest (connect failure, timeout, ...).
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// CMQ accepted the request but reported a non-zero `code`.
    #[error("server error (RequestId: {request_id}): [{code}] {message}")]
    Server {
        code: i64,
        message: String,
        request_id: String,
    },

    /// Signature computation error.
    #[error("signature error: {0}")]
    Signature(String),

    /// Credential not found or invalid.
    #[error("credential error: {0}")]
    Credential(String),

    /// Response body is not valid JSON or lacks the envelope.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Client configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Request parameters rejected before anything was sent.
    #[error("validation error: {0}")]
    Validation(String),
}

impl CmqError {
    /// Returns `true` if the error is potentially recoverable by retrying.
    ///
    /// Retryable errors include:
    /// - Network errors (timeouts, connection issues)
    /// - Non-2xx responses from the gateway
    /// - CMQ internal errors (codes 6000-6999)
    ///
    /// The SDK never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            CmqError::HttpClient(e) => e.is_timeout() || e.is_connect(),
            CmqError::Http(_) => true,
            CmqError::Server { code, .. } => (6000..7000).contains(code),
            CmqError::Signature(_)
            | CmqError::Credential(_)
            | CmqError::Deserialize(_)
            | CmqError::Config(_)
            | CmqError::Validation(_) => false,
        }
    }

    /// Returns `true` if a receive found no message before the poll window closed.
    pub fn is_no_message(&self) -> bool {
        matches!(self, CmqError::Server { code, .. } if *code == NO_MESSAGE_CODE)
    }

    /// Returns the request ID if this is a server error.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            CmqError::Server { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Returns the error code if this is a server error.
    pub fn error_code(&self) -> Option<i64> {
        match self {
            CmqError::Server { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// A specialized Result type for CMQ operations.
pub type Result<T> = std::result::Result<T, CmqError>;

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(code: i64) -> CmqError {
        CmqError::Server {
            code,
            message: "queue not exist".to_string(),
            request_id: "r-1".to_string(),
        }
    }

    #[test]
    fn server_error_display() {
        let msg = server_error(4440).to_string();
        assert!(msg.contains("r-1"));
        assert!(msg.contains("4440"));
        assert!(msg.contains("queue not exist"));
    }

    #[test]
    fn server_error_accessors() {
        let err = server_error(4440);
        assert_eq!(err.error_code(), Some(4440));
        assert_eq!(err.request_id(), Some("r-1"));

        let other = CmqError::Validation("x".into());
        assert_eq!(other.error_code(), None);
        assert_eq!(other.request_id(), None);
    }

    #[test]
    fn http_error_display() {
        let err = CmqError::Http("HTTP 502 with body: Bad Gateway".to_string());
        assert_eq!(
            err.to_string(),
            "HTTP error: HTTP 502 with body: Bad Gateway"
        );
    }

    #[test]
    fn validation_error_display() {
        let err = CmqError::Validation("queueName is empty".to_string());
        assert_eq!(err.to_string(), "validation error: queueName is empty");
    }

    #[test]
    fn retryable_classification() {
        assert!(CmqError::Http("HTTP 503".into()).is_retryable());
        assert!(server_error(6000).is_retryable());
        assert!(!server_error(4440).is_retryable());
        assert!(!server_error(NO_MESSAGE_CODE).is_retryable());
        assert!(!CmqError::Validation("empty".into()).is_retryable());
        assert!(!CmqError::Credential("missing".into()).is_retryable());
    }

    #[test]
    fn no_message_detection() {
        assert!(server_error(NO_MESSAGE_CODE).is_no_message());
        assert!(!server_error(4440).is_no_message());
        assert!(!CmqError::Http("HTTP 500".into()).is_no_message());
    }

    #[test]
    fn truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_str_multibyte() {
        let s = "队列不存在的错误";
        assert_eq!(truncate_str(s, 4), "队列不存");
    }

    #[test]
    fn truncate_str_empty() {
        assert_eq!(truncate_str("", 10), "");
    }
}
