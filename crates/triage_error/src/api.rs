//! Classified errors for calls to the prediction model API.

use std::fmt;

/// Fallback message for failures that carry no caller-visible classification.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// The closed set of caller-visible API failure categories.
///
/// Callers branch on the kind rather than matching message strings. The
/// numeric HTTP-like representation is derived through
/// [`ApiErrorKind::status_code`], and the stable wire string through
/// [`ApiErrorKind::code`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Quota breach reported by the upstream service.
    RateLimitExceeded,
    /// Response payload could not be decoded into the expected shape.
    InvalidResponseFormat,
    /// Remote call failed after the retry budget was exhausted.
    PredictionFailed,
    /// Transport-level failure for a single attempt, before classification.
    Upstream {
        /// HTTP status reported by the upstream service, when one was received.
        status: Option<u16>,
    },
}

impl ApiErrorKind {
    /// Stable symbolic code for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage_error::ApiErrorKind;
    ///
    /// assert_eq!(ApiErrorKind::RateLimitExceeded.code(), "RateLimitExceeded");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorKind::RateLimitExceeded => "RateLimitExceeded",
            ApiErrorKind::InvalidResponseFormat => "InvalidResponseFormat",
            ApiErrorKind::PredictionFailed => "PredictionFailed",
            ApiErrorKind::Upstream { .. } => "Upstream",
        }
    }

    /// HTTP-like numeric form of this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiErrorKind::RateLimitExceeded => 429,
            ApiErrorKind::InvalidResponseFormat => 500,
            ApiErrorKind::PredictionFailed => 500,
            ApiErrorKind::Upstream { status } => status.unwrap_or(502),
        }
    }

    /// Static, non-technical message shown to end users for this kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiErrorKind::RateLimitExceeded => "Too many requests. Please try again later.",
            ApiErrorKind::InvalidResponseFormat => {
                "Invalid response from prediction service. Please try again."
            }
            ApiErrorKind::PredictionFailed => "Failed to generate prediction. Please try again.",
            ApiErrorKind::Upstream { .. } => UNEXPECTED_ERROR_MESSAGE,
        }
    }

    /// Check if a failure of this kind should trigger a retry.
    ///
    /// Transport failures with no status (connection errors, timeouts) and
    /// status codes 408/429/500/502/503/504 are transient. Classified kinds
    /// are permanent: a malformed payload will not reparse on retry, and
    /// quota pressure is already paced by the local rate limiter.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiErrorKind::Upstream { status: None } => true,
            ApiErrorKind::Upstream { status: Some(code) } => {
                matches!(*code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            ApiErrorKind::InvalidResponseFormat => write!(f, "Invalid response format"),
            ApiErrorKind::PredictionFailed => write!(f, "Prediction failed"),
            ApiErrorKind::Upstream { status: Some(code) } => write!(f, "Upstream HTTP {} error", code),
            ApiErrorKind::Upstream { status: None } => write!(f, "Upstream transport error"),
        }
    }
}

/// Classified API error with source location tracking.
///
/// Constructed once, at classification or at retry exhaustion, and propagated
/// unchanged up the call stack. The underlying failure is retained in the
/// error source chain for diagnostics and is never surfaced to end users;
/// those see [`ApiError::user_message`].
///
/// # Examples
///
/// ```
/// use triage_error::{ApiError, ApiErrorKind, RetryableError};
///
/// let err = ApiError::upstream(Some(503), "service unavailable");
/// assert!(err.is_retryable());
/// assert_eq!(err.status_code(), 503);
///
/// let err = ApiError::rate_limited("quota exceeded");
/// assert_eq!(err.kind(), &ApiErrorKind::RateLimitExceeded);
/// assert_eq!(err.user_message(), "Too many requests. Please try again later.");
/// ```
#[derive(Debug, derive_more::Display)]
#[display("API Error: {}: {} at line {} in {}", kind, message, line, file)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    line: u32,
    file: &'static str,
}

impl ApiError {
    /// Create a new API error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            source: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a new API error retaining the underlying failure.
    #[track_caller]
    pub fn with_source(
        kind: ApiErrorKind,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Quota breach reported by the upstream service.
    #[track_caller]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::RateLimitExceeded, message)
    }

    /// Payload that could not be decoded into the expected shape.
    #[track_caller]
    pub fn invalid_response(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::with_source(
            ApiErrorKind::InvalidResponseFormat,
            "Failed to parse model response",
            source,
        )
    }

    /// Remote call that failed after exhausting the retry budget.
    ///
    /// `source` is the last underlying failure observed; intermediate
    /// failures are discarded.
    #[track_caller]
    pub fn prediction_failed(
        attempts: u32,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::with_source(
            ApiErrorKind::PredictionFailed,
            format!("Failed to generate prediction after {} attempts", attempts),
            source,
        )
    }

    /// Transport-level failure for a single attempt.
    #[track_caller]
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Upstream { status }, message)
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    /// Get the human-readable detail message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP-like numeric form of the error kind.
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Static, non-technical message shown to end users.
    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like 503 (service unavailable) or network timeouts
/// should return true. Permanent errors like 401 (unauthorized) or a
/// malformed payload should return false.
///
/// # Examples
///
/// ```
/// use triage_error::{ApiError, RetryableError};
///
/// assert!(ApiError::upstream(None, "connection reset").is_retryable());
/// assert!(!ApiError::upstream(Some(401), "unauthorized").is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ApiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
