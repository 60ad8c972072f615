//! Top-level error wrapper types.

use crate::{AdmissionError, ApiError, ConfigError, ValidationError, UNEXPECTED_ERROR_MESSAGE};

/// This is the foundation error enum. Each variant wraps one error family
/// from the Triage workspace.
///
/// # Examples
///
/// ```
/// use triage_error::{ConfigError, TriageError};
///
/// let config_err = ConfigError::new("Missing API key");
/// let err: TriageError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TriageErrorKind {
    /// Classified prediction API error
    #[from(ApiError)]
    Api(ApiError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Patient intake validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Bed allocation error
    #[from(AdmissionError)]
    Admission(AdmissionError),
}

/// Triage error with kind discrimination.
///
/// # Examples
///
/// ```
/// use triage_error::{ConfigError, TriageResult};
///
/// fn might_fail() -> TriageResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Triage Error: {}", _0)]
pub struct TriageError(Box<TriageErrorKind>);

impl TriageError {
    /// Create a new error from a kind.
    pub fn new(kind: TriageErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TriageErrorKind {
        &self.0
    }

    /// Static, non-technical message shown to end users.
    ///
    /// Classified API errors map to their per-kind message; everything else
    /// falls back to a generic message. Technical detail stays in the error
    /// chain for logging and is never shown to the end user.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage_error::{ApiError, ConfigError, TriageError, UNEXPECTED_ERROR_MESSAGE};
    ///
    /// let err = TriageError::from(ApiError::rate_limited("quota exceeded"));
    /// assert_eq!(err.user_message(), "Too many requests. Please try again later.");
    ///
    /// let err = TriageError::from(ConfigError::new("bad config"));
    /// assert_eq!(err.user_message(), UNEXPECTED_ERROR_MESSAGE);
    /// ```
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            TriageErrorKind::Api(err) => err.user_message(),
            _ => UNEXPECTED_ERROR_MESSAGE,
        }
    }
}

// Generic From implementation for any type that converts to TriageErrorKind
impl<T> From<T> for TriageError
where
    T: Into<TriageErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Triage operations.
///
/// # Examples
///
/// ```
/// use triage_error::{ConfigError, TriageResult};
///
/// fn load() -> TriageResult<String> {
///     Err(ConfigError::new("API_BASE_URL is not a valid URL"))?
/// }
/// ```
pub type TriageResult<T> = std::result::Result<T, TriageError>;
