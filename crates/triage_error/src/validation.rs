//! Patient intake validation errors.

/// Specific validation failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Missing required field
    #[display("Missing required field: {}", _0)]
    MissingField(String),

    /// Field value outside its accepted range
    #[display("Invalid field value for '{}': {}", field, reason)]
    InvalidField {
        /// The field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Validation failed
    #[display("Validation failed: {}", _0)]
    ValidationFailed(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use triage_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::InvalidField {
///     field: "heart_rate".to_string(),
///     reason: "Heart rate must be at least 30 bpm".to_string(),
/// });
/// assert!(format!("{}", err).contains("heart_rate"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    line: u32,
    file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}

/// Convert from derive_builder's uninitialized-field error.
impl From<derive_builder::UninitializedFieldError> for ValidationError {
    #[track_caller]
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::new(ValidationErrorKind::MissingField(err.field_name().to_string()))
    }
}

/// Convert from derive_builder error string.
impl From<String> for ValidationError {
    #[track_caller]
    fn from(msg: String) -> Self {
        Self::new(ValidationErrorKind::ValidationFailed(msg))
    }
}
