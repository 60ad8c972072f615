//! Bed allocation and admission errors.

/// Specific admission failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AdmissionErrorKind {
    /// No bed with the requested identifier exists
    #[display("Unknown bed: {}", _0)]
    UnknownBed(String),

    /// The requested bed cannot currently be allocated
    #[display("Bed {} is not available ({})", id, status)]
    BedUnavailable {
        /// Bed identifier
        id: String,
        /// Current bed status
        status: String,
    },
}

/// Admission error with location tracking.
///
/// # Examples
///
/// ```
/// use triage_error::{AdmissionError, AdmissionErrorKind};
///
/// let err = AdmissionError::new(AdmissionErrorKind::UnknownBed("MED-999-9".to_string()));
/// assert!(format!("{}", err).contains("MED-999-9"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Admission Error: {} at line {} in {}", kind, line, file)]
pub struct AdmissionError {
    kind: AdmissionErrorKind,
    line: u32,
    file: &'static str,
}

impl AdmissionError {
    /// Create a new admission error with caller location tracking.
    #[track_caller]
    pub fn new(kind: AdmissionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AdmissionErrorKind {
        &self.kind
    }
}
