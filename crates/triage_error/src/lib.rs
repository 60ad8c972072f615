//! Error types for the Triage library.
//!
//! This crate provides the foundation error types used throughout the Triage
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use triage_error::{ConfigError, TriageResult};
//!
//! fn load_settings() -> TriageResult<String> {
//!     Err(ConfigError::new("GEMINI_API_KEY must not be empty"))?
//! }
//!
//! match load_settings() {
//!     Ok(settings) => println!("Loaded: {}", settings),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod admission;
mod api;
mod config;
mod error;
mod validation;

pub use admission::{AdmissionError, AdmissionErrorKind};
pub use api::{ApiError, ApiErrorKind, RetryableError, UNEXPECTED_ERROR_MESSAGE};
pub use config::ConfigError;
pub use error::{TriageError, TriageErrorKind, TriageResult};
pub use validation::{ValidationError, ValidationErrorKind};
