//! Prediction service client for the Triage library.
//!
//! This crate wires the resilience core to a remote completion service:
//! [`ApiConfig`] loads and validates the environment configuration,
//! [`CompletionTransport`] abstracts the remote model call,
//! [`GeminiTransport`] implements it against the Gemini REST API, and
//! [`PredictionService`] sequences rate limiting, retry, payload parsing,
//! and error classification behind a single async operation.

#![forbid(unsafe_code)]

mod config;
mod monitor;
mod prompt;
mod service;
mod transport;

pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use monitor::{ErrorLogEntry, ErrorMonitor};
pub use service::PredictionService;
pub use transport::{CompletionTransport, GeminiTransport};
