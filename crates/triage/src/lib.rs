//! Triage - Clinical admission-prediction client
//!
//! Triage provides the client-side core of a clinical decision-support demo:
//! validated patient vitals and a free-text triage note go in, a remote
//! generative model is called under rate limiting and retry, and its JSON
//! reply comes back as a typed prediction record with feature-importance
//! explanations and fairness metrics.
//!
//! # Features
//!
//! - **Validated intake**: `PatientRecord` enforces vital-sign ranges at
//!   construction
//! - **Rate Limiting**: sliding-window admission control shared across
//!   callers
//! - **Retry**: exponential backoff with a bounded attempt budget and
//!   fail-fast classification of permanent errors
//! - **Typed failures**: a closed `ApiErrorKind` taxonomy with stable
//!   user-facing messages
//! - **Bed Allocation**: ward/bed inventory and printable admission records
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use triage::{ApiConfig, GeminiTransport, PredictionService, RateLimiter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::from_env()?;
//!     let limiter = Arc::new(RateLimiter::per_minute(*config.rate_limit_per_minute()));
//!     let service = PredictionService::new(GeminiTransport::new(&config), &config, limiter);
//!
//!     let outcome = service.predict_admission(&patient).await?;
//!     println!("Admission probability: {}", outcome.admission_probability);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Triage is organized as a workspace with focused crates:
//!
//! - `triage_core` - Core data types (patient record, prediction payload,
//!   beds, admission record)
//! - `triage_error` - Error types
//! - `triage_rate_limit` - Rate limiting and retry logic
//! - `triage_client` - Configuration, transport, and the prediction service
//!
//! This crate (`triage`) re-exports everything for convenience.

#![forbid(unsafe_code)]

pub use triage_client::*;
pub use triage_core::*;
pub use triage_error::*;
pub use triage_rate_limit::*;
