//! Core data types for the Triage admission-prediction library.
//!
//! This crate defines the validated patient intake record, the prediction
//! payload returned by the model, the ward/bed inventory used for admission
//! placement, and the printable admission record.

#![forbid(unsafe_code)]

mod admission;
mod beds;
mod patient;
mod prediction;
mod telemetry;

pub use admission::AdmissionRecord;
pub use beds::{Bed, BedRegistry, BedStatus, Ward};
pub use patient::{Gender, PatientRecord, PatientRecordBuilder, Race};
pub use prediction::{
    AdmissionDecision, FairnessMetric, FairnessMetrics, FeatureValue, PredictionOutcome,
    StructuredFeatureImportance, TextFeatureImportance,
};
pub use telemetry::init_telemetry;
