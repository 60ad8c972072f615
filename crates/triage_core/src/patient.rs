//! Validated patient intake data.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use triage_error::{ValidationError, ValidationErrorKind};

/// Patient gender as recorded at intake.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Patient race as recorded at intake.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Race {
    White,
    Black,
    Asian,
    Hispanic,
    Other,
}

/// Patient vitals, demographics, and free-text triage note.
///
/// Construct through [`PatientRecordBuilder`], which enforces the intake
/// ranges at build time and fails with a [`ValidationError`] naming the
/// offending field. Deserialization is provided for records that were
/// already validated at intake.
///
/// # Examples
///
/// ```
/// use triage_core::{Gender, PatientRecordBuilder, Race};
///
/// let patient = PatientRecordBuilder::default()
///     .age(55u32)
///     .gender(Gender::Male)
///     .race(Race::White)
///     .heart_rate(110u32)
///     .respiratory_rate(22u32)
///     .systolic_bp(95u32)
///     .diastolic_bp(60u32)
///     .oxygen_saturation(94u32)
///     .temperature(38.5f32)
///     .triage_note("Chest pain and shortness of breath on arrival.")
///     .build()
///     .unwrap();
///
/// assert_eq!(*patient.heart_rate(), 110);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into), build_fn(validate = "Self::validate", error = "ValidationError"))]
pub struct PatientRecord {
    /// Age in years.
    age: u32,
    gender: Gender,
    race: Race,
    /// Heart rate in beats per minute.
    heart_rate: u32,
    /// Respiratory rate in breaths per minute.
    respiratory_rate: u32,
    /// Systolic blood pressure in mmHg.
    systolic_bp: u32,
    /// Diastolic blood pressure in mmHg.
    diastolic_bp: u32,
    /// Peripheral oxygen saturation in percent.
    oxygen_saturation: u32,
    /// Body temperature in degrees Celsius.
    temperature: f32,
    /// Free-text triage note.
    triage_note: String,
}

impl PatientRecordBuilder {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(age) = self.age {
            bounded(
                "age",
                age,
                0,
                120,
                "Age must be a positive number",
                "Age must be less than 120",
            )?;
        }
        if let Some(rate) = self.heart_rate {
            bounded(
                "heart_rate",
                rate,
                30,
                250,
                "Heart rate must be at least 30 bpm",
                "Heart rate must be less than 250 bpm",
            )?;
        }
        if let Some(rate) = self.respiratory_rate {
            bounded(
                "respiratory_rate",
                rate,
                4,
                60,
                "Respiratory rate must be at least 4 breaths/min",
                "Respiratory rate must be less than 60 breaths/min",
            )?;
        }
        if let Some(pressure) = self.systolic_bp {
            bounded(
                "systolic_bp",
                pressure,
                50,
                250,
                "Systolic BP must be at least 50 mmHg",
                "Systolic BP must be less than 250 mmHg",
            )?;
        }
        if let Some(pressure) = self.diastolic_bp {
            bounded(
                "diastolic_bp",
                pressure,
                20,
                150,
                "Diastolic BP must be at least 20 mmHg",
                "Diastolic BP must be less than 150 mmHg",
            )?;
        }
        if let Some(saturation) = self.oxygen_saturation {
            bounded(
                "oxygen_saturation",
                saturation,
                50,
                100,
                "Oxygen saturation must be at least 50%",
                "Oxygen saturation cannot exceed 100%",
            )?;
        }
        if let Some(temperature) = self.temperature {
            bounded(
                "temperature",
                temperature,
                30.0,
                45.0,
                "Temperature must be at least 30\u{b0}C",
                "Temperature must be less than 45\u{b0}C",
            )?;
        }
        if let Some(note) = &self.triage_note {
            let length = note.chars().count();
            if length < 10 {
                return Err(invalid(
                    "triage_note",
                    "Triage note must be at least 10 characters",
                ));
            }
            if length > 1000 {
                return Err(invalid(
                    "triage_note",
                    "Triage note must not exceed 1000 characters",
                ));
            }
        }
        Ok(())
    }
}

fn bounded<T: PartialOrd>(
    field: &str,
    value: T,
    min: T,
    max: T,
    below: &str,
    above: &str,
) -> Result<(), ValidationError> {
    if value < min {
        return Err(invalid(field, below));
    }
    if value > max {
        return Err(invalid(field, above));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ValidationError {
    ValidationError::new(ValidationErrorKind::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    })
}
