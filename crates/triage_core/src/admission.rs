//! Printable admission record generation.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Bed, PatientRecord, PredictionOutcome};

/// A finalized admission: the patient, the prediction that drove it, and
/// the allocated bed.
///
/// Created once a bed has been allocated; the patient identifier and
/// admission timestamp are generated at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRecord {
    patient_id: Uuid,
    patient: PatientRecord,
    outcome: PredictionOutcome,
    bed: Bed,
    admitted_at: DateTime<Utc>,
}

impl AdmissionRecord {
    /// Finalize an admission for `patient` into `bed`.
    pub fn new(patient: PatientRecord, outcome: PredictionOutcome, bed: Bed) -> Self {
        Self {
            patient_id: Uuid::new_v4(),
            patient,
            outcome,
            bed,
            admitted_at: Utc::now(),
        }
    }

    /// Render the fixed-layout plain-text admission record.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn demo(record: &triage_core::AdmissionRecord) {
    /// let text = record.render_text();
    /// assert!(text.contains("HOSPITAL ADMISSION RECORD"));
    /// # }
    /// ```
    pub fn render_text(&self) -> String {
        let estimated = self
            .outcome
            .estimated_time_to_admission
            .as_deref()
            .unwrap_or("N/A");
        let suggested_ward = self
            .outcome
            .suggested_ward
            .map(|ward| ward.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        format!(
            "=================================\n\
             HOSPITAL ADMISSION RECORD\n\
             =================================\n\
             PATIENT INFORMATION\n\
             ---------------------------------\n\
             Patient ID:   {patient_id}\n\
             Age:          {age}\n\
             Gender:       {gender}\n\
             Race:         {race}\n\
             \n\
             TRIAGE & PREDICTION\n\
             ---------------------------------\n\
             Prediction:       {prediction} ({probability:.1}% Prob.)\n\
             Est. Time to Admit: {estimated}\n\
             Suggested Ward:   {suggested_ward}\n\
             Triage Note:\n\
             {note}\n\
             \n\
             ADMISSION DETAILS\n\
             ---------------------------------\n\
             Admitted To:  {ward}\n\
             Bed ID:       {bed_id}\n\
             Date:         {date}\n\
             =================================",
            patient_id = self.patient_id,
            age = self.patient.age(),
            gender = self.patient.gender(),
            race = self.patient.race(),
            prediction = self.outcome.prediction,
            probability = self.outcome.admission_probability * 100.0,
            estimated = estimated,
            suggested_ward = suggested_ward,
            note = self.patient.triage_note(),
            ward = self.bed.ward(),
            bed_id = self.bed.id(),
            date = self.admitted_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}
