//! Tests for bed allocation and admission record rendering.

use triage_core::{
    AdmissionRecord, BedRegistry, BedStatus, Gender, PatientRecordBuilder, PredictionOutcome, Race,
    Ward,
};
use triage_error::AdmissionErrorKind;

fn outcome_json(probability: f64) -> PredictionOutcome {
    let json = format!(
        r#"{{
            "admissionProbability": {},
            "prediction": "Admit",
            "triageNote": "Pt c/o chest pain and shortness of breath.",
            "structuredFeatureImportance": [],
            "textFeatureImportance": [],
            "fairnessMetrics": {{}},
            "suggestedWard": "Cardiology",
            "estimatedTimeToAdmission": "45 minutes"
        }}"#,
        probability
    );
    serde_json::from_str(&json).unwrap()
}

#[test]
fn sample_registry_lists_wards_in_inventory_order() {
    let registry = BedRegistry::sample();
    assert_eq!(
        registry.wards(),
        vec![Ward::Medical, Ward::Surgical, Ward::Cardiology, Ward::Icu]
    );
}

#[test]
fn filters_available_beds_by_ward() {
    let registry = BedRegistry::sample();

    let medical = registry.available_in(Ward::Medical);
    assert_eq!(medical.len(), 3);
    assert!(medical.iter().all(|bed| bed.is_available()));
    assert!(medical.iter().all(|bed| bed.ward() == &Ward::Medical));
}

#[test]
fn allocation_marks_the_bed_taken() {
    let mut registry = BedRegistry::sample();

    let bed = registry.allocate("ICU-401-1").unwrap();
    assert_eq!(bed.status(), &BedStatus::Taken);

    let stored = registry.get("ICU-401-1").unwrap();
    assert_eq!(stored.status(), &BedStatus::Taken);
    assert!(registry.available_in(Ward::Icu).is_empty());
}

#[test]
fn allocating_a_taken_bed_fails() {
    let mut registry = BedRegistry::sample();

    let err = registry.allocate("MED-101-2").unwrap_err();
    match err.kind() {
        AdmissionErrorKind::BedUnavailable { id, status } => {
            assert_eq!(id, "MED-101-2");
            assert_eq!(status, "Taken");
        }
        other => panic!("expected BedUnavailable, got {:?}", other),
    }
}

#[test]
fn allocating_an_unknown_bed_fails() {
    let mut registry = BedRegistry::sample();

    let err = registry.allocate("MED-999-9").unwrap_err();
    assert!(matches!(
        err.kind(),
        AdmissionErrorKind::UnknownBed(id) if id == "MED-999-9"
    ));
}

#[test]
fn renders_the_admission_record() {
    let patient = PatientRecordBuilder::default()
        .age(55u32)
        .gender(Gender::Male)
        .race(Race::White)
        .heart_rate(110u32)
        .respiratory_rate(22u32)
        .systolic_bp(95u32)
        .diastolic_bp(60u32)
        .oxygen_saturation(94u32)
        .temperature(38.5f32)
        .triage_note("Pt c/o chest pain and shortness of breath.")
        .build()
        .unwrap();

    let mut registry = BedRegistry::sample();
    let bed = registry.allocate("CAR-301-2").unwrap();
    let record = AdmissionRecord::new(patient, outcome_json(0.85), bed);

    let text = record.render_text();
    assert!(text.contains("HOSPITAL ADMISSION RECORD"));
    assert!(text.contains(&format!("Patient ID:   {}", record.patient_id())));
    assert!(text.contains("Prediction:       Admit (85.0% Prob.)"));
    assert!(text.contains("Est. Time to Admit: 45 minutes"));
    assert!(text.contains("Suggested Ward:   Cardiology"));
    assert!(text.contains("Admitted To:  Cardiology"));
    assert!(text.contains("Bed ID:       CAR-301-2"));
    assert!(text.contains("chest pain"));
}
