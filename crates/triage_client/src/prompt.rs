//! Prompt assembly for the admission prediction model.

use triage_core::PatientRecord;

/// System instruction establishing the model's role and output contract.
pub(crate) const SYSTEM_INSTRUCTION: &str = "You are a sophisticated, multimodal, explainable AI model (ClinicalBERT + XGBoost) designed to predict Emergency Department (ED) admission based on MIMIC-IV data. \
Your task is to analyze the provided structured data and unstructured triage note to make a prediction. \
You MUST provide explanations for your prediction in the form of SHAP values for structured features and LIME-style word importances for the text. \
You MUST also provide simulated fairness audit metrics for different demographic groups. \
The output MUST be a valid JSON object that strictly adheres to the provided schema. Do not include any markdown formatting like ```json.";

/// Render the per-request prompt from the validated patient record.
pub(crate) fn build_prompt(patient: &PatientRecord) -> String {
    format!(
        "Analyze the following patient data and predict the likelihood of ED admission.\n\
         \n\
         **Structured Data:**\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Race: {race}\n\
         - Heart Rate: {heart_rate} bpm\n\
         - Respiratory Rate: {respiratory_rate} breaths/min\n\
         - Systolic BP: {systolic_bp} mmHg\n\
         - Diastolic BP: {diastolic_bp} mmHg\n\
         - O2 Saturation: {oxygen_saturation}%\n\
         - Temperature: {temperature}\u{b0}C\n\
         \n\
         **Unstructured Triage Note:**\n\
         \"{triage_note}\"\n\
         \n\
         Based on this information, generate a complete JSON response including:\n\
         1. 'admissionProbability': A float between 0 and 1.\n\
         2. 'prediction': 'Admit' or 'Discharge'.\n\
         3. 'triageNote': The original triage note.\n\
         4. 'structuredFeatureImportance': An array of objects with SHAP values. High absolute values are more important. Positive values push towards admission, negative towards discharge.\n\
         5. 'textFeatureImportance': An array of objects with LIME values for key words in the triage note. Positive values push towards admission, negative towards discharge.\n\
         6. 'fairnessMetrics': A nested object with simulated fairness metrics (accuracy, precision, recall, f1_score) for Gender and Race subgroups.",
        age = patient.age(),
        gender = patient.gender(),
        race = patient.race(),
        heart_rate = patient.heart_rate(),
        respiratory_rate = patient.respiratory_rate(),
        systolic_bp = patient.systolic_bp(),
        diastolic_bp = patient.diastolic_bp(),
        oxygen_saturation = patient.oxygen_saturation(),
        temperature = patient.temperature(),
        triage_note = patient.triage_note(),
    )
}
