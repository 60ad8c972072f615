//! Tests for the prediction service, driven through a scripted transport.

use std::collections::VecDeque;
use std::error::Error;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use triage_client::{ApiConfig, CompletionTransport, ErrorMonitor, PredictionService};
use triage_core::{Gender, PatientRecord, PatientRecordBuilder, Race};
use triage_error::{ApiError, ApiErrorKind};
use triage_rate_limit::RateLimiter;

const VALID_PAYLOAD: &str = r#"{
    "admissionProbability": 0.85,
    "prediction": "Admit",
    "structuredFeatureImportance": [
        { "feature": "Heart Rate", "value": 110, "importance": 0.42 }
    ],
    "textFeatureImportance": [
        { "word": "chest pain", "importance": 0.38 }
    ],
    "fairnessMetrics": {
        "Gender": {
            "Male": { "accuracy": 0.91, "precision": 0.88, "recall": 0.90, "f1_score": 0.89 }
        }
    }
}"#;

struct MockTransport {
    responses: Mutex<VecDeque<Result<String, ApiError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockTransport {
    fn new(responses: Vec<Result<String, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl CompletionTransport for MockTransport {
    async fn complete(&self, _system_instruction: &str, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted")
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Transport whose every attempt hangs past the configured timeout.
struct StalledTransport {
    calls: AtomicU32,
}

#[async_trait]
impl CompletionTransport for StalledTransport {
    async fn complete(&self, _system_instruction: &str, _prompt: &str) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }

    fn provider_name(&self) -> &'static str {
        "stalled"
    }

    fn model_name(&self) -> &str {
        "stalled-model"
    }
}

fn patient() -> PatientRecord {
    PatientRecordBuilder::default()
        .age(55u32)
        .gender(Gender::Male)
        .race(Race::White)
        .heart_rate(110u32)
        .respiratory_rate(22u32)
        .systolic_bp(95u32)
        .diastolic_bp(60u32)
        .oxygen_saturation(94u32)
        .temperature(38.5f32)
        .triage_note("Pt c/o chest pain and shortness of breath, onset 2 hours ago.")
        .build()
        .unwrap()
}

fn service(responses: Vec<Result<String, ApiError>>) -> PredictionService<MockTransport> {
    let config = ApiConfig::new("test-api-key").unwrap();
    let limiter = Arc::new(RateLimiter::per_minute(*config.rate_limit_per_minute()));
    PredictionService::new(MockTransport::new(responses), &config, limiter)
}

fn transient(message: &str) -> ApiError {
    ApiError::upstream(Some(503), message)
}

#[tokio::test(start_paused = true)]
async fn returns_the_parsed_outcome_and_backfills_the_note() {
    let service = service(vec![Ok(VALID_PAYLOAD.to_string())]);
    let patient = patient();

    let outcome = service.predict_admission(&patient).await.unwrap();

    assert_eq!(outcome.admission_probability, 0.85);
    assert!(outcome.is_admit());
    // The scripted payload omits the note, so the service restores it.
    assert_eq!(&outcome.triage_note, patient.triage_note());
    assert_eq!(service.transport().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn renders_patient_data_into_the_prompt() {
    let service = service(vec![Ok(VALID_PAYLOAD.to_string())]);

    service.predict_admission(&patient()).await.unwrap();

    let prompt = service.transport().last_prompt();
    assert!(prompt.contains("- Age: 55"));
    assert!(prompt.contains("- Heart Rate: 110 bpm"));
    assert!(prompt.contains("- O2 Saturation: 94%"));
    assert!(prompt.contains("chest pain and shortness of breath"));
    assert!(prompt.contains("'admissionProbability'"));
}

#[tokio::test(start_paused = true)]
async fn accepts_a_payload_wrapped_in_a_code_fence() {
    let fenced = format!("```json\n{}\n```", VALID_PAYLOAD);
    let service = service(vec![Ok(fenced)]);

    let outcome = service.predict_admission(&patient()).await.unwrap();
    assert_eq!(outcome.admission_probability, 0.85);
}

#[tokio::test(start_paused = true)]
async fn malformed_payload_fails_fast_with_the_fixed_message() {
    let service = service(vec![Ok("this is not json".to_string())]);

    let err = service.predict_admission(&patient()).await.unwrap_err();

    assert_eq!(err.kind(), &ApiErrorKind::InvalidResponseFormat);
    assert_eq!(err.message(), "Failed to parse model response");
    assert_eq!(
        err.user_message(),
        "Invalid response from prediction service. Please try again."
    );
    // Structural failures do not consume the retry budget.
    assert_eq!(service.transport().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn retries_transient_failures_until_success() {
    let service = service(vec![
        Err(transient("service unavailable")),
        Err(ApiError::upstream(None, "connection reset")),
        Ok(VALID_PAYLOAD.to_string()),
    ]);
    let start = Instant::now();

    let outcome = service.predict_admission(&patient()).await.unwrap();

    assert_eq!(outcome.admission_probability, 0.85);
    assert_eq!(service.transport().calls(), 3);
    // 1000ms before the second attempt, 2000ms before the third.
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn classifies_exhausted_retries_as_prediction_failed() {
    let service = service(vec![
        Err(transient("failure 1")),
        Err(transient("failure 2")),
        Err(transient("failure 3")),
    ]);

    let err = service.predict_admission(&patient()).await.unwrap_err();

    assert_eq!(err.kind(), &ApiErrorKind::PredictionFailed);
    assert_eq!(err.message(), "Failed to generate prediction after 3 attempts");
    assert_eq!(
        err.user_message(),
        "Failed to generate prediction. Please try again."
    );
    // The last underlying failure is retained for diagnostics.
    let cause = err.source().expect("cause should be retained");
    assert!(cause.to_string().contains("failure 3"));
    assert_eq!(service.transport().calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn surfaces_a_remote_rate_limit_immediately() {
    let service = service(vec![Err(ApiError::rate_limited("quota exceeded"))]);

    let err = service.predict_admission(&patient()).await.unwrap_err();

    assert_eq!(err.kind(), &ApiErrorKind::RateLimitExceeded);
    assert_eq!(err.status_code(), 429);
    assert_eq!(err.user_message(), "Too many requests. Please try again later.");
    assert_eq!(service.transport().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn times_out_stalled_attempts_and_exhausts_the_budget() {
    let config = ApiConfig::new("test-api-key").unwrap();
    let limiter = Arc::new(RateLimiter::per_minute(*config.rate_limit_per_minute()));
    let service = PredictionService::new(
        StalledTransport {
            calls: AtomicU32::new(0),
        },
        &config,
        limiter,
    );

    let err = service.predict_admission(&patient()).await.unwrap_err();

    assert_eq!(err.kind(), &ApiErrorKind::PredictionFailed);
    assert_eq!(service.transport().calls.load(Ordering::SeqCst), 3);
    let cause = err.source().expect("cause should be retained");
    assert!(cause.to_string().contains("timed out after 30000ms"));
}

#[tokio::test(start_paused = true)]
async fn sequential_calls_share_the_rate_limiter() {
    let config = ApiConfig::new("test-api-key").unwrap();
    let limiter = Arc::new(RateLimiter::new(
        NonZeroU32::new(1).unwrap(),
        Duration::from_secs(60),
    ));
    let service = PredictionService::new(
        MockTransport::new(vec![
            Ok(VALID_PAYLOAD.to_string()),
            Ok(VALID_PAYLOAD.to_string()),
        ]),
        &config,
        limiter,
    );
    let patient = patient();
    let start = Instant::now();

    service.predict_admission(&patient).await.unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);

    service.predict_admission(&patient).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn records_classified_failures_into_the_monitor() {
    let monitor = Arc::new(ErrorMonitor::default());
    let service = service(vec![Err(ApiError::rate_limited("quota exceeded"))])
        .with_monitor(monitor.clone());

    service.predict_admission(&patient()).await.unwrap_err();

    assert_eq!(monitor.len(), 1);
    let entries = monitor.recent(10);
    assert_eq!(entries[0].code, "RateLimitExceeded");
    assert_eq!(entries[0].status_code, 429);
    assert_eq!(entries[0].context, "predict_admission");
}
