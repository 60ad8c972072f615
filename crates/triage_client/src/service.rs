//! The admission prediction service.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};
use triage_core::{PatientRecord, PredictionOutcome};
use triage_error::{ApiError, ApiErrorKind};
use triage_rate_limit::{with_retry, RateLimiter, RetryError, RetryPolicy};

use crate::{prompt, ApiConfig, CompletionTransport, ErrorMonitor};

/// Call-site wrapper exposing a single prediction operation.
///
/// Each call sequences: rate-limiter admission, then the retried remote
/// attempt (a timeout-bounded transport call followed by payload parsing),
/// then classification of the outcome. Callers receive either a decoded
/// [`PredictionOutcome`] or a classified [`ApiError`]; raw transport
/// failures never escape.
///
/// The rate limiter is injected so one limiter can pace every service
/// sharing an upstream quota, and so tests can instantiate isolated
/// instances.
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let limiter = Arc::new(RateLimiter::per_minute(*config.rate_limit_per_minute()));
/// let service = PredictionService::new(GeminiTransport::new(&config), &config, limiter);
///
/// let outcome = service.predict_admission(&patient).await?;
/// ```
pub struct PredictionService<T: CompletionTransport> {
    transport: T,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
    timeout: Duration,
    monitor: Option<Arc<ErrorMonitor>>,
}

impl<T: CompletionTransport> PredictionService<T> {
    /// Delay before the second attempt of a retried prediction.
    const BASE_DELAY: Duration = Duration::from_millis(1000);

    /// Upper clamp on the backoff between attempts.
    const MAX_DELAY: Duration = Duration::from_millis(5000);

    /// Create a service over `transport`, paced by `limiter`.
    pub fn new(transport: T, config: &ApiConfig, limiter: Arc<RateLimiter>) -> Self {
        Self {
            transport,
            limiter,
            policy: RetryPolicy::new(*config.max_retries(), Self::BASE_DELAY)
                .with_max_delay(Self::MAX_DELAY),
            timeout: config.timeout(),
            monitor: None,
        }
    }

    /// Record classified failures into `monitor`.
    pub fn with_monitor(mut self, monitor: Arc<ErrorMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Predict ED admission for a validated patient record.
    #[instrument(skip(self, patient), fields(provider = self.transport.provider_name()))]
    pub async fn predict_admission(
        &self,
        patient: &PatientRecord,
    ) -> Result<PredictionOutcome, ApiError> {
        self.limiter.wait_for_availability().await;

        let prompt = prompt::build_prompt(patient);
        let result = with_retry(&self.policy, || self.attempt(&prompt)).await;

        match result {
            Ok(mut outcome) => {
                // The model does not always echo the note back.
                if outcome.triage_note.is_empty() {
                    outcome.triage_note = patient.triage_note().clone();
                }
                info!(
                    probability = outcome.admission_probability,
                    prediction = %outcome.prediction,
                    "prediction complete"
                );
                Ok(outcome)
            }
            Err(RetryError::Permanent(err)) => Err(self.observed(err)),
            Err(RetryError::Exhausted { last, attempts }) => {
                Err(self.observed(ApiError::prediction_failed(attempts, last)))
            }
        }
    }

    /// One timeout-bounded attempt: remote call plus payload parse.
    async fn attempt(&self, prompt: &str) -> Result<PredictionOutcome, ApiError> {
        let call = self.transport.complete(prompt::SYSTEM_INSTRUCTION, prompt);
        let raw = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ApiError::upstream(
                    None,
                    format!("Model call timed out after {}ms", self.timeout.as_millis()),
                ));
            }
        };
        parse_outcome(&raw)
    }

    fn observed(&self, err: ApiError) -> ApiError {
        if let Some(monitor) = &self.monitor {
            monitor.record("predict_admission", &err);
        }
        err
    }
}

/// Decode the raw completion text into a prediction outcome.
fn parse_outcome(raw: &str) -> Result<PredictionOutcome, ApiError> {
    let body = strip_code_fence(raw.trim());

    let outcome: PredictionOutcome =
        serde_json::from_str(body).map_err(ApiError::invalid_response)?;

    if !(0.0..=1.0).contains(&outcome.admission_probability) {
        return Err(ApiError::new(
            ApiErrorKind::InvalidResponseFormat,
            format!(
                "Admission probability {} is outside 0..=1",
                outcome.admission_probability
            ),
        ));
    }

    Ok(outcome)
}

/// Models occasionally wrap the JSON in a markdown fence despite the
/// system instruction forbidding it.
fn strip_code_fence(text: &str) -> &str {
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
