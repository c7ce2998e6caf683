//! Retry wrapper for any [`LlmPort`].
//!
//! Transient failures (network errors, rate limits, server errors, garbled
//! responses) are retried with exponential backoff and jitter. Client errors
//! such as a bad API key fail on the first attempt.

use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse, ToolDefinition};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one; zero disables retrying
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Upper bound on a single backoff
    pub max_delay_ms: u64,
    /// Fraction of the delay added or removed at random (0.0 - 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            jitter_factor: 0.2,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(32);
        let capped = self
            .base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_delay_ms);

        let spread = (capped as f64 * self.jitter_factor.clamp(0.0, 1.0)) as u64;
        let millis = if spread == 0 {
            capped
        } else {
            let low = capped.saturating_sub(spread);
            rand::thread_rng().gen_range(low..=capped.saturating_add(spread))
        };
        Duration::from_millis(millis)
    }
}

/// Whether a failed call is worth repeating.
fn is_transient(error: &LlmError) -> bool {
    match error {
        LlmError::RequestFailed(message) => match leading_status(message) {
            Some(408) | Some(429) => true,
            Some(status) => !(400..500).contains(&status),
            None => true,
        },
        LlmError::InvalidResponse(_) => true,
    }
}

/// HTTP status at the start of an error message, as the clients format them.
fn leading_status(message: &str) -> Option<u16> {
    let digits: String = message.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 3 {
        digits.parse().ok()
    } else {
        None
    }
}

pub struct ResilientLlmClient {
    inner: Arc<dyn LlmPort>,
    config: RetryConfig,
}

impl ResilientLlmClient {
    pub fn new(inner: Arc<dyn LlmPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    async fn with_retry<F, Fut>(&self, operation: &'static str, call: F) -> Result<LlmResponse, LlmError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<LlmResponse, LlmError>>,
    {
        let mut retry = 0;
        loop {
            let error = match call().await {
                Ok(response) => {
                    if retry > 0 {
                        tracing::info!(operation, retries = retry, "LLM request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => e,
            };

            if !is_transient(&error) {
                tracing::error!(operation, error = %error, "LLM request failed with non-retryable error");
                return Err(error);
            }
            if retry >= self.config.max_retries {
                tracing::error!(
                    operation,
                    attempts = retry + 1,
                    error = %error,
                    "LLM request failed after all retry attempts"
                );
                return Err(error);
            }

            retry += 1;
            let delay = self.config.delay_for(retry);
            tracing::warn!(
                operation,
                retry,
                max_retries = self.config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "LLM request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl LlmPort for ResilientLlmClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.with_retry("generate", || self.inner.generate(request.clone()))
            .await
    }

    async fn generate_with_tools(
        &self,
        request: LlmRequest,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmResponse, LlmError> {
        self.with_retry("generate_with_tools", || {
            self.inner.generate_with_tools(request.clone(), tools.clone())
        })
        .await
    }
}
