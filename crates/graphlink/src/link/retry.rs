use std::time::Duration;

use tower::retry::budget::Budget;

use crate::{
    config::RetryConfig,
    link::{Link, Next},
    Operation, Outcome,
};

/// Retries transport failures under a retry budget: every clean
/// exchange deposits into the budget, every retry withdraws from it, so
/// a struggling endpoint sees a bounded amount of extra traffic.
/// Protocol-level errors are not retried here; they are the
/// interceptor's business.
pub struct RetryLink {
    budget: Budget,
}

impl RetryLink {
    pub fn new(config: &RetryConfig) -> Self {
        RetryLink {
            budget: Budget::new(
                config.ttl.unwrap_or(Duration::from_secs(10)),
                config.min_per_second.unwrap_or(10),
                config.retry_percent.unwrap_or(0.2),
            ),
        }
    }
}

impl Default for RetryLink {
    fn default() -> Self {
        RetryLink::new(&RetryConfig::default())
    }
}

#[async_trait::async_trait]
impl Link for RetryLink {
    async fn handle(&self, operation: Operation, next: Next) -> Outcome {
        let mut result = next.forward(operation.clone()).await;
        let mut counter = 0u32;

        loop {
            match result {
                Outcome::Failure(error) => {
                    if self.budget.withdraw().is_ok() {
                        let jitter = rand::random::<f64>() * 2.0;
                        let exp_backoff = (100 * 2u64.pow(counter)) as f64;
                        let backoff_ms = (exp_backoff * jitter).round() as u64;

                        tracing::debug!(
                            operation = operation.name().unwrap_or_default(),
                            backoff_ms,
                            "retrying after transport failure: {error}"
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;

                        counter += 1;
                        result = next.forward(operation.clone()).await;
                    } else {
                        tracing::debug!(
                            operation = operation.name().unwrap_or_default(),
                            "retry budget exhausted, giving up"
                        );
                        return Outcome::Failure(error);
                    }
                }
                outcome => {
                    self.budget.deposit();
                    return outcome;
                }
            }
        }
    }
}
