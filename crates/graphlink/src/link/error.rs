use crate::{
    link::{Link, Next},
    GraphqlError, NetworkError, Operation, Outcome,
};

/// Mutable view of one terminal outcome, handed to the [`ErrorLink`]
/// callback. The callback may rewrite the outcome (including clearing
/// the protocol error list so nothing reaches assembly) or request a
/// retry, which discards the observed outcome entirely.
pub struct ErrorContext<'a> {
    operation: &'a mut Operation,
    outcome: &'a mut Outcome,
    retry: bool,
}

impl<'a> ErrorContext<'a> {
    fn new(operation: &'a mut Operation, outcome: &'a mut Outcome) -> Self {
        ErrorContext {
            operation,
            outcome,
            retry: false,
        }
    }

    pub fn operation(&self) -> &Operation {
        self.operation
    }

    /// The operation a retry would re-issue. Rewriting it here (fresh
    /// credentials, different headers) affects the next attempt only.
    pub fn operation_mut(&mut self) -> &mut Operation {
        self.operation
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.outcome.data()
    }

    pub fn graphql_errors(&self) -> &[GraphqlError] {
        self.outcome.graphql_errors()
    }

    pub fn network_error(&self) -> Option<&NetworkError> {
        self.outcome.network_error()
    }

    pub fn outcome_mut(&mut self) -> &mut Outcome {
        self.outcome
    }

    /// Drops every protocol-level error from the outcome. Data, if any,
    /// survives untouched.
    pub fn suppress_graphql_errors(&mut self) {
        if let Outcome::Response { errors, .. } = self.outcome {
            errors.clear();
        }
    }

    /// Discard this outcome and re-issue the operation downstream once
    /// the callback returns. Each request produces a fresh attempt; the
    /// observed outcome never propagates.
    pub fn request_retry(&mut self) {
        self.retry = true;
    }
}

/// A link exposing every terminal outcome to a user callback before it
/// continues up the chain.
///
/// The callback runs synchronously on the response path; anything
/// long-running belongs in a dedicated link, not here.
pub struct ErrorLink {
    on_outcome: Box<dyn Fn(&mut ErrorContext<'_>) + Send + Sync>,
}

impl ErrorLink {
    pub fn new(on_outcome: impl Fn(&mut ErrorContext<'_>) + Send + Sync + 'static) -> Self {
        ErrorLink {
            on_outcome: Box::new(on_outcome),
        }
    }
}

#[async_trait::async_trait]
impl Link for ErrorLink {
    async fn handle(&self, mut operation: Operation, next: Next) -> Outcome {
        let mut attempt: u32 = 0;
        loop {
            let mut outcome = next.forward(operation.clone()).await;

            let retry = {
                let mut context = ErrorContext::new(&mut operation, &mut outcome);
                (self.on_outcome)(&mut context);
                context.retry
            };

            if retry {
                attempt += 1;
                tracing::debug!(
                    operation = operation.name().unwrap_or_default(),
                    attempt,
                    "callback discarded outcome, re-issuing operation"
                );
                continue;
            }

            return outcome;
        }
    }
}
