use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use crate::{
    link::{Link, Next},
    NetworkError, Operation, Outcome,
};

/// Produces a fresh bearer token. Implementations typically talk to an
/// identity provider; failures surface as transport failures on the
/// operations waiting for the token.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn provide(&self) -> Result<String, NetworkError>;
}

#[derive(Default)]
struct TokenState {
    current: Option<String>,
    // Bumped whenever a refresh takes ownership, so a waiter can tell a
    // cancelled refresh apart from a newer one.
    generation: u64,
    in_flight: Option<broadcast::Sender<Result<String, NetworkError>>>,
}

/// Process-wide token cache shared by every operation flowing through
/// an [`AuthLink`]. Concurrent refreshes coalesce into a single
/// in-flight provider call whose result is broadcast to all waiters.
pub struct TokenStore {
    provider: Arc<dyn TokenProvider>,
    state: Mutex<TokenState>,
}

impl TokenStore {
    pub fn new(provider: impl TokenProvider + 'static) -> Self {
        TokenStore {
            provider: Arc::new(provider),
            state: Mutex::new(TokenState::default()),
        }
    }

    /// The cached token, refreshing first when none is held.
    pub async fn current_or_refresh(&self) -> Result<String, NetworkError> {
        if let Some(token) = self.state.lock().await.current.clone() {
            return Ok(token);
        }
        self.refresh().await
    }

    /// Drops the cached token, forcing the next caller to refresh.
    pub async fn invalidate(&self) {
        self.state.lock().await.current = None;
    }

    pub async fn refresh(&self) -> Result<String, NetworkError> {
        loop {
            let (sender, generation) = {
                let mut state = self.state.lock().await;
                if let Some(sender) = &state.in_flight {
                    tracing::debug!("joining in-flight token refresh");
                    let generation = state.generation;
                    let mut receiver = sender.subscribe();
                    drop(state);
                    match receiver.recv().await {
                        Ok(result) => return result,
                        Err(_) => {
                            // The refresh owner was cancelled mid-flight.
                            // Clear the stale hand-off and start over.
                            let mut state = self.state.lock().await;
                            if state.generation == generation {
                                state.in_flight = None;
                            }
                            continue;
                        }
                    }
                }
                tracing::debug!("starting token refresh");
                let (sender, _) = broadcast::channel(1);
                state.generation += 1;
                state.in_flight = Some(sender.clone());
                (sender, state.generation)
            };

            let result = self.provider.provide().await;

            let mut state = self.state.lock().await;
            if state.generation == generation {
                state.in_flight = None;
            }
            if let Ok(token) = &result {
                state.current = Some(token.clone());
            }
            drop(state);
            let _ = sender.send(result.clone());

            return result;
        }
    }
}

/// Injects a bearer token into every operation and, on an unauthorized
/// answer, refreshes the token once and re-issues the operation. The
/// refresh is shared: concurrent operations hitting the same expiry do
/// not stampede the provider.
pub struct AuthLink {
    tokens: Arc<TokenStore>,
}

impl AuthLink {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        AuthLink { tokens }
    }
}

fn bearer(token: &str) -> Result<http::HeaderValue, NetworkError> {
    http::HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| NetworkError::Request("token is not a valid header value".to_string()))
}

fn is_unauthorized(outcome: &Outcome) -> bool {
    outcome
        .network_error()
        .and_then(NetworkError::status_code)
        .is_some_and(|status| status == http::StatusCode::UNAUTHORIZED)
}

#[async_trait::async_trait]
impl Link for AuthLink {
    async fn handle(&self, mut operation: Operation, next: Next) -> Outcome {
        let token = match self.tokens.current_or_refresh().await {
            Ok(token) => token,
            Err(error) => return Outcome::Failure(error),
        };
        let value = match bearer(&token) {
            Ok(value) => value,
            Err(error) => return Outcome::Failure(error),
        };
        operation.headers_mut().insert(http::header::AUTHORIZATION, value);

        let outcome = next.forward(operation.clone()).await;
        if !is_unauthorized(&outcome) {
            return outcome;
        }

        tracing::debug!(
            operation = operation.name().unwrap_or_default(),
            "unauthorized answer, refreshing token and re-issuing"
        );
        self.tokens.invalidate().await;
        let token = match self.tokens.current_or_refresh().await {
            Ok(token) => token,
            Err(error) => return Outcome::Failure(error),
        };
        let value = match bearer(&token) {
            Ok(value) => value,
            Err(error) => return Outcome::Failure(error),
        };
        operation.headers_mut().insert(http::header::AUTHORIZATION, value);

        next.forward(operation).await
    }
}
