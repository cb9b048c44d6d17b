use std::{sync::Arc, time::Duration};

use tokio::sync::oneshot;

use crate::{
    assemble,
    fetch::Fetcher,
    link::{Chain, Link, RetryLink, TransportLink},
    ClientConfig, CombinedError, ErrorPolicy, FinalResponse, Operation,
};

/// The chain head handed to callers: dispatches operations and applies
/// the effective error policy to whatever the chain delivers.
#[derive(Clone)]
pub struct Client {
    chain: Chain,
    default_policy: ErrorPolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("a client needs an endpoint url")]
    MissingEndpoint,
    #[error("a client needs a fetcher implementation")]
    MissingFetcher,
    #[error("invalid header in configuration: {0}")]
    InvalidHeader(String),
}

pub struct ClientBuilder {
    endpoint: Option<url::Url>,
    fetcher: Option<Fetcher>,
    links: Vec<Arc<dyn Link>>,
    default_policy: ErrorPolicy,
    default_headers: http::HeaderMap,
    timeout: Duration,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder {
            endpoint: None,
            fetcher: None,
            links: Vec::new(),
            default_policy: ErrorPolicy::default(),
            default_headers: http::HeaderMap::new(),
            timeout: Duration::from_secs(30),
        }
    }

    fn effective_policy(&self, operation: &Operation) -> ErrorPolicy {
        operation.error_policy().unwrap_or(self.default_policy)
    }

    /// Runs one operation through the chain and assembles the result
    /// inline.
    pub async fn execute(&self, operation: Operation) -> Result<FinalResponse, CombinedError> {
        let policy = self.effective_policy(&operation);
        tracing::debug!(
            operation = operation.name().unwrap_or_default(),
            %policy,
            "executing operation"
        );
        let outcome = self.chain.run(operation).await;
        assemble(outcome, policy)
    }

    /// Dispatches one operation as its own cancellable attempt. The
    /// terminal value arrives on the subscription exactly once;
    /// unsubscribing first guarantees it never arrives at all.
    pub fn subscribe(&self, operation: Operation) -> Subscription {
        let policy = self.effective_policy(&operation);
        let chain = self.chain.clone();
        let (sender, receiver) = oneshot::channel();
        let task = tokio::spawn(async move {
            let outcome = chain.run(operation).await;
            let _ = sender.send(assemble(outcome, policy));
        });
        Subscription { receiver, task }
    }
}

impl ClientBuilder {
    #[must_use]
    pub fn endpoint(mut self, url: url::Url) -> Self {
        self.endpoint = Some(url);
        self
    }

    #[must_use]
    pub fn fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Appends a link. Links run in insertion order on the request
    /// phase; the transport link is appended last by `build`.
    #[must_use]
    pub fn link(mut self, link: impl Link + 'static) -> Self {
        self.links.push(Arc::new(link));
        self
    }

    #[must_use]
    pub fn default_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Default timeout for operations that don't carry their own.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A header attached to every exchange; per-operation headers win
    /// on conflict.
    #[must_use]
    pub fn header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Applies a deserialized [`ClientConfig`]: endpoint, timeout,
    /// default policy, static headers, and a retry link when enabled.
    pub fn with_config(mut self, config: &ClientConfig) -> Result<Self, BuildError> {
        if let Some(endpoint) = &config.endpoint {
            self.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = config.timeout {
            self.timeout = timeout;
        }
        self.default_policy = config.error_policy;
        for (name, value) in &config.headers {
            let name: http::HeaderName = name
                .parse()
                .map_err(|_| BuildError::InvalidHeader(name.clone()))?;
            let value: http::HeaderValue = value
                .parse()
                .map_err(|_| BuildError::InvalidHeader(name.to_string()))?;
            self.default_headers.insert(name, value);
        }
        if config.retry.enabled {
            self = self.link(RetryLink::new(&config.retry));
        }
        Ok(self)
    }

    pub fn build(self) -> Result<Client, BuildError> {
        let endpoint = self.endpoint.ok_or(BuildError::MissingEndpoint)?;
        let fetcher = self.fetcher.ok_or(BuildError::MissingFetcher)?;

        let mut chain = Chain::builder();
        for link in self.links {
            chain = chain.link_arc(link);
        }
        let transport = TransportLink::new(fetcher, endpoint, self.timeout)
            .with_default_headers(self.default_headers);
        let chain = chain.terminal(transport).build();

        Ok(Client {
            chain,
            default_policy: self.default_policy,
        })
    }
}

/// One in-flight attempt. Dropping the subscription without
/// unsubscribing lets the attempt run to completion in the background;
/// [`Subscription::unsubscribe`] aborts it immediately, before any
/// outcome reaches assembly.
pub struct Subscription {
    receiver: oneshot::Receiver<Result<FinalResponse, CombinedError>>,
    task: tokio::task::JoinHandle<()>,
}

impl Subscription {
    /// Cancels the attempt. No terminal value is delivered afterwards.
    pub fn unsubscribe(self) {
        self.task.abort();
    }

    /// Waits for the terminal value. `None` means the attempt was
    /// cancelled before it could deliver one.
    pub async fn result(self) -> Option<Result<FinalResponse, CombinedError>> {
        self.receiver.await.ok()
    }
}
