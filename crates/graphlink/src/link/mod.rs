//! The request/response interception chain.
//!
//! A chain is an ordered sequence of [`Link`]s ending in a terminal
//! link that performs the actual transport exchange. Request-phase
//! logic runs first-to-last; response-phase logic unwinds last-to-first
//! because every link wraps the whole downstream tail. A link may
//! short-circuit (answer without forwarding), observe and rewrite the
//! outcome flowing back up, or forward more than once: each call to
//! [`Next::forward`] is an independent attempt.

mod auth;
mod cache;
mod error;
mod retry;
mod transport;

use std::sync::Arc;

use crate::{NetworkError, Operation, Outcome};

pub use auth::{AuthLink, TokenProvider, TokenStore};
pub use cache::CacheLink;
pub use error::{ErrorContext, ErrorLink};
pub use retry::RetryLink;
pub use transport::TransportLink;

#[async_trait::async_trait]
pub trait Link: Send + Sync {
    async fn handle(&self, operation: Operation, next: Next) -> Outcome;
}

/// A bound reference to the rest of the chain. Cloneable and
/// re-invokable: retrying links call [`Next::forward`] again and get a
/// fresh attempt through everything downstream.
#[derive(Clone)]
pub struct Next {
    links: Arc<[Arc<dyn Link>]>,
    index: usize,
}

impl Next {
    pub async fn forward(&self, operation: Operation) -> Outcome {
        match self.links.get(self.index) {
            Some(link) => {
                let next = Next {
                    links: self.links.clone(),
                    index: self.index + 1,
                };
                link.handle(operation, next).await
            }
            // Running past the tail means the chain was built without a
            // terminal link. Surfaced as a failure outcome, not a panic.
            None => Outcome::Failure(NetworkError::Request(
                "link chain ended without a terminal link".to_string(),
            )),
        }
    }
}

/// The assembled chain. Cheap to clone; shared by all in-flight
/// operations of a client.
#[derive(Clone)]
pub struct Chain {
    links: Arc<[Arc<dyn Link>]>,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder { links: Vec::new() }
    }

    pub async fn run(&self, operation: Operation) -> Outcome {
        let head = Next {
            links: self.links.clone(),
            index: 0,
        };
        head.forward(operation).await
    }
}

#[derive(Default)]
pub struct ChainBuilder {
    links: Vec<Arc<dyn Link>>,
}

impl ChainBuilder {
    #[must_use]
    pub fn link(self, link: impl Link + 'static) -> Self {
        self.link_arc(Arc::new(link))
    }

    #[must_use]
    pub fn link_arc(mut self, link: Arc<dyn Link>) -> Self {
        self.links.push(link);
        self
    }

    /// The tail of the chain. Only by convention: any link that answers
    /// without forwarding terminates an attempt.
    #[must_use]
    pub fn terminal(self, link: impl Link + 'static) -> Self {
        self.link(link)
    }

    pub fn build(self) -> Chain {
        Chain {
            links: self.links.into(),
        }
    }
}
