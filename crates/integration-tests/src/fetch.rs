//! In-process fetchers for tests that need full control over the
//! transport without a server.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use bytes::Bytes;
use graphlink::{FetchRequest, FetchResult, FetcherInner, NetworkError};

type ScriptEntry = Result<(u16, &'static str), NetworkError>;

/// Answers from a fixed script of exchanges, counting attempts along
/// the way. An exhausted script is a transport failure.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<ScriptEntry>>,
    attempts: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    pub fn new(script: impl IntoIterator<Item = ScriptEntry>) -> Self {
        ScriptedFetcher {
            script: Mutex::new(script.into_iter().collect()),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        self.attempts.clone()
    }
}

#[async_trait::async_trait]
impl FetcherInner for ScriptedFetcher {
    async fn fetch(&self, _request: FetchRequest<'_>) -> FetchResult {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok((status, body))) => {
                let mut response = http::Response::new(Bytes::from_static(body.as_bytes()));
                *response.status_mut() = http::StatusCode::from_u16(status).unwrap();
                Ok(response)
            }
            Some(Err(error)) => Err(error),
            None => Err(NetworkError::any("fetch script exhausted")),
        }
    }
}

/// Answers with a fixed body after a fixed delay, for tests racing
/// cancellation against the transport.
pub struct DelayedFetcher {
    delay: std::time::Duration,
    body: &'static str,
    attempts: Arc<AtomicUsize>,
}

impl DelayedFetcher {
    pub fn new(delay: std::time::Duration, body: &'static str) -> Self {
        DelayedFetcher {
            delay,
            body,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        self.attempts.clone()
    }
}

#[async_trait::async_trait]
impl FetcherInner for DelayedFetcher {
    async fn fetch(&self, _request: FetchRequest<'_>) -> FetchResult {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(http::Response::new(Bytes::from_static(self.body.as_bytes())))
    }
}

/// Never answers. Exchanges hang until the attempt is cancelled.
pub struct PendingFetcher {
    attempts: Arc<AtomicUsize>,
}

impl PendingFetcher {
    pub fn new() -> Self {
        PendingFetcher {
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        self.attempts.clone()
    }
}

impl Default for PendingFetcher {
    fn default() -> Self {
        PendingFetcher::new()
    }
}

#[async_trait::async_trait]
impl FetcherInner for PendingFetcher {
    async fn fetch(&self, _request: FetchRequest<'_>) -> FetchResult {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<FetchResult>().await
    }
}
