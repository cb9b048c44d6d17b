use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use error::NetworkError;

pub type FetchResult = Result<http::Response<Bytes>, NetworkError>;

/// One HTTP exchange as handed to the transport implementation.
pub struct FetchRequest<'a> {
    pub url: &'a url::Url,
    pub headers: http::HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
}

#[async_trait::async_trait]
pub trait FetcherInner: Send + Sync {
    async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult;
}

/// Cloneable handle over the transport implementation. The timeout is
/// enforced here so implementations don't have to.
#[derive(Clone)]
pub struct Fetcher {
    inner: Arc<dyn FetcherInner>,
}

impl Fetcher {
    pub fn new(fetcher: impl FetcherInner + 'static) -> Fetcher {
        Fetcher {
            inner: Arc::new(fetcher),
        }
    }

    pub async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult {
        let timeout = request.timeout;

        let deadline = async {
            tokio::time::sleep(timeout).await;
            Err(NetworkError::Timeout(timeout))
        };

        let execution = self.inner.fetch(request);

        tokio::select! {
            result = deadline => { result }
            result = execution => { result }
        }
    }
}

impl std::ops::Deref for Fetcher {
    type Target = dyn FetcherInner;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}
