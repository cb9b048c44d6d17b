use graphlink::{FetchRequest, FetchResult, Fetcher, FetcherInner, NetworkError};

/// Transport over a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct NativeFetcher {
    client: reqwest::Client,
}

impl NativeFetcher {
    pub fn new() -> anyhow::Result<Self> {
        Ok(NativeFetcher {
            // Hyper's pool has no TTL on connections, only an idle
            // timeout, so a short one is the only lever we have to pick
            // up DNS changes on long-lived clients.
            client: reqwest::Client::builder()
                .pool_idle_timeout(Some(std::time::Duration::from_secs(5)))
                .build()?,
        })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        NativeFetcher { client }
    }

    pub fn into_fetcher(self) -> Fetcher {
        Fetcher::new(self)
    }
}

#[async_trait::async_trait]
impl FetcherInner for NativeFetcher {
    async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult {
        let mut req = reqwest::Request::new(reqwest::Method::POST, request.url.clone());
        *req.headers_mut() = request.headers;
        *req.body_mut() = Some(request.body.into());
        *req.timeout_mut() = Some(request.timeout);

        let mut resp = self.client.execute(req).await.map_err(NetworkError::any)?;

        let status = resp.status();
        let version = resp.version();
        let headers = std::mem::take(resp.headers_mut());

        // reqwest transforms the body into a stream; collect it back
        // into the plain response the classifier consumes.
        let bytes = resp.bytes().await.map_err(NetworkError::any)?;

        let mut response = http::Response::new(bytes);
        *response.status_mut() = status;
        *response.version_mut() = version;
        *response.headers_mut() = headers;

        Ok(response)
    }
}
