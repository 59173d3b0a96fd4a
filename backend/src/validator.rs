use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Checks whether a stored asset URL still resolves.
#[async_trait]
pub trait ResourceValidator: Send + Sync {
    /// `true` only on positive proof of liveness. Never errors.
    async fn is_live(&self, url: &str) -> bool;
}

/// Probes with a single `HEAD` request; no body is downloaded and nothing is
/// retried.
pub struct HttpResourceValidator {
    client: reqwest::Client,
}

impl HttpResourceValidator {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceValidator for HttpResourceValidator {
    async fn is_live(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(url, %status, "probed stored image");
                status.is_success()
            }
            Err(e) => {
                debug!(url, error = %e, "image probe failed");
                false
            }
        }
    }
}
