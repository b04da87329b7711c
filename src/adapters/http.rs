use crate::domain::model::{FetchedImage, ImageRequest, StatusPolicy};
use crate::domain::ports::ImageSource;
use crate::utils::error::{CardError, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

/// Fetches images over HTTP. One GET per request, no retries.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
    timeout: Duration,
    status_policy: StatusPolicy,
}

impl HttpImageSource {
    pub fn new(timeout: Duration, status_policy: StatusPolicy) -> Self {
        Self {
            client: Client::new(),
            timeout,
            status_policy,
        }
    }

    async fn get(&self, request: &ImageRequest) -> Result<FetchedImage> {
        let response = self
            .client
            .get(&request.url)
            .header(ACCEPT, request.transfer_mode.accept_header())
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::info!("Received response with status: {}", status);

        if !self.status_policy.accepts(status) {
            return Err(CardError::HttpStatus {
                url: request.url.clone(),
                status,
            });
        }

        let bytes = response.bytes().await?.to_vec();
        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), request.url);

        Ok(FetchedImage { bytes, status })
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, request: &ImageRequest) -> Result<FetchedImage> {
        tracing::debug!("Making API request to: {}", request.url);

        // 超時後 future 被丟棄，請求也隨之取消
        let result = match tokio::time::timeout(self.timeout, self.get(request)).await {
            Ok(result) => result,
            Err(_) => Err(CardError::Timeout {
                url: request.url.clone(),
                after: self.timeout,
            }),
        };

        if let Err(e) = &result {
            tracing::error!("Fetching {} failed: {}", request.url, e);
        }
        result
    }
}
