//! HTTP client for the 0x swap API

use super::query::ZeroExRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.0x.org";

/// Source of 0x price and quote responses
#[async_trait]
pub trait SwapApi: Send + Sync {
    async fn fetch(&self, request: &ZeroExRequest) -> Result<Value>;
}

/// [`SwapApi`] over HTTPS, authenticated with an API key
#[derive(Debug, Clone)]
pub struct ZeroExClient {
    client: Client,
    base_url: Url,
}

impl ZeroExClient {
    /// `base_url` may carry a path prefix; endpoint paths are joined below it
    pub fn with_base_url(api_key: &SecretString, base_url: &str) -> Result<Self> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|_| Error::Config("0x API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("0x-api-key", key);
        headers.insert("0x-version", HeaderValue::from_static("v2"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid 0x base URL {}: {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &ZeroExRequest) -> Result<Url> {
        self.base_url
            .join(request.endpoint.path())
            .map_err(|e| Error::Config(format!("Invalid 0x endpoint URL: {}", e)))
    }
}

#[async_trait]
impl SwapApi for ZeroExClient {
    async fn fetch(&self, request: &ZeroExRequest) -> Result<Value> {
        let url = self.url_for(request)?;
        tracing::debug!(endpoint = %request.endpoint, query = ?request.params, "Requesting 0x");

        let response = self
            .client
            .get(url.clone())
            .query(&request.params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {}>", e));
            return Err(Error::UpstreamHttp {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
