use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::{TemperatureResponse, UpstreamError};

use super::{TemperatureSource, parse_base_url};

/// HTTP client for the resolver service (`GET /?cep=...`).
#[derive(Debug, Clone)]
pub struct ResolverClient {
    base_url: Url,
    http: Client,
}

impl ResolverClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, UpstreamError> {
        Ok(Self { base_url: parse_base_url(base_url)?, http })
    }
}

#[async_trait]
impl TemperatureSource for ResolverClient {
    async fn temperature(&self, cep: &str) -> Result<Option<TemperatureResponse>, UpstreamError> {
        debug!(cep, resolver = %self.base_url, "forwarding lookup to resolver");

        let res = self.http.get(self.base_url.clone()).query(&[("cep", cep)]).send().await?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::ZipcodeNotFound);
        }

        let body = res.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::relayed(status, body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
