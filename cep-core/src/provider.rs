use crate::{DirectoryRecord, TemperatureResponse, UpstreamError, WeatherReading};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use url::Url;

pub mod resolver;
pub mod viacep;
pub mod weatherapi;

pub use resolver::ResolverClient;
pub use viacep::ViaCepProvider;
pub use weatherapi::WeatherApiProvider;

/// Maps a postal code to the locality it belongs to.
#[async_trait]
pub trait DirectoryProvider: Send + Sync + Debug {
    async fn lookup(&self, cep: &str) -> Result<DirectoryRecord, UpstreamError>;
}

/// Current conditions for a named locality.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// `city` is the locality as the directory returned it, accents included.
    async fn current(&self, city: &str) -> Result<WeatherReading, UpstreamError>;
}

/// Full postal-code to temperature lookup, as the gateway sees it.
///
/// `Ok(None)` means the lookup succeeded but carried no result.
#[async_trait]
pub trait TemperatureSource: Send + Sync + Debug {
    async fn temperature(&self, cep: &str) -> Result<Option<TemperatureResponse>, UpstreamError>;
}

/// Build the shared HTTP client; no timeout unless one is configured.
pub fn http_client(timeout: Option<Duration>) -> Result<Client, UpstreamError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Parse an upstream base URL. Only http(s) bases are accepted.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, UpstreamError> {
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UpstreamError::UnsupportedScheme(url.scheme().to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`; each segment is escaped on its own.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
