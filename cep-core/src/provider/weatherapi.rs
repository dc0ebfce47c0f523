use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{UpstreamError, WeatherReading, normalize::normalize_city};

use super::{WeatherProvider, endpoint, parse_base_url};

/// WeatherAPI.com current conditions (`GET /v1/current.json`).
#[derive(Clone)]
pub struct WeatherApiProvider {
    base_url: Url,
    api_key: String,
    http: Client,
}

impl std::fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl WeatherApiProvider {
    pub fn new(base_url: &str, api_key: String, http: Client) -> Result<Self, UpstreamError> {
        Ok(Self { base_url: parse_base_url(base_url)?, api_key, http })
    }

    /// The city is folded and escaped here so it is not encoded twice by the client.
    fn current_url(&self, city: &str) -> Url {
        let key: String = url::form_urlencoded::byte_serialize(self.api_key.as_bytes()).collect();

        let mut url = endpoint(&self.base_url, &["v1", "current.json"]);
        url.set_query(Some(&format!("key={key}&aqi=no&q={}", normalize_city(city))));
        url
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, city: &str) -> Result<WeatherReading, UpstreamError> {
        let url = self.current_url(city);
        debug!(city, query = url.query().unwrap_or_default(), "querying weather provider");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::status(status, &body));
        }

        let parsed: WaResponse = serde_json::from_str(&body)?;

        Ok(WeatherReading { temp_celsius: parsed.current.temp_c })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> WeatherApiProvider {
        WeatherApiProvider::new(&server.uri(), "KEY".into(), Client::new()).expect("valid base url")
    }

    #[test]
    fn url_carries_folded_city_and_key() {
        let p = WeatherApiProvider::new("http://api.weatherapi.com", "a b".into(), Client::new())
            .expect("valid base url");

        let url = p.current_url("São Paulo");
        assert_eq!(
            url.as_str(),
            "http://api.weatherapi.com/v1/current.json?key=a+b&aqi=no&q=Sao+Paulo"
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let p = WeatherApiProvider::new("http://api.weatherapi.com", "SECRET".into(), Client::new())
            .expect("valid base url");
        assert!(!format!("{p:?}").contains("SECRET"));
    }

    #[tokio::test]
    async fn reads_current_temperature() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("key", "KEY"))
            .and(query_param("aqi", "no"))
            .and(query_param("q", "Sao Paulo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": { "name": "Sao Paulo", "country": "Brazil" },
                "current": { "temp_c": 25.0, "temp_f": 77.0, "humidity": 60 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reading = provider(&server).current("São Paulo").await.expect("weather");
        assert_eq!(reading, WeatherReading { temp_celsius: 25.0 });
    }

    #[tokio::test]
    async fn unknown_location_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .mount(&server)
            .await;

        let err = provider(&server).current("Nowhere").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("No matching location found."));
    }

    #[tokio::test]
    async fn missing_current_block_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "location": {} })))
            .mount(&server)
            .await;

        let err = provider(&server).current("Curitiba").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }
}
