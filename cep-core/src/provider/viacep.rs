use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::debug;
use url::Url;

use crate::{DirectoryRecord, UpstreamError};

use super::{DirectoryProvider, endpoint, parse_base_url};

/// ViaCEP postal-code directory (`GET /ws/{cep}/json/`).
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    base_url: Url,
    http: Client,
}

impl ViaCepProvider {
    pub fn new(base_url: &str, http: Client) -> Result<Self, UpstreamError> {
        Ok(Self { base_url: parse_base_url(base_url)?, http })
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "flag")]
    erro: bool,
}

/// ViaCEP has sent `"erro": true` and `"erro": "true"` across versions; `null` is false.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

#[async_trait]
impl DirectoryProvider for ViaCepProvider {
    async fn lookup(&self, cep: &str) -> Result<DirectoryRecord, UpstreamError> {
        let url = endpoint(&self.base_url, &["ws", cep, "json", ""]);
        debug!(%url, "querying postal directory");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::status(status, &body));
        }

        let parsed: ViaCepResponse = serde_json::from_str(&body)?;

        Ok(DirectoryRecord { locality: parsed.localidade, found: !parsed.erro })
    }
}
