use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body accepted by the gateway. Decoded fresh for every request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub cep: Option<String>,
}

/// A postal code resolved by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub locality: String,
    pub found: bool,
}

/// Current temperature as reported upstream, always in Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temp_celsius: f64,
}

/// The response shape shared by the gateway and the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResponse {
    pub temp_c: f64,
    pub temp_f: f64,
    pub temp_k: f64,
    pub city: String,
}

impl TemperatureResponse {
    /// Kelvin uses a flat 273 offset; existing clients depend on it.
    pub fn from_celsius(city: impl Into<String>, temp_c: f64) -> Self {
        Self { temp_c, temp_f: temp_c * 1.8 + 32.0, temp_k: temp_c + 273.0, city: city.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CepError {
    #[error("cep parameter is required")]
    Missing,
    #[error("invalid zipcode")]
    Invalid,
}

/// Checks that `cep` is present and exactly 8 ASCII digits.
pub fn validate_cep(cep: Option<&str>) -> Result<&str, CepError> {
    let cep = cep.filter(|c| !c.is_empty()).ok_or(CepError::Missing)?;

    if cep.len() == 8 && cep.bytes().all(|b| b.is_ascii_digit()) {
        Ok(cep)
    } else {
        Err(CepError::Invalid)
    }
}
