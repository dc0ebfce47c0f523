//! Back-end service: postal code to locality to current temperature.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use cep_core::{
    Config, DirectoryProvider, TemperatureResponse, ViaCepProvider, WeatherApiProvider,
    WeatherProvider, http_client,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;

#[derive(Clone)]
pub struct ResolverState {
    directory: Arc<dyn DirectoryProvider>,
    weather: Arc<dyn WeatherProvider>,
}

/// First `cep` pair wins; a missing parameter is an empty code.
///
/// The code is taken as given; the gateway has already validated it.
fn cep_param(pairs: Vec<(String, String)>) -> String {
    pairs.into_iter().find(|(key, _)| key == "cep").map(|(_, value)| value).unwrap_or_default()
}

/// `GET /?cep=...`. Every other path is a bare 404.
pub fn router(directory: Arc<dyn DirectoryProvider>, weather: Arc<dyn WeatherProvider>) -> Router {
    Router::new()
        .route("/", get(lookup))
        .with_state(ResolverState { directory, weather })
        .layer(TraceLayer::new_for_http())
}

/// Build the resolver against the directory and weather APIs named in `config`.
pub fn from_config(config: &Config) -> anyhow::Result<Router> {
    let api_key = config.weather_api_key()?.to_string();
    let http = http_client(config.request_timeout()).context("Failed to build HTTP client")?;

    let directory = ViaCepProvider::new(&config.resolver.directory_url, http.clone())
        .with_context(|| format!("Invalid directory_url: {}", config.resolver.directory_url))?;
    let weather = WeatherApiProvider::new(&config.resolver.weather_url, api_key, http)
        .with_context(|| format!("Invalid weather_url: {}", config.resolver.weather_url))?;

    Ok(router(Arc::new(directory), Arc::new(weather)))
}

async fn lookup(
    State(state): State<ResolverState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TemperatureResponse>, ApiError> {
    let cep = cep_param(pairs);

    let record = state.directory.lookup(&cep).await.map_err(|err| {
        warn!(cep = %cep, error = %err, "directory lookup failed");
        ApiError::CepLookup(err)
    })?;

    if !record.found {
        info!(cep = %cep, "postal code not found");
        return Err(ApiError::ZipcodeNotFound);
    }

    let reading = state.weather.current(&record.locality).await.map_err(|err| {
        warn!(city = %record.locality, error = %err, "weather lookup failed");
        ApiError::TemperatureLookup(err)
    })?;

    Ok(Json(TemperatureResponse::from_celsius(record.locality, reading.temp_celsius)))
}
