//! Front-facing service: validates the postal code and relays the lookup to the resolver.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    routing::post,
};
use cep_core::{
    Config, LookupRequest, ResolverClient, TemperatureResponse, TemperatureSource, http_client,
    validate_cep,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;

#[derive(Clone)]
pub struct GatewayState {
    source: Arc<dyn TemperatureSource>,
}

/// `POST /` with `{"cep": "..."}`. Every other path is a bare 404.
pub fn router(source: Arc<dyn TemperatureSource>) -> Router {
    Router::new()
        .route("/", post(lookup))
        .with_state(GatewayState { source })
        .layer(TraceLayer::new_for_http())
}

/// Build the gateway against the resolver named in `config`.
pub fn from_config(config: &Config) -> anyhow::Result<Router> {
    let http = http_client(config.request_timeout()).context("Failed to build HTTP client")?;
    let resolver = ResolverClient::new(&config.gateway.resolver_url, http)
        .with_context(|| format!("Invalid resolver_url: {}", config.gateway.resolver_url))?;

    Ok(router(Arc::new(resolver)))
}

async fn lookup(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TemperatureResponse>, ApiError> {
    let body = body.map_err(|err| {
        warn!(error = %err, "failed to read request body");
        ApiError::BodyUnreadable
    })?;

    let request: LookupRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::MalformedBody)?;
    let cep = validate_cep(request.cep.as_deref())?;

    match state.source.temperature(cep).await {
        Ok(Some(resp)) => {
            info!(cep, city = %resp.city, temp_c = resp.temp_c, "lookup succeeded");
            Ok(Json(resp))
        }
        Ok(None) => Err(ApiError::TemperatureNotFound),
        Err(err) => {
            warn!(cep, error = %err, "resolver lookup failed");
            Err(ApiError::cep_lookup(err))
        }
    }
}
