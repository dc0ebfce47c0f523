//! Core library for the CEP weather relay.
//!
//! This crate defines:
//! - Configuration handling
//! - Postal-code validation and city-name normalization
//! - Abstractions over the directory, weather and resolver upstreams
//! - Shared domain models (requests, responses)
//!
//! It is used by `cep-server`, which hosts both the gateway and the resolver.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;

pub use config::{Config, GatewayConfig, LogFormat, ResolverConfig};
pub use error::UpstreamError;
pub use model::{
    CepError, DirectoryRecord, LookupRequest, TemperatureResponse, WeatherReading, validate_cep,
};
pub use provider::{
    DirectoryProvider, ResolverClient, TemperatureSource, ViaCepProvider, WeatherApiProvider,
    WeatherProvider, http_client,
};
