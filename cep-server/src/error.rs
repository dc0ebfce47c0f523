use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cep_core::{CepError, UpstreamError};
use thiserror::Error;

/// Errors surfaced to HTTP callers as a status code and a plain-text body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("error reading request body")]
    BodyUnreadable,

    #[error("error unmarshalling request body")]
    MalformedBody,

    #[error(transparent)]
    Cep(#[from] CepError),

    #[error("can not find zipcode")]
    ZipcodeNotFound,

    #[error("can not find temperature")]
    TemperatureNotFound,

    #[error("error while searching for cep: {0}")]
    CepLookup(UpstreamError),

    #[error("error while searching for temperature: {0}")]
    TemperatureLookup(UpstreamError),
}

impl ApiError {
    /// A resolver-side "not found" stays a 404; anything else is a lookup failure.
    pub fn cep_lookup(err: UpstreamError) -> Self {
        match err {
            UpstreamError::ZipcodeNotFound => Self::ZipcodeNotFound,
            other => Self::CepLookup(other),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody | Self::Cep(CepError::Missing) => StatusCode::BAD_REQUEST,
            Self::Cep(CepError::Invalid) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ZipcodeNotFound | Self::TemperatureNotFound => StatusCode::NOT_FOUND,
            Self::BodyUnreadable | Self::CepLookup(_) | Self::TemperatureLookup(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
