use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to a service further down the chain.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Display text is part of the wire contract between the two services.
    #[error("can not find zipcode")]
    ZipcodeNotFound,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported upstream url scheme '{0}': expected http or https")]
    UnsupportedScheme(String),
}

impl UpstreamError {
    /// Status error for a third-party API; long bodies are cut to 200 bytes.
    pub(crate) fn status(status: StatusCode, body: &str) -> Self {
        Self::Status { status, body: truncate_body(body) }
    }

    /// Status error relayed from our own resolver, whose body is already bounded.
    pub(crate) fn relayed(status: StatusCode, body: String) -> Self {
        Self::Status { status, body }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
