/// Errors that can occur while talking to PokeAPI.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error (HTTP {status}): {url}")]
    ServerError { status: u16, url: String },

    #[error("API error: {0}")]
    Api(String),
}
