use thiserror::Error;

/// Why a text-generation backend produced nothing usable.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned an empty response")]
    EmptyResponse,
}
