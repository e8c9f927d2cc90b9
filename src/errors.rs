use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirdropError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid amount for {address}: {value}")]
    InvalidAmount { address: String, value: String },

    #[error("Arithmetic overflow while {0}")]
    Overflow(&'static str),

    #[error("Page {page} failed after {attempts} attempts: {last_error}")]
    PageFailed {
        page: u32,
        attempts: u32,
        last_error: String,
    },

    #[error("Cannot draw {requested} addresses from a pool of {available}")]
    InsufficientPool { requested: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T, E = AirdropError> = std::result::Result<T, E>;
