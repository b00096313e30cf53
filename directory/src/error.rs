use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Record source returned status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Malformed record payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Duplicate record id {0} in ingested batch")]
    DuplicateId(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Record source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
