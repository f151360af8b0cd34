use thiserror::Error;

/// Errors that stop a crawl before it starts. Failures of individual
/// transfers never surface here.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed url {seed}: {reason}")]
    InvalidSeed { seed: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
