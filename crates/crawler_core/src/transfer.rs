use thiserror::Error;

use crate::buffer::{BufferError, ResponseBuffer};

pub type TransferId = u64;

/// Why a transfer produced no usable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferFailure {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("redirect limit exceeded")]
    TooManyRedirects,
    #[error("body read failed: {0}")]
    Body(String),
    #[error("could not allocate {requested} bytes for response body")]
    Allocation { requested: usize },
}

impl From<BufferError> for TransferFailure {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::Allocation { requested } => TransferFailure::Allocation { requested },
        }
    }
}

/// A fully received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// URL after following redirects.
    pub effective_url: String,
    pub body: ResponseBuffer,
}

/// A transfer the multiplexer has finished with, successfully or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTransfer {
    pub transfer_id: TransferId,
    /// URL the transfer was submitted for.
    pub url: String,
    pub result: Result<TransferResponse, TransferFailure>,
}
