//! Error types for the DeFi agent plugins

use crate::wallet::WalletError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Caller input rejected before any external call was made.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Chain ID {0} not supported")]
    UnsupportedChain(u64),

    /// Non-success status from the 0x API. The body is kept verbatim.
    #[error("0x API request to {url} failed with status {status}: {body}")]
    UpstreamHttp {
        url: String,
        status: u16,
        body: String,
    },

    /// A wallet or contract call failed part way through an operation.
    #[error("Failed to {operation}: {source}")]
    ChainCall {
        operation: String,
        #[source]
        source: WalletError,
    },

    #[error("No account connected")]
    MissingAccount,

    #[error("Failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn chain_call(operation: impl Into<String>, source: WalletError) -> Self {
        Error::ChainCall {
            operation: operation.into(),
            source,
        }
    }

    pub fn decode(what: &'static str, reason: impl Into<String>) -> Self {
        Error::Decode {
            what,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
