use thiserror::Error;

use sealpost_crypto::CryptoError;
use sealpost_types::api::WireError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay rejected request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("no session established with {0}")]
    NoSession(String),

    #[error("invalid relay url: {0}")]
    InvalidUrl(String),
}
