use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token is malformed")]
    MalformedToken,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    ExpiredToken,

    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}
