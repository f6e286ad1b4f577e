//! Error types for the ledgerfs virtual filesystem.

use thiserror::Error;

/// Path-resolution and operation errors.
///
/// These are local and recoverable: callers may retry with a corrected path.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("file or directory already exists: {0}")]
    AlreadyExists(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("is a directory: {0}")]
    IsADirectory(String),

    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("cannot remove root directory")]
    RootRemovalForbidden,

    #[error("event log error: {0}")]
    Log(#[from] LogError),
}

/// Event log encode/decode and transport errors.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("unknown event type: {0}")]
    UnknownEventType(u8),

    #[error("event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid event timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Errors from decrypting transport credentials.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid hex ciphertext: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("ciphertext too short: {0} bytes")]
    CiphertextTooShort(usize),

    #[error("decryption failed")]
    DecryptFailed,

    #[error("plaintext is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl From<redis::RedisError> for LogError {
    fn from(err: redis::RedisError) -> Self {
        LogError::Transport(err.to_string())
    }
}
