//! Error types for the encrypted-keys library

use thiserror::Error;

/// Result type alias for encrypted key operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while encrypting, decrypting or generating keys
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid encrypted record: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid base58 encoding")]
    Base58,

    #[error("Secp256k1 error: {0}")]
    Secp256k1(#[from] secp256k1::Error),

    #[error("EC multiplication factor is not a valid scalar")]
    InvalidFactor,

    #[error("Passphrase does not match the encrypted key")]
    PassphraseMismatch,

    #[error("Lot {lot} or sequence {sequence} out of range")]
    LotSequenceOutOfRange {
        lot: u32,
        sequence: u32,
    },

    #[error("Key derivation failed: {0}")]
    Kdf(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Format errors detected while parsing a checked record.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        expected: usize,
        actual: usize,
    },

    #[error("Invalid magic bytes")]
    InvalidMagic,

    #[error("Invalid context byte {0:#04x}")]
    InvalidContext(u8),

    #[error("Invalid checksum")]
    InvalidChecksum,
}

impl From<scrypt::errors::InvalidParams> for Error {
    fn from(e: scrypt::errors::InvalidParams) -> Self {
        Error::Kdf(format!("invalid scrypt parameters: {}", e))
    }
}

impl From<scrypt::errors::InvalidOutputLen> for Error {
    fn from(e: scrypt::errors::InvalidOutputLen) -> Self {
        Error::Kdf(format!("invalid scrypt output length: {}", e))
    }
}

impl From<secp256k1::scalar::OutOfRangeError> for Error {
    fn from(_: secp256k1::scalar::OutOfRangeError) -> Self {
        Error::InvalidFactor
    }
}
