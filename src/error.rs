//! Error types returned by csrkit.

use thiserror::Error;

/// Represents errors that can occur while building or checking a CSR.
///
/// Validation errors carry a message that is meant to be shown to the user
/// verbatim; the other variants carry the underlying provider message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CsrError {
    /// A required subject field is missing or unusable.
    #[error("{0}")]
    ValidationError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while producing a signature.
    #[error("Signing error: {0}")]
    SigningError(String),

    /// A signature did not verify against its embedded public key.
    #[error("Signature verification failed: {0}")]
    SignatureVerificationError(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),
}

impl CsrError {
    /// Returns true for errors caused by bad caller input rather than a
    /// provider failure or an internal defect.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CsrError::ValidationError(_) | CsrError::InvalidInput(_))
    }
}

impl From<der::Error> for CsrError {
    /// Converts a `der::Error` into a `CsrError`.
    fn from(err: der::Error) -> Self {
        CsrError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CsrError {
    fn from(err: rsa::Error) -> Self {
        CsrError::RsaError(err.to_string())
    }
}

impl From<pkcs8::Error> for CsrError {
    fn from(err: pkcs8::Error) -> Self {
        CsrError::EncodingError(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for CsrError {
    fn from(err: pkcs8::spki::Error) -> Self {
        CsrError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for CsrError {
    fn from(err: pem::PemError) -> Self {
        CsrError::DecodingError(err.to_string())
    }
}

impl From<regex::Error> for CsrError {
    fn from(err: regex::Error) -> Self {
        CsrError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for CsrError {
    fn from(err: serde_json::Error) -> Self {
        CsrError::EncodingError(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CsrError>;
