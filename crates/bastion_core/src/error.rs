//! Core error types for BASTION.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Bytes could not be decoded in the requested form
    #[error("invalid encoding: {reason}")]
    InvalidEncoding {
        /// Decoder message
        reason: String,
    },

    /// Value could not be encoded
    #[error("encoding failed: {reason}")]
    Encoding {
        /// Encoder message
        reason: String,
    },

    /// Identifier has the wrong length or format
    #[error("invalid {kind}: {reason}")]
    InvalidId {
        /// Identifier kind (container, object, user)
        kind: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Public key has the wrong length or format
    #[error("invalid public key: {reason}")]
    InvalidKey {
        /// What is wrong with it
        reason: String,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidEncoding {
            reason: err.to_string(),
        }
    }
}

impl From<postcard::Error> for CoreError {
    fn from(err: postcard::Error) -> Self {
        Self::InvalidEncoding {
            reason: err.to_string(),
        }
    }
}
