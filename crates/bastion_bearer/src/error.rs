//! Bearer token errors.

use bastion_core::{CoreError, Epoch};
use bastion_eacl::{DecodeError, EvalError};

/// Token-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Bytes are not a valid encoding
    #[error(transparent)]
    Encoding(#[from] CoreError),
    /// Token has no body
    #[error("missing token body")]
    MissingBody,
    /// Body has no lifetime
    #[error("missing token lifetime")]
    MissingLifetime,
    /// Token is not signed
    #[error("missing body signature")]
    MissingSignature,
    /// Delegate user identifier is malformed
    #[error("invalid target user: {0}")]
    InvalidUser(#[source] CoreError),
    /// Container identifier is malformed
    #[error("invalid container: {0}")]
    InvalidContainer(#[source] CoreError),
    /// Embedded table is malformed
    #[error("invalid eACL: {0}")]
    InvalidTable(#[source] DecodeError),
    /// Signature does not match the body
    #[error("invalid token signature")]
    InvalidSignature,
    /// Token is outside its validity window
    #[error("token is not valid at epoch {epoch}")]
    InvalidAt {
        /// Epoch checked
        epoch: Epoch,
    },
    /// Token is restricted to another container
    #[error("token is restricted to another container")]
    ContainerMismatch,
    /// Token is issued for another user
    #[error("token is issued for another user")]
    UserMismatch,
    /// Embedded table could not be evaluated
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TokenError::InvalidAt { epoch: Epoch::from(5u64) };
        assert_eq!(err.to_string(), "token is not valid at epoch E5");
        assert_eq!(TokenError::MissingSignature.to_string(), "missing body signature");
    }
}
