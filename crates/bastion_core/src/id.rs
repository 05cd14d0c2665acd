//! Identifiers for BASTION entities.
//!
//! All identifiers are 32-byte digests. They render as lowercase hex and
//! travel over the wire as raw bytes.

use crate::error::{CoreError, CoreResult};
use crate::key::PublicKey;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Number of bytes in the identifier
            pub const LEN: usize = 32;

            /// Create from raw bytes
            #[must_use]
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Create from a byte slice
            ///
            /// # Errors
            ///
            /// Returns error if the slice is not exactly 32 bytes
            pub fn from_slice(bytes: &[u8]) -> CoreResult<Self> {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| CoreError::InvalidId {
                    kind: $kind,
                    reason: format!("expected {} bytes, got {}", Self::LEN, bytes.len()),
                })?;
                Ok(Self(arr))
            }

            /// Get as bytes
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Encode to the canonical string form (lowercase hex)
            #[must_use]
            pub fn encode_to_string(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.encode_to_string())
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }
    };
}

define_id!(
    /// Container identifier
    ContainerId,
    "container ID",
    "cnr"
);

define_id!(
    /// Object identifier
    ObjectId,
    "object ID",
    "obj"
);

define_id!(
    /// User identifier - the account accountable for keys and tokens
    UserId,
    "user ID",
    "usr"
);

impl UserId {
    /// Derive the user identity owning a public key.
    ///
    /// The identity is the BLAKE3 digest of the serialized key, so the same
    /// key always resolves to the same user.
    #[must_use]
    pub fn from_public_key(key: &PublicKey) -> Self {
        Self(*blake3::hash(key.as_bytes()).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_slice() {
        let id = ContainerId::from_slice(&[7u8; 32]).unwrap();
        assert_eq!(id.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn test_id_from_slice_wrong_len() {
        let err = ObjectId::from_slice(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidId { kind: "object ID", .. }));
    }

    #[test]
    fn test_id_string_form() {
        let id = ObjectId::from_bytes([0xab; 32]);
        assert_eq!(id.encode_to_string(), "ab".repeat(32));
    }

    #[test]
    fn test_id_display() {
        let id = ContainerId::from_bytes([0u8; 32]);
        assert!(format!("{}", id).starts_with("cnr_"));
    }

    #[test]
    fn test_user_from_public_key() {
        let k1 = PublicKey::from_bytes([1u8; 32]);
        let k2 = PublicKey::from_bytes([2u8; 32]);

        assert_eq!(UserId::from_public_key(&k1), UserId::from_public_key(&k1));
        assert_ne!(UserId::from_public_key(&k1), UserId::from_public_key(&k2));
    }
}
