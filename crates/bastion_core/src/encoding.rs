//! Canonical encoding of wire records.
//!
//! Binary form uses postcard, which is byte-stable and preserves field
//! order. The JSON form uses serde_json over the same records.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// How strictly a raw record is checked when read into a domain type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Every protocol-required field must be present
    Strict,
    /// Presence checks are skipped for already-produced data
    Lenient,
}

impl DecodeMode {
    /// Whether presence checks apply
    #[must_use]
    pub const fn checks_presence(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Trait for canonical serialization
pub trait CanonicalEncode: Serialize {
    /// Encode to canonical bytes
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized
    fn encode(&self) -> CoreResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| CoreError::Encoding {
            reason: e.to_string(),
        })
    }

    /// Encode to JSON
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized
    fn encode_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::Encoding {
            reason: e.to_string(),
        })
    }
}

// Types opt in to CanonicalEncode explicitly; only wire records are signed
// or transported.

/// Trait for canonical deserialization
pub trait CanonicalDecode: for<'de> Deserialize<'de> + Sized {
    /// Decode from canonical bytes
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a valid encoding
    fn decode(data: &[u8]) -> CoreResult<Self> {
        Ok(postcard::from_bytes(data)?)
    }

    /// Decode from JSON
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a valid encoding
    fn decode_json(data: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

impl<T: for<'de> Deserialize<'de>> CanonicalDecode for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Sample {
        a: u64,
        b: String,
        c: Vec<Vec<u8>>,
    }

    impl CanonicalEncode for Sample {}

    #[test]
    fn test_encode_deterministic() {
        let value = Sample {
            a: 7,
            b: "x".to_string(),
            c: vec![vec![1, 2]],
        };
        assert_eq!(value.encode().unwrap(), value.encode().unwrap());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(Sample::decode(&[0xff, 0xff, 0xff]).is_err());
        assert!(Sample::decode_json("{").is_err());
    }

    struct UnsizedSeq;

    impl Serialize for UnsizedSeq {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            use serde::ser::SerializeSeq;
            serializer.serialize_seq(None)?.end()
        }
    }

    impl CanonicalEncode for UnsizedSeq {}

    #[derive(Serialize)]
    struct BytesKeyed(std::collections::BTreeMap<Vec<u8>, u8>);

    impl CanonicalEncode for BytesKeyed {}

    #[test]
    fn test_encode_failures_reported_as_encoding() {
        assert!(matches!(UnsizedSeq.encode(), Err(CoreError::Encoding { .. })));

        let keyed = BytesKeyed([(vec![1u8], 2u8)].into_iter().collect());
        assert!(matches!(keyed.encode_json(), Err(CoreError::Encoding { .. })));
    }

    #[test]
    fn test_decode_failures_reported_as_invalid_encoding() {
        assert!(matches!(
            Sample::decode(&[0xff]),
            Err(CoreError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn test_decode_mode() {
        assert!(DecodeMode::Strict.checks_presence());
        assert!(!DecodeMode::Lenient.checks_presence());
    }

    proptest::proptest! {
        #[test]
        fn prop_json_and_binary_agree(a: u64, b: String, c: Vec<Vec<u8>>) {
            let value = Sample { a, b, c };
            let from_bin = Sample::decode(&value.encode().unwrap()).unwrap();
            let from_json = Sample::decode_json(&value.encode_json().unwrap()).unwrap();
            prop_assert_eq!(from_bin, from_json);
        }
    }
}
