//! Raw wire records.
//!
//! These mirror the protocol messages field for field. Enumerations are kept
//! as integer codes so that values unknown to this library survive a lenient
//! decode and can be reported by whoever interprets them. Domain types read
//! from and write to these records; the protocol codec only ever sees them.

use crate::encoding::CanonicalEncode;
use serde::{Deserialize, Serialize};

/// Protocol version message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

/// Extended ACL table message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    /// Protocol version of the table
    pub version: Option<RawVersion>,
    /// Container the table is scoped to
    pub container_id: Option<Vec<u8>>,
    /// Ordered rules
    pub records: Vec<RawRecord>,
}

/// Extended ACL record (rule) message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Operation code
    pub operation: u32,
    /// Action code
    pub action: u32,
    /// Header filters
    pub filters: Vec<RawFilter>,
    /// Target subjects
    pub targets: Vec<RawTarget>,
}

/// Header filter message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilter {
    /// Header type (scope) code
    pub header_type: u32,
    /// Match type code
    pub match_type: u32,
    /// Header key
    pub key: String,
    /// Header value
    pub value: String,
}

/// Target subject message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTarget {
    /// Role code, zero when keys are used
    pub role: u32,
    /// Serialized public keys
    pub keys: Vec<Vec<u8>>,
}

/// Token lifetime message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLifetime {
    /// Expiration epoch
    pub exp: u64,
    /// Not-valid-before epoch
    pub nbf: u64,
    /// Issued-at epoch
    pub iat: u64,
}

/// Bearer token body message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenBody {
    /// Embedded extended ACL
    pub eacl: Option<RawTable>,
    /// Delegate user
    pub owner_id: Option<Vec<u8>>,
    /// Validity window
    pub lifetime: Option<RawLifetime>,
    /// Container restriction
    pub container_id: Option<Vec<u8>>,
}

impl CanonicalEncode for RawTokenBody {}

/// Signature message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignature {
    /// Serialized public key of the signer
    pub key: Vec<u8>,
    /// Signature bytes
    pub sign: Vec<u8>,
}

/// Bearer token message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    /// Signed body
    pub body: Option<RawTokenBody>,
    /// Signature over the encoded body
    pub signature: Option<RawSignature>,
}

impl CanonicalEncode for RawTable {}
impl CanonicalEncode for RawToken {}
