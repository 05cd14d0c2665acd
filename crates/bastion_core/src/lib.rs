//! BASTION Core Types
//!
//! Pure types shared by the access-control engine and the bearer token:
//! identifiers, public keys, epochs, protocol versions and the raw wire
//! records exchanged with the protocol codec. No I/O happens here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding;
pub mod epoch;
pub mod error;
pub mod id;
pub mod key;
pub mod version;
pub mod wire;

// Re-exports
pub use encoding::{CanonicalDecode, CanonicalEncode, DecodeMode};
pub use epoch::Epoch;
pub use error::{CoreError, CoreResult};
pub use id::{ContainerId, ObjectId, UserId};
pub use key::PublicKey;
pub use version::Version;
