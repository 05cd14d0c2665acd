//! BASTION Bearer Tokens
//!
//! A bearer token lets a container owner delegate access to a third party
//! for a bounded window of epochs. It carries an optional extended ACL, an
//! optional container and user restriction, and an Ed25519 signature of the
//! issuer over all of the above.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod signature;
pub mod token;

pub use error::TokenError;
pub use signature::{Signature, SignatureError, Signer};
pub use token::{resolve_issuer, BearerToken, Lifetime, TokenContext};
