//! Ed25519 signatures over token bodies.

use bastion_core::wire::RawSignature;
use bastion_core::PublicKey;
use ed25519_dalek::Signature as DalekSignature;
use ed25519_dalek::Signer as DalekSigner;
use ed25519_dalek::Verifier as DalekVerifier;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand_core::{OsRng, RngCore};

/// Detached signature: the signer's serialized public key and the signature bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    key: Vec<u8>,
    bytes: Vec<u8>,
}

impl Signature {
    /// Create from raw parts. Neither part is validated.
    #[must_use]
    pub fn new(key: Vec<u8>, bytes: Vec<u8>) -> Self {
        Self { key, bytes }
    }

    /// Serialized public key of the signer
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Signature bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn verifying_key(&self) -> Option<(PublicKey, VerifyingKey)> {
        let key = PublicKey::from_slice(&self.key).ok()?;
        let verifying_key = VerifyingKey::from_bytes(key.as_bytes()).ok()?;
        Some((key, verifying_key))
    }

    /// Public key of the signer, if it is a well-formed Ed25519 point
    #[must_use]
    pub fn public_key(&self) -> Option<PublicKey> {
        self.verifying_key().map(|(key, _)| key)
    }

    /// Check the signature over `message`
    #[must_use]
    pub fn verify(&self, message: &[u8]) -> bool {
        let Some((_, verifying_key)) = self.verifying_key() else {
            tracing::debug!("signature key is malformed");
            return false;
        };

        let Ok(sig) = DalekSignature::from_slice(&self.bytes) else {
            tracing::debug!(len = self.bytes.len(), "signature bytes are malformed");
            return false;
        };

        verifying_key.verify(message, &sig).is_ok()
    }

    pub(crate) fn from_raw(raw: &RawSignature) -> Self {
        Self::new(raw.key.clone(), raw.sign.clone())
    }

    pub(crate) fn to_raw(&self) -> RawSignature {
        RawSignature {
            key: self.key.clone(),
            sign: self.bytes.clone(),
        }
    }
}

/// A signer that can create signatures
pub struct Signer {
    signing_key: SigningKey,
}

impl Signer {
    /// Create a new signer with a random keypair
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self {
            signing_key: SigningKey::from_bytes(&bytes),
        }
    }

    /// Create a signer from a secret key
    ///
    /// # Errors
    ///
    /// Returns error if the secret key is not 32 bytes
    pub fn from_secret(secret: &[u8]) -> Result<Self, SignatureError> {
        let bytes: [u8; 32] = secret
            .try_into()
            .map_err(|_| SignatureError::InvalidSecretKey)?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&bytes),
        })
    }

    /// Get the public key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature::new(self.public_key().to_vec(), sig.to_bytes().to_vec())
    }
}

impl Default for Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Signature-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Invalid secret key
    #[error("invalid secret key")]
    InvalidSecretKey,
}
