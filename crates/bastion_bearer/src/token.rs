//! Bearer tokens.

use crate::error::TokenError;
use crate::signature::{Signature, Signer};
use bastion_core::wire::{RawLifetime, RawToken, RawTokenBody};
use bastion_core::{
    CanonicalDecode, CanonicalEncode, ContainerId, CoreResult, DecodeMode, Epoch, UserId,
};
use bastion_eacl::{AccessRequest, Decision, EvalConfig, PolicyTable};

/// Validity window of a token in network epochs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Lifetime {
    /// Issued at
    pub iat: Epoch,
    /// Not valid before
    pub nbf: Epoch,
    /// Expires after
    pub exp: Epoch,
}

impl Lifetime {
    /// Whether the window excludes `epoch`.
    ///
    /// A zero expiration means none was ever set and excludes every epoch.
    #[must_use]
    pub fn invalid_at(&self, epoch: Epoch) -> bool {
        self.exp.is_zero() || epoch < self.nbf || epoch > self.exp || epoch < self.iat
    }

    fn from_raw(raw: &RawLifetime) -> Self {
        Self {
            iat: Epoch::from(raw.iat),
            nbf: Epoch::from(raw.nbf),
            exp: Epoch::from(raw.exp),
        }
    }

    fn to_raw(self) -> RawLifetime {
        RawLifetime {
            exp: self.exp.as_u64(),
            nbf: self.nbf.as_u64(),
            iat: self.iat.as_u64(),
        }
    }
}

/// Where and for whom a token is being presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenContext {
    /// Current network epoch
    pub epoch: Epoch,
    /// Container the request targets
    pub container: ContainerId,
    /// User presenting the token
    pub user: UserId,
}

/// Delegated authorization token.
///
/// The body (lifetime, container and user restrictions, embedded table) is
/// signed as a whole. Changing any body field after [`BearerToken::sign`]
/// makes [`BearerToken::verify_signature`] fail until the token is signed
/// again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken {
    lifetime: Option<Lifetime>,
    container: Option<ContainerId>,
    user: Option<UserId>,
    table: Option<PolicyTable>,
    signature: Option<Signature>,
}

impl BearerToken {
    /// Create an empty, unsigned token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lifetime_mut(&mut self) -> &mut Lifetime {
        self.lifetime.get_or_insert_with(Lifetime::default)
    }

    /// Set the issued-at epoch
    pub fn set_iat(&mut self, epoch: impl Into<Epoch>) {
        self.lifetime_mut().iat = epoch.into();
    }

    /// Set the not-valid-before epoch
    pub fn set_nbf(&mut self, epoch: impl Into<Epoch>) {
        self.lifetime_mut().nbf = epoch.into();
    }

    /// Set the expiration epoch
    pub fn set_exp(&mut self, epoch: impl Into<Epoch>) {
        self.lifetime_mut().exp = epoch.into();
    }

    /// Validity window; all zero when never set
    #[must_use]
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime.unwrap_or_default()
    }

    /// Whether the token is unusable at `epoch`
    #[must_use]
    pub fn invalid_at(&self, epoch: impl Into<Epoch>) -> bool {
        self.lifetime().invalid_at(epoch.into())
    }

    /// Restrict the token to one container
    pub fn restrict_to_container(&mut self, id: ContainerId) {
        self.container = Some(id);
    }

    /// Container restriction
    #[must_use]
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// Whether the token may be used for the container.
    ///
    /// Both the token's own restriction and the container scope of the
    /// embedded table must allow `id`.
    #[must_use]
    pub fn assert_container(&self, id: &ContainerId) -> bool {
        self.container.is_none_or(|c| c == *id)
            && self
                .table
                .as_ref()
                .and_then(PolicyTable::container)
                .is_none_or(|c| c == *id)
    }

    /// Restrict the token to one delegate user
    pub fn for_user(&mut self, id: UserId) {
        self.user = Some(id);
    }

    /// Delegate user restriction
    #[must_use]
    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    /// Whether the token may be used by the user
    #[must_use]
    pub fn assert_user(&self, id: &UserId) -> bool {
        self.user.is_none_or(|u| u == *id)
    }

    /// Embed an extended ACL. The token keeps its own copy.
    pub fn set_policy_table(&mut self, table: PolicyTable) {
        self.table = Some(table);
    }

    /// Embedded extended ACL
    #[must_use]
    pub fn policy_table(&self) -> Option<&PolicyTable> {
        self.table.as_ref()
    }

    fn body_to_raw(&self) -> RawTokenBody {
        RawTokenBody {
            eacl: self.table.as_ref().map(PolicyTable::write_to_raw),
            owner_id: self.user.map(|u| u.as_bytes().to_vec()),
            lifetime: self.lifetime.map(Lifetime::to_raw),
            container_id: self.container.map(|c| c.as_bytes().to_vec()),
        }
    }

    /// Bytes covered by the signature: the canonical encoding of the body
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be serialized
    pub fn signed_data(&self) -> CoreResult<Vec<u8>> {
        self.body_to_raw().encode()
    }

    /// Sign the current body
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be serialized
    pub fn sign(&mut self, signer: &Signer) -> Result<(), TokenError> {
        let data = self.signed_data()?;
        self.signature = Some(signer.sign(&data));
        Ok(())
    }

    /// Attach a signature computed elsewhere over [`BearerToken::signed_data`]
    pub fn attach_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    /// Attached signature
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Serialized public key of the signer
    #[must_use]
    pub fn signing_key_bytes(&self) -> Option<&[u8]> {
        self.signature.as_ref().map(Signature::key)
    }

    /// Whether the attached signature matches the current body
    #[must_use]
    pub fn verify_signature(&self) -> bool {
        let Some(signature) = &self.signature else {
            return false;
        };

        match self.signed_data() {
            Ok(data) => signature.verify(&data),
            Err(err) => {
                tracing::debug!(%err, "token body cannot be encoded");
                false
            }
        }
    }

    /// User accountable for the token, derived from the signature key
    #[must_use]
    pub fn resolve_issuer(&self) -> Option<UserId> {
        self.signature
            .as_ref()
            .and_then(Signature::public_key)
            .map(|key| UserId::from_public_key(&key))
    }

    /// Validate the token for a request and evaluate its embedded table.
    ///
    /// The signature, the validity window, the container and the user are
    /// checked in that order before the table is consulted. A token without
    /// a table delegates identity only and yields
    /// [`Decision::NoRuleMatched`].
    ///
    /// # Errors
    ///
    /// Returns the first failed check, or the evaluation error of the table
    pub fn authorize(
        &self,
        ctx: &TokenContext,
        config: &EvalConfig,
        request: &AccessRequest,
    ) -> Result<Decision, TokenError> {
        if !self.verify_signature() {
            return Err(TokenError::InvalidSignature);
        }
        if self.invalid_at(ctx.epoch) {
            return Err(TokenError::InvalidAt { epoch: ctx.epoch });
        }
        if !self.assert_container(&ctx.container) {
            return Err(TokenError::ContainerMismatch);
        }
        if !self.assert_user(&ctx.user) {
            return Err(TokenError::UserMismatch);
        }

        match &self.table {
            Some(table) => Ok(table.check_access_with(config, request)?),
            None => Ok(Decision::NoRuleMatched),
        }
    }

    /// Read a token from its wire record.
    ///
    /// In strict mode the body, its lifetime and the signature must be
    /// present and the embedded table is read strictly as well. Identifier
    /// formats are verified in both modes.
    ///
    /// # Errors
    ///
    /// Returns error describing the first violation found
    pub fn read_from_raw(raw: &RawToken, mode: DecodeMode) -> Result<Self, TokenError> {
        let strict = mode.checks_presence();
        let empty = RawTokenBody::default();

        let body = match &raw.body {
            Some(body) => body,
            None if strict => return Err(TokenError::MissingBody),
            None => &empty,
        };

        if strict && body.lifetime.is_none() {
            return Err(TokenError::MissingLifetime);
        }

        let table = body
            .eacl
            .as_ref()
            .map(|t| PolicyTable::read_from_raw(t, mode))
            .transpose()
            .map_err(TokenError::InvalidTable)
            .inspect_err(|err| tracing::debug!(%err, "embedded eACL rejected"))?;

        let user = body
            .owner_id
            .as_deref()
            .map(UserId::from_slice)
            .transpose()
            .map_err(TokenError::InvalidUser)?;

        let container = body
            .container_id
            .as_deref()
            .map(ContainerId::from_slice)
            .transpose()
            .map_err(TokenError::InvalidContainer)?;

        if strict && raw.signature.is_none() {
            return Err(TokenError::MissingSignature);
        }

        Ok(Self {
            lifetime: body.lifetime.as_ref().map(Lifetime::from_raw),
            container,
            user,
            table,
            signature: raw.signature.as_ref().map(Signature::from_raw),
        })
    }

    /// Write the token to its wire record
    #[must_use]
    pub fn write_to_raw(&self) -> RawToken {
        RawToken {
            body: Some(self.body_to_raw()),
            signature: self.signature.as_ref().map(Signature::to_raw),
        }
    }

    /// Encode to the binary protocol form
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_binary(&self) -> CoreResult<Vec<u8>> {
        self.write_to_raw().encode()
    }

    /// Decode from the binary protocol form. Presence is not checked.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are malformed or violate the format
    pub fn from_binary(data: &[u8]) -> Result<Self, TokenError> {
        let raw = RawToken::decode(data)?;
        Self::read_from_raw(&raw, DecodeMode::Lenient)
    }

    /// Encode to the JSON protocol form
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> CoreResult<String> {
        self.write_to_raw().encode_json()
    }

    /// Decode from the JSON protocol form. Presence is not checked.
    ///
    /// # Errors
    ///
    /// Returns error if the text is malformed or violates the format
    pub fn from_json(data: &str) -> Result<Self, TokenError> {
        let raw = RawToken::decode_json(data)?;
        Self::read_from_raw(&raw, DecodeMode::Lenient)
    }
}

/// User accountable for a token; `None` when unsigned or the key is malformed
#[must_use]
pub fn resolve_issuer(token: &BearerToken) -> Option<UserId> {
    token.resolve_issuer()
}
