//! Rule targets: who a rule applies to.

use crate::types::Role;
use bastion_core::PublicKey;

/// Subject selector of a rule.
///
/// A target names either a role or an explicit key set, never both. A rule
/// may hold one target of each kind side by side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    /// Every requester acting in the role
    Role(Role),
    /// Requesters whose serialized public key is in the set
    Keys(Vec<Vec<u8>>),
}

impl RuleTarget {
    /// Target requesters acting in a role
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self::Role(role)
    }

    /// Target requesters holding one of the keys
    ///
    /// # Panics
    ///
    /// Panics if `keys` is empty
    #[must_use]
    pub fn with_keys(keys: &[PublicKey]) -> Self {
        assert!(!keys.is_empty(), "missing key list");
        Self::Keys(keys.iter().map(PublicKey::to_vec).collect())
    }

    /// Role of a role target
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Role(role) => Some(*role),
            Self::Keys(_) => None,
        }
    }

    /// Keys of a key target, empty for a role target
    #[must_use]
    pub fn keys(&self) -> &[Vec<u8>] {
        match self {
            Self::Role(_) => &[],
            Self::Keys(keys) => keys,
        }
    }

    /// Whether the requester is selected by this target. A role target with
    /// an unknown role selects nobody.
    #[must_use]
    pub fn matches(&self, role: Role, key: &[u8]) -> bool {
        match self {
            Self::Role(target) => target.is_known() && *target == role,
            Self::Keys(keys) => keys.iter().any(|k| k.as_slice() == key),
        }
    }
}
