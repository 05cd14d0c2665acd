//! Network epochs.
//!
//! Token lifetimes are expressed in the network's logical epoch counter,
//! never in wall-clock time.

use serde::{Deserialize, Serialize};

/// Logical network epoch - monotonically increasing counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Epoch {
    /// Get raw value
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether this is epoch zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl From<u64> for Epoch {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Epoch> for u64 {
    fn from(epoch: Epoch) -> Self {
        epoch.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_ordering() {
        assert!(Epoch::from(1u64) < Epoch::from(2u64));
        assert!(Epoch::default().is_zero());
        assert_eq!(u64::from(Epoch::from(7u64)), 7);
    }

    #[test]
    fn test_epoch_display() {
        assert_eq!(format!("{}", Epoch::from(42u64)), "E42");
    }
}
