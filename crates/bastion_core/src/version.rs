//! Protocol version tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol version carried by policy tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

impl Version {
    /// Create a new version
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Version implemented by this library
    #[must_use]
    pub const fn current() -> Self {
        Self::new(2, 16)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}
