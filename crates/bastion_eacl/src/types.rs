//! Enumerations of the extended ACL.
//!
//! Every enumeration keeps an `Unknown` variant holding the raw code, so a
//! leniently read table carries values from newer protocol versions intact.
//! Rules with an unknown operation or role target never match; unknown
//! actions, matchers and header scopes make the decision procedure refuse
//! to evaluate.

use std::fmt;

/// Object service operation a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    /// Object.Get
    Get,
    /// Object.Head
    Head,
    /// Object.Put
    Put,
    /// Object.Delete
    Delete,
    /// Object.Search
    Search,
    /// Object.GetRange
    Range,
    /// Object.GetRangeHash
    RangeHash,
    /// Code this library does not know
    Unknown(u32),
}

impl Op {
    /// All known operations in wire-code order
    pub const ALL: [Op; 7] = [
        Op::Get,
        Op::Head,
        Op::Put,
        Op::Delete,
        Op::Search,
        Op::Range,
        Op::RangeHash,
    ];

    /// Wire code
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Get => 1,
            Self::Head => 2,
            Self::Put => 3,
            Self::Delete => 4,
            Self::Search => 5,
            Self::Range => 6,
            Self::RangeHash => 7,
            Self::Unknown(code) => code,
        }
    }

    /// Operation for a wire code
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Get,
            2 => Self::Head,
            3 => Self::Put,
            4 => Self::Delete,
            5 => Self::Search,
            6 => Self::Range,
            7 => Self::RangeHash,
            other => Self::Unknown(other),
        }
    }

    /// Whether the code is one this library knows
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Search => "SEARCH",
            Self::Range => "GETRANGE",
            Self::RangeHash => "GETRANGEHASH",
            Self::Unknown(code) => return write!(f, "UNKNOWN({code})"),
        };
        f.write_str(name)
    }
}

/// Coarse requester class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Container owner
    Owner,
    /// Storage nodes serving the container
    Container,
    /// Inner ring nodes
    InnerRing,
    /// Everyone else
    Others,
    /// Code this library does not know
    Unknown(u32),
}

impl Role {
    /// Wire code
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Owner => 1,
            Self::Container => 2,
            Self::InnerRing => 3,
            Self::Others => 4,
            Self::Unknown(code) => code,
        }
    }

    /// Role for a wire code
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Owner,
            2 => Self::Container,
            3 => Self::InnerRing,
            4 => Self::Others,
            other => Self::Unknown(other),
        }
    }

    /// Whether the code is one this library knows
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Owner => "OWNER",
            Self::Container => "CONTAINER",
            Self::InnerRing => "INNER_RING",
            Self::Others => "OTHERS",
            Self::Unknown(code) => return write!(f, "UNKNOWN({code})"),
        };
        f.write_str(name)
    }
}

/// Verdict committed by a matching rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Grant the operation
    Allow,
    /// Refuse the operation
    Deny,
    /// Code this library does not know
    Unknown(u32),
}

impl Action {
    /// Wire code
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Allow => 1,
            Self::Deny => 2,
            Self::Unknown(code) => code,
        }
    }

    /// Action for a wire code
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Allow,
            2 => Self::Deny,
            other => Self::Unknown(other),
        }
    }
}

/// Comparison between a filter value and a header value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Values are identical
    Equal,
    /// Values differ
    NotEqual,
    /// Code this library does not know
    Unknown(u32),
}

impl Matcher {
    /// Wire code
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Equal => 1,
            Self::NotEqual => 2,
            Self::Unknown(code) => code,
        }
    }

    /// Matcher for a wire code
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Equal,
            2 => Self::NotEqual,
            other => Self::Unknown(other),
        }
    }
}

/// Which header list a filter inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderScope {
    /// Request headers (X-headers)
    Request,
    /// Headers of the target object
    Object,
    /// Service headers; recognized but never evaluated
    Service,
    /// Code this library does not know
    Unknown(u32),
}

impl HeaderScope {
    /// Wire code
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Request => 1,
            Self::Object => 2,
            Self::Service => 3,
            Self::Unknown(code) => code,
        }
    }

    /// Scope for a wire code
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Request,
            2 => Self::Object,
            3 => Self::Service,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_codes() {
        for op in Op::ALL {
            assert_eq!(Op::from_code(op.code()), op);
            assert!(op.is_known());
        }
        assert_eq!(Op::from_code(0), Op::Unknown(0));
        assert_eq!(Op::from_code(8).code(), 8);
        assert!(!Op::from_code(8).is_known());
    }

    #[test]
    fn test_role_codes() {
        assert_eq!(Role::from_code(Role::InnerRing.code()), Role::InnerRing);
        assert_eq!(Role::from_code(0), Role::Unknown(0));
        assert!(!Role::from_code(9).is_known());
    }

    #[test]
    fn test_unknown_codes_preserved() {
        assert_eq!(Action::from_code(0), Action::Unknown(0));
        assert_eq!(Action::Unknown(9).code(), 9);
        assert_eq!(Matcher::from_code(2), Matcher::NotEqual);
        assert_eq!(Matcher::from_code(5), Matcher::Unknown(5));
        assert_eq!(HeaderScope::from_code(3), HeaderScope::Service);
        assert_eq!(HeaderScope::from_code(0), HeaderScope::Unknown(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Op::RangeHash.to_string(), "GETRANGEHASH");
        assert_eq!(Role::Owner.to_string(), "OWNER");
        assert_eq!(Op::Unknown(8).to_string(), "UNKNOWN(8)");
    }
}
