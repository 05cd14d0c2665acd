//! Errors of reading and evaluating extended ACL tables.

use bastion_core::CoreError;

/// Format violation inside one rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Operation code is zero or unknown
    #[error("unsupported operation {code}")]
    UnsupportedOperation {
        /// Raw code
        code: u32,
    },
    /// Action code is unknown
    #[error("unsupported action {code}")]
    UnsupportedAction {
        /// Raw code
        code: u32,
    },
    /// Rule has no target subjects
    #[error("missing target subjects")]
    MissingTargets,
    /// Target has neither role nor keys
    #[error("empty target #{target}")]
    EmptyTarget {
        /// Target index
        target: usize,
    },
    /// Target role code is unknown
    #[error("unsupported role {code} in target #{target}")]
    UnsupportedRole {
        /// Target index
        target: usize,
        /// Raw code
        code: u32,
    },
    /// Target sets a role and a key list
    #[error("role is set to {role} along with key list in target #{target}")]
    RoleWithKeys {
        /// Target index
        target: usize,
        /// Raw role code
        role: u32,
    },
    /// Key in a target is empty
    #[error("public key #{key} is empty in target #{target}")]
    EmptyKey {
        /// Target index
        target: usize,
        /// Key index
        key: usize,
    },
    /// Filter without a header key
    #[error("missing key in filter #{filter}")]
    MissingFilterKey {
        /// Filter index
        filter: usize,
    },
    /// Filter without a header value
    #[error("missing value in filter #{filter}")]
    MissingFilterValue {
        /// Filter index
        filter: usize,
    },
    /// Filter header type code is unknown
    #[error("unsupported header type {code} in filter #{filter}")]
    UnsupportedHeaderType {
        /// Filter index
        filter: usize,
        /// Raw code
        code: u32,
    },
    /// Filter match type code is unknown
    #[error("unsupported matcher {code} in filter #{filter}")]
    UnsupportedMatcher {
        /// Filter index
        filter: usize,
        /// Raw code
        code: u32,
    },
}

/// Error reading a table from its wire form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Bytes are not a valid encoding
    #[error(transparent)]
    Encoding(#[from] CoreError),
    /// Table has no version tag
    #[error("missing version")]
    MissingVersion,
    /// Table has no rules
    #[error("missing rules")]
    MissingRules,
    /// Container identifier is malformed
    #[error("invalid container ID: {0}")]
    InvalidContainerId(#[source] CoreError),
    /// Rule is malformed
    #[error("invalid rule #{index}: {source}")]
    InvalidRule {
        /// Rule index
        index: usize,
        /// What is wrong with the rule
        #[source]
        source: RuleError,
    },
}

/// Error aborting an access evaluation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Request carries no requester key
    #[error("missing requester key")]
    MissingRequesterKey,
    /// Matching rule commits an unknown action
    #[error("rule #{rule} matches, but action {code} is not supported")]
    UnsupportedAction {
        /// Rule index
        rule: usize,
        /// Raw code
        code: u32,
    },
    /// Filter inspects an unknown header type
    #[error("unsupported header type {code} (rule#{rule}, filter#{filter})")]
    UnsupportedHeaderType {
        /// Rule index
        rule: usize,
        /// Filter index
        filter: usize,
        /// Raw code
        code: u32,
    },
    /// Filter uses an unknown matcher
    #[error("unsupported matcher {code} (rule#{rule}, filter#{filter})")]
    UnsupportedMatcher {
        /// Rule index
        rule: usize,
        /// Filter index
        filter: usize,
        /// Raw code
        code: u32,
    },
}

/// Non-allow decision expressed as an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// A matching rule denied the operation
    #[error("access denied")]
    Denied,
    /// No rule matched the request
    #[error("rule not found")]
    RuleNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidRule {
            index: 2,
            source: RuleError::EmptyTarget { target: 0 },
        };
        assert_eq!(err.to_string(), "invalid rule #2: empty target #0");
    }

    #[test]
    fn test_eval_error_names_location() {
        let err = EvalError::UnsupportedMatcher {
            rule: 1,
            filter: 3,
            code: 0,
        };
        let s = err.to_string();
        assert!(s.contains("rule#1"));
        assert!(s.contains("filter#3"));
    }

    #[test]
    fn test_access_errors_distinct() {
        assert_ne!(AccessError::Denied, AccessError::RuleNotFound);
        assert_eq!(AccessError::Denied.to_string(), "access denied");
    }
}
