//! Rules of the extended ACL.

use crate::error::RuleError;
use crate::filter::Filter;
use crate::target::RuleTarget;
use crate::types::{Action, HeaderScope, Matcher, Op, Role};
use bastion_core::wire::{RawRecord, RawTarget};
use bastion_core::DecodeMode;

/// One allow/deny record keyed by operation, subjects and header filters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    action: Action,
    operation: Op,
    targets: Vec<RuleTarget>,
    filters: Vec<Filter>,
}

impl Rule {
    fn new(action: Action, op: Op, target: RuleTarget) -> Self {
        let mut rule = Self {
            action,
            operation: op,
            targets: Vec::new(),
            filters: Vec::new(),
        };
        rule.add_target_subjects([target]);
        rule
    }

    /// Rule granting `op` to the target
    ///
    /// # Panics
    ///
    /// Panics if the target is an empty key set
    #[must_use]
    pub fn allow(op: Op, target: RuleTarget) -> Self {
        Self::new(Action::Allow, op, target)
    }

    /// Rule refusing `op` to the target
    ///
    /// # Panics
    ///
    /// Panics if the target is an empty key set
    #[must_use]
    pub fn deny(op: Op, target: RuleTarget) -> Self {
        Self::new(Action::Deny, op, target)
    }

    /// Append target subjects.
    ///
    /// Role targets are appended as separate entries. Key targets are merged
    /// into the last key target of the rule, so a rule built this way holds
    /// at most one key set.
    ///
    /// # Panics
    ///
    /// Panics if any target is an empty key set or holds an empty key
    pub fn add_target_subjects(&mut self, targets: impl IntoIterator<Item = RuleTarget>) {
        for target in targets {
            match target {
                RuleTarget::Role(role) => self.targets.push(RuleTarget::Role(role)),
                RuleTarget::Keys(keys) => {
                    assert!(!keys.is_empty(), "uninitialized rule target");
                    if let Some(i) = keys.iter().position(Vec::is_empty) {
                        panic!("empty key #{i} in target");
                    }

                    let existing = self.targets.iter_mut().rev().find_map(|t| match t {
                        RuleTarget::Keys(existing) => Some(existing),
                        RuleTarget::Role(_) => None,
                    });

                    match existing {
                        Some(existing) => existing.extend(keys),
                        None => self.targets.push(RuleTarget::Keys(keys)),
                    }
                }
            }
        }
    }

    /// Replace the header filters. All filters must hold for the rule to match.
    ///
    /// # Panics
    ///
    /// Panics if any filter is uninitialized
    pub fn filter_by(&mut self, filters: impl IntoIterator<Item = Filter>) {
        self.filters = filters
            .into_iter()
            .enumerate()
            .map(|(i, f)| {
                assert!(!f.is_uninitialized(), "uninitialized filter #{i}");
                f
            })
            .collect();
    }

    /// Action committed on match
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Operation the rule applies to
    #[must_use]
    pub fn operation(&self) -> Op {
        self.operation
    }

    /// Target subjects
    #[must_use]
    pub fn targets(&self) -> &[RuleTarget] {
        &self.targets
    }

    /// Header filters
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub(crate) fn from_raw(raw: &RawRecord, mode: DecodeMode) -> Result<Self, RuleError> {
        let strict = mode.checks_presence();

        let operation = Op::from_code(raw.operation);
        if let (true, Op::Unknown(code)) = (strict, operation) {
            return Err(RuleError::UnsupportedOperation { code });
        }

        let action = Action::from_code(raw.action);
        if let (true, Action::Unknown(code)) = (strict, action) {
            return Err(RuleError::UnsupportedAction { code });
        }

        if strict && raw.targets.is_empty() {
            return Err(RuleError::MissingTargets);
        }

        let targets = raw
            .targets
            .iter()
            .enumerate()
            .map(|(i, t)| target_from_raw(i, t, strict))
            .collect::<Result<Vec<_>, _>>()?;

        let mut filters = Vec::with_capacity(raw.filters.len());
        for (i, f) in raw.filters.iter().enumerate() {
            if strict {
                if f.key.is_empty() {
                    return Err(RuleError::MissingFilterKey { filter: i });
                }
                if f.value.is_empty() {
                    return Err(RuleError::MissingFilterValue { filter: i });
                }
            }

            let filter = Filter::from_raw(f);
            if strict {
                if let HeaderScope::Unknown(code) = filter.scope() {
                    return Err(RuleError::UnsupportedHeaderType { filter: i, code });
                }
                if let Matcher::Unknown(code) = filter.matcher() {
                    return Err(RuleError::UnsupportedMatcher { filter: i, code });
                }
            }
            filters.push(filter);
        }

        Ok(Self {
            action,
            operation,
            targets,
            filters,
        })
    }

    pub(crate) fn to_raw(&self) -> RawRecord {
        RawRecord {
            operation: self.operation.code(),
            action: self.action.code(),
            filters: self.filters.iter().map(Filter::to_raw).collect(),
            targets: self
                .targets
                .iter()
                .map(|t| match t {
                    RuleTarget::Role(role) => RawTarget {
                        role: role.code(),
                        keys: Vec::new(),
                    },
                    RuleTarget::Keys(keys) => RawTarget {
                        role: 0,
                        keys: keys.clone(),
                    },
                })
                .collect(),
        }
    }
}

fn target_from_raw(index: usize, raw: &RawTarget, strict: bool) -> Result<RuleTarget, RuleError> {
    if raw.role != 0 && !raw.keys.is_empty() {
        return Err(RuleError::RoleWithKeys {
            target: index,
            role: raw.role,
        });
    }

    if let Some(key) = raw.keys.iter().position(Vec::is_empty) {
        return Err(RuleError::EmptyKey { target: index, key });
    }

    if raw.role != 0 {
        let role = Role::from_code(raw.role);
        if let (true, Role::Unknown(code)) = (strict, role) {
            return Err(RuleError::UnsupportedRole {
                target: index,
                code,
            });
        }
        return Ok(RuleTarget::Role(role));
    }

    if strict && raw.keys.is_empty() {
        return Err(RuleError::EmptyTarget { target: index });
    }

    Ok(RuleTarget::Keys(raw.keys.clone()))
}
