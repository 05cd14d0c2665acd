//! Extended ACL tables.

use crate::error::DecodeError;
use crate::rule::Rule;
use bastion_core::wire::{RawTable, RawVersion};
use bastion_core::{CanonicalDecode, CanonicalEncode, ContainerId, CoreResult, DecodeMode, Version};

/// Ordered list of rules, optionally scoped to one container.
///
/// Rules are evaluated top to bottom and the first match wins, so order is
/// part of the table's meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyTable {
    version: Option<Version>,
    container: Option<ContainerId>,
    rules: Vec<Rule>,
}

impl PolicyTable {
    /// Table of the current protocol version holding a single rule
    #[must_use]
    pub fn new(rule: Rule) -> Self {
        Self {
            version: Some(Version::current()),
            container: None,
            rules: vec![rule],
        }
    }

    /// Append a rule with the lowest priority
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Insert a rule ahead of all others
    pub fn set_first_rule(&mut self, rule: Rule) {
        self.rules.insert(0, rule);
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Protocol version tag
    #[must_use]
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Container the table applies to
    #[must_use]
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// Scope the table to one container
    pub fn restrict_to_container(&mut self, id: ContainerId) {
        self.container = Some(id);
    }

    /// Read a table from its wire record.
    ///
    /// Identifier formats and target shapes are always verified. In strict
    /// mode the version tag, at least one rule, every rule's targets and
    /// filter fields must be present and every code must be known.
    ///
    /// # Errors
    ///
    /// Returns error describing the first violation found
    pub fn read_from_raw(raw: &RawTable, mode: DecodeMode) -> Result<Self, DecodeError> {
        if mode.checks_presence() && raw.version.is_none() {
            return Err(DecodeError::MissingVersion);
        }

        let container = raw
            .container_id
            .as_deref()
            .map(ContainerId::from_slice)
            .transpose()
            .map_err(DecodeError::InvalidContainerId)?;

        if mode.checks_presence() && raw.records.is_empty() {
            return Err(DecodeError::MissingRules);
        }

        let rules = raw
            .records
            .iter()
            .enumerate()
            .map(|(index, r)| {
                Rule::from_raw(r, mode).map_err(|source| DecodeError::InvalidRule { index, source })
            })
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| tracing::debug!(%err, "eACL record rejected"))?;

        Ok(Self {
            version: raw.version.map(|v| Version::new(v.major, v.minor)),
            container,
            rules,
        })
    }

    /// Write the table to its wire record
    #[must_use]
    pub fn write_to_raw(&self) -> RawTable {
        RawTable {
            version: self.version.map(|v| RawVersion {
                major: v.major,
                minor: v.minor,
            }),
            container_id: self.container.map(|c| c.as_bytes().to_vec()),
            records: self.rules.iter().map(Rule::to_raw).collect(),
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
    pub fn from_binary(data: &[u8]) -> Result<Self, DecodeError> {
        let raw = RawTable::decode(data)?;
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
    pub fn from_json(data: &str) -> Result<Self, DecodeError> {
        let raw = RawTable::decode_json(data)?;
        Self::read_from_raw(&raw, DecodeMode::Lenient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Filter, Header};
    use crate::target::RuleTarget;
    use crate::types::{Matcher, Op, Role};
    use bastion_core::{ObjectId, PublicKey};
    use proptest::prelude::*;

    fn sample_table() -> PolicyTable {
        let mut rule = Rule::allow(Op::Get, RuleTarget::with_role(Role::Owner));
        rule.add_target_subjects([
            RuleTarget::with_role(Role::Container),
            RuleTarget::with_keys(&[
                PublicKey::from_bytes([1u8; 32]),
                PublicKey::from_bytes([2u8; 32]),
            ]),
        ]);
        rule.filter_by([
            Filter::request_header(Matcher::Equal, Header::new("req", "1")),
            Filter::by_object_id(&ObjectId::from_bytes([3u8; 32])),
        ]);

        let mut table = PolicyTable::new(rule);
        table.add_rule(Rule::deny(Op::Put, RuleTarget::with_role(Role::Others)));
        table.restrict_to_container(ContainerId::from_bytes([9u8; 32]));
        table
    }

    #[test]
    fn test_add_and_set_first_rule() {
        let mut table = PolicyTable::new(Rule::deny(Op::Get, RuleTarget::with_role(Role::Owner)));
        table.add_rule(Rule::allow(Op::Head, RuleTarget::with_role(Role::Owner)));
        table.set_first_rule(Rule::allow(Op::Put, RuleTarget::with_role(Role::Owner)));

        let ops: Vec<Op> = table.rules().iter().map(Rule::operation).collect();
        assert_eq!(ops, vec![Op::Put, Op::Get, Op::Head]);
    }

    #[test]
    fn test_restrict_to_container() {
        let mut table = PolicyTable::new(Rule::allow(Op::Get, RuleTarget::with_role(Role::Owner)));
        assert_eq!(table.container(), None);

        let cnr = ContainerId::from_bytes([1u8; 32]);
        table.restrict_to_container(cnr);
        assert_eq!(table.container(), Some(cnr));
    }

    #[test]
    fn test_binary_and_json_roundtrip() {
        let table = sample_table();

        let restored = PolicyTable::from_binary(&table.to_binary().unwrap()).unwrap();
        assert_eq!(restored, table);

        let restored = PolicyTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_strict_read() {
        let raw = sample_table().write_to_raw();
        assert_eq!(
            PolicyTable::read_from_raw(&raw, DecodeMode::Strict).unwrap(),
            sample_table()
        );

        let mut no_version = raw.clone();
        no_version.version = None;
        assert_eq!(
            PolicyTable::read_from_raw(&no_version, DecodeMode::Strict),
            Err(DecodeError::MissingVersion)
        );
        assert!(PolicyTable::read_from_raw(&no_version, DecodeMode::Lenient).is_ok());

        let mut no_rules = raw.clone();
        no_rules.records.clear();
        assert_eq!(
            PolicyTable::read_from_raw(&no_rules, DecodeMode::Strict),
            Err(DecodeError::MissingRules)
        );

        let mut bad_rule = raw;
        bad_rule.records[1].targets.clear();
        assert!(matches!(
            PolicyTable::read_from_raw(&bad_rule, DecodeMode::Strict),
            Err(DecodeError::InvalidRule { index: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_container_rejected_in_both_modes() {
        let mut raw = sample_table().write_to_raw();
        raw.container_id = Some(vec![1, 2, 3]);

        for mode in [DecodeMode::Strict, DecodeMode::Lenient] {
            assert!(matches!(
                PolicyTable::read_from_raw(&raw, mode),
                Err(DecodeError::InvalidContainerId(_))
            ));
        }
    }

    #[test]
    fn test_from_binary_garbage() {
        assert!(matches!(
            PolicyTable::from_binary(&[0xff; 4]),
            Err(DecodeError::Encoding(_))
        ));
    }

    fn arb_target() -> impl Strategy<Value = RuleTarget> {
        prop_oneof![
            (1u32..=6).prop_map(|c| RuleTarget::Role(Role::from_code(c))),
            prop::collection::vec(prop::collection::vec(any::<u8>(), 1..40), 1..4)
                .prop_map(RuleTarget::Keys),
        ]
    }

    fn arb_filter() -> impl Strategy<Value = bastion_core::wire::RawFilter> {
        (0u32..5, 0u32..4, ".*", ".*").prop_map(|(header_type, match_type, key, value)| {
            bastion_core::wire::RawFilter {
                header_type,
                match_type,
                key,
                value,
            }
        })
    }

    fn arb_rule() -> impl Strategy<Value = Rule> {
        (
            0u32..=9,
            0u32..4,
            prop::collection::vec(arb_target(), 0..4),
            prop::collection::vec(arb_filter(), 0..4),
        )
            .prop_map(|(op, action, targets, filters)| {
                let raw = bastion_core::wire::RawRecord {
                    operation: op,
                    action,
                    filters,
                    targets: targets
                        .into_iter()
                        .map(|t| bastion_core::wire::RawTarget {
                            role: t.role().map_or(0, Role::code),
                            keys: t.keys().to_vec(),
                        })
                        .collect(),
                };
                Rule::from_raw(&raw, DecodeMode::Lenient).unwrap()
            })
    }

    fn arb_table() -> impl Strategy<Value = PolicyTable> {
        (
            prop::option::of((any::<u32>(), any::<u32>())),
            prop::option::of(any::<[u8; 32]>()),
            prop::collection::vec(arb_rule(), 0..6),
        )
            .prop_map(|(version, container, rules)| PolicyTable {
                version: version.map(|(major, minor)| Version::new(major, minor)),
                container: container.map(ContainerId::from_bytes),
                rules,
            })
    }

    proptest::proptest! {
        #[test]
        fn prop_table_roundtrip(table in arb_table()) {
            let from_bin = PolicyTable::from_binary(&table.to_binary().unwrap()).unwrap();
            prop_assert_eq!(&from_bin, &table);

            let from_json = PolicyTable::from_json(&table.to_json().unwrap()).unwrap();
            prop_assert_eq!(&from_json, &table);
        }
    }
}
