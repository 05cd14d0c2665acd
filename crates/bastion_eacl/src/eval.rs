//! Access decision procedure.

use crate::error::{AccessError, EvalError};
use crate::filter::RequestMetadata;
use crate::matcher::{match_all_filters, match_any_target};
use crate::table::PolicyTable;
use crate::types::{Action, Op, Role};
use bastion_core::PublicKey;
use serde::{Deserialize, Serialize};

/// Treatment of service-scoped filters, which are never evaluated.
///
/// In both modes the first service filter ends the filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceFilterMode {
    /// Every declared filter must hold, so a rule with a service filter
    /// never matches
    #[default]
    Unsatisfied,
    /// The rule matches when every filter examined before the service
    /// filter held
    ShortCircuit,
}

/// Configuration of the evaluator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Service filter treatment
    pub service_filters: ServiceFilterMode,
}

impl EvalConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set service filter treatment
    #[must_use]
    pub fn with_service_filters(mut self, mode: ServiceFilterMode) -> Self {
        self.service_filters = mode;
        self
    }
}

/// Description of one request to authorize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    /// Requester public key
    pub key: Option<PublicKey>,
    /// Requester role
    pub role: Role,
    /// Requested operation
    pub op: Op,
    /// Request and object headers
    pub meta: RequestMetadata,
}

impl AccessRequest {
    /// Request without key or headers
    #[must_use]
    pub fn new(op: Op, role: Role) -> Self {
        Self {
            key: None,
            role,
            op,
            meta: RequestMetadata::default(),
        }
    }

    /// Set the requester key
    #[must_use]
    pub fn with_key(mut self, key: PublicKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Set request metadata
    #[must_use]
    pub fn with_meta(mut self, meta: RequestMetadata) -> Self {
        self.meta = meta;
        self
    }
}

/// Outcome of a successful evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// A matching rule allows the operation
    Allow,
    /// A matching rule denies the operation
    Deny,
    /// No rule applies; the table is silent
    NoRuleMatched,
}

impl Decision {
    /// Whether the operation is allowed
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Map the decision to a result, failing on anything but Allow
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Denied`] or [`AccessError::RuleNotFound`]
    pub fn ensure_allowed(self) -> Result<(), AccessError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(AccessError::Denied),
            Self::NoRuleMatched => Err(AccessError::RuleNotFound),
        }
    }
}

impl PolicyTable {
    /// Evaluate the table for a request with the default configuration
    ///
    /// # Errors
    ///
    /// Returns error if the request has no key or a candidate rule holds an
    /// unsupported action, matcher or header type
    pub fn check_access(&self, request: &AccessRequest) -> Result<Decision, EvalError> {
        self.check_access_with(&EvalConfig::default(), request)
    }

    /// Evaluate the table for a request.
    ///
    /// Rules are scanned in order. A rule applies when its operation equals
    /// the requested one, any of its targets selects the requester and all
    /// of its filters hold. The first applicable rule decides.
    ///
    /// # Errors
    ///
    /// Returns error if the request has no key or a candidate rule holds an
    /// unsupported action, matcher or header type
    pub fn check_access_with(
        &self,
        config: &EvalConfig,
        request: &AccessRequest,
    ) -> Result<Decision, EvalError> {
        let key = request.key.as_ref().ok_or(EvalError::MissingRequesterKey)?;

        for (i, rule) in self.rules().iter().enumerate() {
            if !rule.operation().is_known() || rule.operation() != request.op {
                continue;
            }

            if !match_any_target(rule.targets(), request.role, key.as_bytes()) {
                tracing::trace!(rule = i, "subject mismatch");
                continue;
            }

            let filters_hold = match_all_filters(
                i,
                rule.filters(),
                &request.meta,
                config.service_filters,
            )
            .inspect_err(|err| tracing::warn!(%err, "access evaluation aborted"))?;

            if !filters_hold {
                tracing::trace!(rule = i, "header filters mismatch");
                continue;
            }

            let decision = match rule.action() {
                Action::Allow => Decision::Allow,
                Action::Deny => Decision::Deny,
                Action::Unknown(code) => {
                    let err = EvalError::UnsupportedAction { rule: i, code };
                    tracing::warn!(%err, "access evaluation aborted");
                    return Err(err);
                }
            };

            tracing::debug!(rule = i, op = %request.op, role = %request.role, ?decision, "rule matched");
            return Ok(decision);
        }

        tracing::debug!(op = %request.op, role = %request.role, "no rule matched");
        Ok(Decision::NoRuleMatched)
    }
}
