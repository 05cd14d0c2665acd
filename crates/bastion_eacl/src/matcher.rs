//! Subject and header matching for a single rule.

use crate::error::EvalError;
use crate::eval::ServiceFilterMode;
use crate::filter::{Filter, Header, RequestMetadata};
use crate::target::RuleTarget;
use crate::types::{HeaderScope, Matcher, Role};

/// Any target selects the requester
pub(crate) fn match_any_target(targets: &[RuleTarget], role: Role, key: &[u8]) -> bool {
    targets.iter().any(|t| t.matches(role, key))
}

/// Whether the filters of one rule hold.
///
/// A filter holds when some header with the filter's key satisfies its
/// matcher; a missing header never satisfies it. The first service filter
/// ends the pass, and `mode` decides whether the filters after it count.
pub(crate) fn match_all_filters(
    rule: usize,
    filters: &[Filter],
    meta: &RequestMetadata,
    mode: ServiceFilterMode,
) -> Result<bool, EvalError> {
    let mut examined = 0usize;
    let mut matched = 0usize;

    for (i, filter) in filters.iter().enumerate() {
        let headers: &[Header] = match filter.scope() {
            HeaderScope::Request => meta.request_headers(),
            HeaderScope::Object => meta.object_headers(),
            HeaderScope::Service => break,
            HeaderScope::Unknown(code) => {
                return Err(EvalError::UnsupportedHeaderType {
                    rule,
                    filter: i,
                    code,
                })
            }
        };

        let equal = match filter.matcher() {
            Matcher::Equal => true,
            Matcher::NotEqual => false,
            Matcher::Unknown(code) => {
                return Err(EvalError::UnsupportedMatcher {
                    rule,
                    filter: i,
                    code,
                })
            }
        };

        examined += 1;

        let satisfied = headers
            .iter()
            .filter(|h| h.key() == filter.key())
            .any(|h| (h.value() == filter.value()) == equal);

        if satisfied {
            matched += 1;
        }
    }

    let required = match mode {
        ServiceFilterMode::Unsatisfied => filters.len(),
        ServiceFilterMode::ShortCircuit => examined,
    };

    Ok(matched == required)
}
