//! BASTION Extended ACL
//!
//! Ordered allow/deny rule tables for object operations and the decision
//! procedure that evaluates them. The first rule matching the operation,
//! the requester and every header filter decides; a table with no matching
//! rule stays silent.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod eval;
pub mod filter;
mod matcher;
pub mod rule;
pub mod table;
pub mod target;
pub mod types;

pub use error::{AccessError, DecodeError, EvalError, RuleError};
pub use eval::{AccessRequest, Decision, EvalConfig, ServiceFilterMode};
pub use filter::{Filter, Header, RequestMetadata};
pub use rule::Rule;
pub use table::PolicyTable;
pub use target::RuleTarget;
pub use types::{Action, HeaderScope, Matcher, Op, Role};
