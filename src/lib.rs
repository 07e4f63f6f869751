//! # sieve
//!
//! A declarative, extensible data-validation engine: given a record of input
//! values and a per-field specification of constraints, it determines which
//! fields violate which constraints and produces a structured,
//! human-readable error report.
//!
//! ## Features
//!
//! - Compact rule grammar: `"required|string|max:20"`, ordered lists, or
//!   structured [`RuleDef`]s
//! - Conditional rule injection via the `sometimes` directive and
//!   [`Validator::sometimes`] closures
//! - Concurrent-but-ordered execution: fields validate independently while
//!   each field's own constraints run in strict declaration order
//! - Two-tier message resolution (`"field.rule"` > `"rule"` > shape-dispatched
//!   defaults) with placeholder replacers (`:attribute`, `:min`, `:max`, ...)
//! - Sync and async custom rules, custom replacers, and a pluggable error
//!   handler, all threaded through an explicit [`Config`]
//!
//! ## Example
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use sieve::{Error, Rules, Validator};
//! use serde_json::json;
//!
//! let data = sieve::record(json!({"email": "not-an-email", "age": "200"}));
//! let rules = Rules::new()
//!     .field("email", "required|email")
//!     .field("age", "integer|max:130");
//!
//! let mut validator = Validator::new(data, rules);
//! match validator.validate().await {
//!     Err(Error::Invalid(report)) => {
//!         assert_eq!(report.status, 400);
//!         assert!(report.failures.contains_key("email"));
//!         assert!(report.failures.contains_key("age"));
//!     }
//!     other => panic!("expected a validation failure, got {other:?}"),
//! }
//! # }
//! ```

mod config;
mod error;
mod message;
mod replacer;
mod rule;
mod rules;
mod schema;
mod validator;
mod value;

pub use config::{Config, ConfigBuilder, ErrorHandler, Factory};
pub use error::{Error, Failure, FailureMap, ValidationError};
pub use message::{MessageSpec, Messages};
pub use replacer::{humanize, replace_arg, replace_joined, Replacer};
pub use rule::{rule_fn, Rule, RuleContext, Verdict};
pub use schema::{Constraint, FieldRules, RuleDef, Rules};
pub use validator::{Condition, FieldNames, Validator};
pub use value::{get_path, record, set_path, Record};

/// Everything needed for typical use.
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder, Factory};
    pub use crate::error::{Error, Failure, FailureMap, ValidationError};
    pub use crate::message::{MessageSpec, Messages};
    pub use crate::rule::{rule_fn, Rule, RuleContext, Verdict};
    pub use crate::schema::{FieldRules, RuleDef, Rules};
    pub use crate::validator::Validator;
    pub use crate::value::{record, Record};
}
