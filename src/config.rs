//! Engine configuration: the rule, message, and replacer registries plus the
//! pluggable error handler, threaded explicitly into every validator.
//!
//! There are no ambient global tables. A [`Factory`] shares one configuration
//! across many validators; registering a rule or replacer on the builder
//! affects every validator made from that configuration afterwards.

use crate::error::{Failure, FailureMap, ValidationError};
use crate::message::{self, MessageSpec};
use crate::replacer::{self, Replacer};
use crate::rule::{rule_fn, Rule, RuleContext, Verdict};
use crate::schema::Rules;
use crate::validator::Validator;
use crate::value::Record;
use crate::Error;
use std::collections::HashMap;
use std::sync::Arc;

/// Converts a non-empty failure map into the final error value.
pub type ErrorHandler = Arc<dyn Fn(FailureMap) -> ValidationError + Send + Sync>;

/// The four registries backing a validator.
pub struct Config {
    pub(crate) rules: HashMap<String, Arc<dyn Rule>>,
    pub(crate) messages: HashMap<String, MessageSpec>,
    pub(crate) replacers: HashMap<String, Replacer>,
    pub(crate) error_handler: ErrorHandler,
}

impl Config {
    /// The built-in tables and the default error handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder seeded with the built-in tables; explicit entries
    /// win over the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// The registered check for a rule name, if any.
    pub fn rule(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: crate::rules::defaults(),
            messages: message::defaults(),
            replacers: replacer::defaults(),
            error_handler: Arc::new(ValidationError::new),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rules", &self.rules.len())
            .field("messages", &self.messages.len())
            .field("replacers", &self.replacers.len())
            .finish()
    }
}

/// Builder over [`Config`]. Every setter overwrites any existing entry of
/// the same name, built-ins included - that is the extension point.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Seeds the builder with the built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or overrides) a rule check.
    pub fn rule(mut self, name: impl Into<String>, rule: impl Rule + 'static) -> Self {
        self.config.rules.insert(name.into(), Arc::new(rule));
        self
    }

    /// Registers a rule from a synchronous closure.
    pub fn rule_fn<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> Result<Verdict, Error> + Send + Sync + 'static,
    {
        self.config.rules.insert(name.into(), rule_fn(f));
        self
    }

    /// Sets (or overrides) a rule's default message template.
    pub fn message(mut self, rule: impl Into<String>, spec: impl Into<MessageSpec>) -> Self {
        self.config.messages.insert(rule.into(), spec.into());
        self
    }

    /// Registers (or overrides) a rule-specific placeholder replacer.
    pub fn replacer<F>(mut self, rule: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &mut Failure) + Send + Sync + 'static,
    {
        self.config.replacers.insert(rule.into(), Arc::new(f));
        self
    }

    /// Replaces the error handler collaborator.
    pub fn error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(FailureMap) -> ValidationError + Send + Sync + 'static,
    {
        self.config.error_handler = Arc::new(f);
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}

/// Shares one configuration across many validators.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use sieve::{Factory, Rules, Verdict};
///
/// let factory = Factory::configure(
///     sieve::Config::builder()
///         .rule_fn("equals_something", |ctx| {
///             Ok(Verdict::passed(ctx.value == Some(&"something".into())))
///         }),
/// );
///
/// let data = sieve::record(serde_json::json!({"field_1": "something"}));
/// let mut validator = factory.make(data, Rules::new().field("field_1", "equals_something|required"));
/// assert!(validator.validate().await.is_ok());
/// # }
/// ```
#[derive(Clone)]
pub struct Factory {
    config: Arc<Config>,
}

impl Factory {
    /// A factory over the built-in configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(Config::default()),
        }
    }

    /// A factory over a finished configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Shorthand for building the configuration and wrapping it.
    pub fn configure(builder: ConfigBuilder) -> Self {
        Self::with_config(builder.build())
    }

    /// The shared configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Makes a validator over this factory's configuration.
    pub fn make(&self, data: Record, rules: Rules) -> Validator {
        Validator::with_config(Arc::clone(&self.config), data, rules, Default::default())
    }

    /// Makes a validator with call-scoped message overrides.
    pub fn make_with_messages(
        &self,
        data: Record,
        rules: Rules,
        messages: crate::message::Messages,
    ) -> Validator {
        Validator::with_config(Arc::clone(&self.config), data, rules, messages)
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}
