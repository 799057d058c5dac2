//! Per-configurator behavior: logging and failure policy.
//!
//! `Settings` is a plain value owned by each [`Configurator`](super::Configurator)
//! and handed to the walk by reference, so two configurators never observe
//! each other's choices.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::constants::{ENV_FAIL_POLICY, ENV_LOGGING, LOG_TARGET};
use crate::env::Env;

/// What to do with a field no provider could set.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FailPolicy {
    /// Stop the walk at the first failing field.
    #[default]
    FailFast,
    /// Leave failing fields untouched, finish the walk and report every failure.
    Collect,
}

/// Diagnostic sink.
#[derive(Clone)]
pub struct Logger(Arc<dyn Fn(fmt::Arguments<'_>) + Send + Sync>);

impl Logger {
    pub fn new(f: impl Fn(fmt::Arguments<'_>) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Forward every line to `tracing` at debug level.
    pub fn tracing() -> Self {
        Self::new(|args| tracing::debug!(target: LOG_TARGET, "{args}"))
    }

    pub fn log(&self, args: fmt::Arguments<'_>) {
        (self.0)(args)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger(..)")
    }
}

/// Behavior flags for one configurator.
///
/// Readable from a config file (`logging`, `fail_policy`); the logger is
/// always the default one after deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: bool,
    pub fail_policy: FailPolicy,
    #[serde(skip)]
    pub logger: Logger,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: true,
            fail_policy: FailPolicy::FailFast,
            logger: Logger::default(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `FIELDWISE_LOGGING` and `FIELDWISE_FAIL_POLICY`.
    ///
    /// Invalid values are reported through the logger and ignored.
    pub fn from_env(env: &Env) -> Self {
        let mut settings = Self::default();
        settings.apply_env_vars(env);
        settings
    }

    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.lookup(ENV_LOGGING).value() {
            match val.to_lowercase().as_str() {
                "false" | "0" | "no" | "off" => self.logging = false,
                "true" | "1" | "yes" | "on" => self.logging = true,
                _ => self.logger.log(format_args!(
                    "configurator: ignoring invalid {ENV_LOGGING} value: {val}"
                )),
            }
        }
        if let Some(val) = env.lookup(ENV_FAIL_POLICY).value() {
            match val.parse::<FailPolicy>() {
                Ok(policy) => self.fail_policy = policy,
                Err(_) => self.logger.log(format_args!(
                    "configurator: ignoring invalid {ENV_FAIL_POLICY} value: {val}"
                )),
            }
        }
    }

    /// Emit one diagnostic line unless logging is disabled.
    pub(crate) fn log(&self, args: fmt::Arguments<'_>) {
        if self.logging {
            self.logger.log(args);
        }
    }
}
