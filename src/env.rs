//! Where environment variables come from.
//!
//! [`EnvProvider`](crate::EnvProvider) and [`Settings::from_env`](crate::Settings::from_env)
//! read through an [`Env`], either the process environment or a fixed set of
//! variables supplied by the caller.

use std::collections::HashMap;
use std::ffi::OsString;

/// Result of looking up one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Not defined at all.
    Unset,
    /// Defined with an empty (or all-whitespace) value, as in `PORT=`.
    Empty,
    Value(String),
    /// Defined, but the bytes are not valid UTF-8.
    NotUnicode(OsString),
}

impl Lookup {
    /// The value, when there is a usable one.
    pub fn value(&self) -> Option<&str> {
        match self {
            Lookup::Value(value) => Some(value),
            _ => None,
        }
    }

    fn of(value: String) -> Self {
        if value.trim().is_empty() {
            Lookup::Empty
        } else {
            Lookup::Value(value)
        }
    }
}

/// Source of environment variables.
#[derive(Clone, Debug, Default)]
pub struct Env {
    fixed: Option<HashMap<String, String>>,
}

impl Env {
    /// The variables of the running process.
    pub fn process() -> Self {
        Self { fixed: None }
    }

    /// Exactly `vars`; the process environment is never consulted.
    pub fn from_vars(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            fixed: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    pub fn lookup(&self, name: &str) -> Lookup {
        match &self.fixed {
            Some(vars) => vars.get(name).cloned().map_or(Lookup::Unset, Lookup::of),
            None => match std::env::var(name) {
                Ok(value) => Lookup::of(value),
                Err(std::env::VarError::NotPresent) => Lookup::Unset,
                Err(std::env::VarError::NotUnicode(raw)) => Lookup::NotUnicode(raw),
            },
        }
    }
}
