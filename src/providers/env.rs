//! Environment variables named by the `env` tag.

use crate::constants::TAG_ENV;
use crate::env::{Env, Lookup};
use crate::error::ValueError;
use crate::field::{FieldMeta, FieldPath, Value};

use super::{Provided, Provider};

/// Sets a field from the environment variable named in its `env` tag.
///
/// An optional prefix is prepended to every name. With [`from_path`](Self::from_path)
/// untagged fields fall back to a name derived from their path
/// (`db.host` → `DB_HOST`).
///
/// A variable that is unset or blank (`PORT=`) leaves the field to later
/// providers.
#[derive(Debug, Clone, Default)]
pub struct EnvProvider {
    env: Env,
    prefix: String,
    from_path: bool,
}

impl EnvProvider {
    /// Read from the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from an explicit [`Env`].
    pub fn with_env(env: Env) -> Self {
        Self {
            env,
            ..Self::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn from_path(mut self) -> Self {
        self.from_path = true;
        self
    }

    /// Variable name consulted for a field, if any.
    pub fn var_name(&self, field: &FieldMeta, path: &FieldPath) -> Option<String> {
        match field.tags.get(TAG_ENV) {
            Some(name) if !name.is_empty() => Some(format!("{}{name}", self.prefix)),
            _ if self.from_path && !path.is_empty() => Some(format!(
                "{}{}",
                self.prefix,
                path.segments()
                    .iter()
                    .map(|segment| segment.to_uppercase())
                    .collect::<Vec<_>>()
                    .join("_")
            )),
            _ => None,
        }
    }
}

impl Provider for EnvProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn provide(&self, field: &FieldMeta, value: &mut dyn Value, path: &FieldPath) -> Provided {
        let Some(name) = self.var_name(field, path) else {
            return Provided::NotApplicable;
        };
        match self.env.lookup(&name) {
            Lookup::Value(raw) => value.set_str(&raw).into(),
            Lookup::NotUnicode(raw) => Provided::Failed(ValueError::parse(
                &raw.to_string_lossy(),
                value.value_type(),
                format!("{name} is not valid unicode"),
            )),
            Lookup::Unset | Lookup::Empty => Provided::NotApplicable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Tags;

    const HOST: FieldMeta = FieldMeta {
        name: "host",
        type_name: "String",
        tags: Tags::new(&[("env", "HOST")]),
    };

    const PORT: FieldMeta = FieldMeta {
        name: "port",
        type_name: "u16",
        tags: Tags::EMPTY,
    };

    #[test]
    fn reads_tagged_variable() {
        let provider = EnvProvider::with_env(Env::from_vars([("HOST", "db.local")]));
        let mut host = String::new();
        let path = FieldPath::from_segments(["db", "host"]);
        assert_eq!(provider.provide(&HOST, &mut host, &path), Provided::Claimed);
        assert_eq!(host, "db.local");
    }

    #[test]
    fn prefix_is_prepended() {
        let provider = EnvProvider::with_env(Env::from_vars([("APP_HOST", "prefixed")])).prefix("APP_");
        let mut host = String::new();
        assert!(provider.provide(&HOST, &mut host, &FieldPath::new()).is_claimed());
        assert_eq!(host, "prefixed");
    }

    #[test]
    fn unset_variable_is_not_applicable() {
        let provider = EnvProvider::with_env(Env::from_vars(Vec::<(&str, &str)>::new()));
        let mut host = String::from("kept");
        assert_eq!(
            provider.provide(&HOST, &mut host, &FieldPath::new()),
            Provided::NotApplicable
        );
        assert_eq!(host, "kept");
    }

    #[test]
    fn blank_variable_is_not_applicable() {
        let provider = EnvProvider::with_env(Env::from_vars([("HOST", ""), ("SERVER_PORT", " ")])).from_path();
        let mut host = String::from("kept");
        assert_eq!(
            provider.provide(&HOST, &mut host, &FieldPath::new()),
            Provided::NotApplicable
        );
        assert_eq!(host, "kept");

        let mut port = 0u16;
        let path = FieldPath::from_segments(["server", "port"]);
        assert_eq!(provider.provide(&PORT, &mut port, &path), Provided::NotApplicable);
    }

    #[test]
    fn untagged_field_needs_from_path() {
        let env = Env::from_vars([("SERVER_PORT", "9000")]);
        let path = FieldPath::from_segments(["server", "port"]);
        let mut port = 0u16;

        let plain = EnvProvider::with_env(env.clone());
        assert_eq!(plain.provide(&PORT, &mut port, &path), Provided::NotApplicable);

        let derived = EnvProvider::with_env(env).from_path();
        assert_eq!(derived.var_name(&PORT, &path).as_deref(), Some("SERVER_PORT"));
        assert_eq!(derived.provide(&PORT, &mut port, &path), Provided::Claimed);
        assert_eq!(port, 9000);
    }

    #[test]
    fn malformed_value_fails() {
        let provider = EnvProvider::with_env(Env::from_vars([("SERVER_PORT", "ninety")])).from_path();
        let path = FieldPath::from_segments(["server", "port"]);
        let mut port = 0u16;
        assert!(matches!(
            provider.provide(&PORT, &mut port, &path),
            Provided::Failed(_)
        ));
    }
}
