//! Provider trait and the built-in value sources.
//!
//! A provider is offered one leaf field at a time and either claims it
//! (writes a value), declines it, or reports that it recognized the field
//! but could not produce a valid value. Providers know nothing about each
//! other; the configurator's ordering is the only coordination.

pub mod default;
pub mod env;
pub mod file;
pub mod flag;

use std::fmt;

use crate::error::ValueError;
use crate::field::{FieldMeta, FieldPath, Value};

pub use default::DefaultProvider;
pub use env::EnvProvider;
pub use file::{FileProvider, Format};
pub use flag::FlagProvider;

/// Outcome of offering a field to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provided {
    /// The provider set the field.
    Claimed,
    /// The provider does not handle this field; try the next one.
    NotApplicable,
    /// The provider handles this field but its value is unusable.
    Failed(ValueError),
}

impl Provided {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Provided::Claimed)
    }
}

impl From<Result<(), ValueError>> for Provided {
    fn from(result: Result<(), ValueError>) -> Self {
        match result {
            Ok(()) => Provided::Claimed,
            Err(e) => Provided::Failed(e),
        }
    }
}

/// A source of field values.
pub trait Provider: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Try to set `value`, the storage of the leaf field described by `field` at `path`.
    fn provide(&self, field: &FieldMeta, value: &mut dyn Value, path: &FieldPath) -> Provided;
}

/// Provider backed by a closure. See [`from_fn`].
pub struct FnProvider<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a provider.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnProvider<F>
where
    F: Fn(&FieldMeta, &mut dyn Value, &FieldPath) -> Provided + Send + Sync,
{
    FnProvider {
        name: name.into(),
        f,
    }
}

impl<F> Provider for FnProvider<F>
where
    F: Fn(&FieldMeta, &mut dyn Value, &FieldPath) -> Provided + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn provide(&self, field: &FieldMeta, value: &mut dyn Value, path: &FieldPath) -> Provided {
        (self.f)(field, value, path)
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Tags;

    const PORT: FieldMeta = FieldMeta {
        name: "port",
        type_name: "u16",
        tags: Tags::EMPTY,
    };

    #[test]
    fn provided_from_result() {
        assert_eq!(Provided::from(Ok(())), Provided::Claimed);
        let err = ValueError::parse("x", "u16", "bad");
        assert_eq!(Provided::from(Err(err.clone())), Provided::Failed(err));
        assert!(Provided::Claimed.is_claimed());
        assert!(!Provided::NotApplicable.is_claimed());
    }

    #[test]
    fn fn_provider_delegates() {
        let provider = from_fn("fixed", |field: &FieldMeta, value: &mut dyn Value, _: &FieldPath| {
            if field.name == "port" {
                value.set_str("8080").into()
            } else {
                Provided::NotApplicable
            }
        });
        let mut port = 0u16;
        let path = FieldPath::from_segments(["port"]);
        assert_eq!(provider.provide(&PORT, &mut port, &path), Provided::Claimed);
        assert_eq!(port, 8080);
        assert_eq!(provider.name(), "fixed");
    }
}
