//! Error types shared by the configurator and the built-in providers.

use std::path::PathBuf;

use thiserror::Error;

use crate::field::{FieldPath, Tags};

/// Errors returned by [`Configurator`](crate::Configurator) and provider constructors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("providers not found: at least one provider is required")]
    NoProviders,

    #[error("not a struct: target of type `{type_name}` cannot be configured")]
    NotAStruct { type_name: &'static str },

    #[error("{} field(s) could not be set: {}", .0.len(), join_fields(.0))]
    Unresolved(Vec<FieldError>),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    ParseFile { path: PathBuf, message: String },

    #[error("invalid command line flags: {0}")]
    Flags(#[from] clap::Error),
}

impl ConfigError {
    /// The unresolved fields carried by this error, if any.
    pub fn unresolved(&self) -> &[FieldError] {
        match self {
            ConfigError::Unresolved(fields) => fields,
            _ => &[],
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A leaf field that the provider chain could not populate.
#[derive(Error, Debug)]
pub enum FieldError {
    /// No provider claimed the field.
    #[error("field [{path}] with tags [{tags}] cannot be set")]
    Unset { path: FieldPath, tags: Tags },

    /// A provider recognized the field but could not produce its value.
    #[error("field [{path}] with tags [{tags}] rejected by {provider}: {source}")]
    Invalid {
        path: FieldPath,
        tags: Tags,
        provider: String,
        source: ValueError,
    },
}

impl FieldError {
    pub fn path(&self) -> &FieldPath {
        match self {
            FieldError::Unset { path, .. } | FieldError::Invalid { path, .. } => path,
        }
    }
}

/// A raw value could not be converted into a field's type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("cannot parse {raw:?} as {type_name}: {reason}")]
    Parse {
        raw: String,
        type_name: &'static str,
        reason: String,
    },

    #[error("cannot convert {found} into {type_name}: {reason}")]
    Convert {
        found: String,
        type_name: &'static str,
        reason: String,
    },
}

impl ValueError {
    pub fn parse(raw: &str, type_name: &'static str, reason: impl ToString) -> Self {
        ValueError::Parse {
            raw: raw.to_string(),
            type_name,
            reason: reason.to_string(),
        }
    }

    pub fn convert(found: &serde_json::Value, type_name: &'static str, reason: impl ToString) -> Self {
        ValueError::Convert {
            found: found.to_string(),
            type_name,
            reason: reason.to_string(),
        }
    }
}
