//! Values from JSON, YAML and TOML documents.
//!
//! The document is read and parsed once, when the provider is built. Each
//! field names its location with a dotted key in the tag matching the
//! document format (`file_json = "server.port"`).

use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

use crate::constants::{KEY_PATH_SEPARATOR, TAG_FILE_JSON, TAG_FILE_TOML, TAG_FILE_YAML};
use crate::error::ConfigError;
use crate::field::value::Json;
use crate::field::{FieldMeta, FieldPath, Value};

use super::{Provided, Provider};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Format {
    Json,
    #[strum(to_string = "yaml", serialize = "yml")]
    Yaml,
    Toml,
}

impl Format {
    /// Tag that holds the key path for this format.
    pub fn tag(self) -> &'static str {
        match self {
            Format::Json => TAG_FILE_JSON,
            Format::Yaml => TAG_FILE_YAML,
            Format::Toml => TAG_FILE_TOML,
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    fn parse(self, content: &str) -> Result<Json, String> {
        match self {
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml_ng::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Sets fields from a parsed document.
#[derive(Debug, Clone)]
pub struct FileProvider {
    format: Format,
    source: PathBuf,
    document: Json,
}

impl FileProvider {
    /// Load `path`, picking the format from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path).ok_or_else(|| ConfigError::ParseFile {
            path: path.to_path_buf(),
            message: "unsupported file extension (expected json, yaml, yml or toml)".to_string(),
        })?;
        Self::load(format, path)
    }

    pub fn json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(Format::Json, path)
    }

    pub fn yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(Format::Yaml, path)
    }

    pub fn toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(Format::Toml, path)
    }

    /// Load `path` as a document in `format`.
    pub fn load(format: Format, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_at(format, &content, path.to_path_buf())
    }

    /// Parse an in-memory document.
    pub fn parse(format: Format, content: &str) -> Result<Self, ConfigError> {
        Self::parse_at(format, content, PathBuf::from(format!("<inline {format}>")))
    }

    fn parse_at(format: Format, content: &str, source: PathBuf) -> Result<Self, ConfigError> {
        let document = format.parse(content).map_err(|message| ConfigError::ParseFile {
            path: source.clone(),
            message,
        })?;
        Ok(Self {
            format,
            source,
            document,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Node at a dotted key path; numeric segments index into arrays.
    pub fn lookup(&self, key: &str) -> Option<&Json> {
        key.split(KEY_PATH_SEPARATOR)
            .try_fold(&self.document, |node, segment| match node {
                Json::Object(map) => map.get(segment),
                Json::Array(items) => items.get(segment.parse::<usize>().ok()?),
                _ => None,
            })
    }
}

impl Provider for FileProvider {
    fn name(&self) -> &str {
        self.format.tag()
    }

    fn provide(&self, field: &FieldMeta, value: &mut dyn Value, _path: &FieldPath) -> Provided {
        let Some(key) = field.tags.get(self.format.tag()) else {
            return Provided::NotApplicable;
        };
        match self.lookup(key) {
            Some(node) => value.set_json(node).into(),
            None => Provided::NotApplicable,
        }
    }
}
