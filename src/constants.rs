//! Crate-wide constants.
//!
//! Tag names understood by the built-in providers, environment variable
//! names, and the tracing target, kept in one place so a rename only
//! touches this file.

/// Tracing target used by the default logger.
pub const LOG_TARGET: &str = "fieldwise";

// ── Tag names ───────────────────────────────────────────────────────

/// Literal fallback value, parsed into the field's type.
pub const TAG_DEFAULT: &str = "default";

/// Environment variable name.
pub const TAG_ENV: &str = "env";

/// Command line flag: `name|default|usage`.
pub const TAG_FLAG: &str = "flag";

/// Dotted key into a JSON document.
pub const TAG_FILE_JSON: &str = "file_json";

/// Dotted key into a YAML document.
pub const TAG_FILE_YAML: &str = "file_yaml";

/// Dotted key into a TOML document.
pub const TAG_FILE_TOML: &str = "file_toml";

/// Separator between the parts of a `flag` tag.
pub const FLAG_PART_SEPARATOR: char = '|';

/// Separator between segments of a document key.
pub const KEY_PATH_SEPARATOR: char = '.';

// ── Environment variable names ──────────────────────────────────────

pub const ENV_LOGGING: &str = "FIELDWISE_LOGGING";
pub const ENV_FAIL_POLICY: &str = "FIELDWISE_FAIL_POLICY";
