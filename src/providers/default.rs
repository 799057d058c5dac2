//! Literal fallbacks from the `default` tag.

use crate::constants::TAG_DEFAULT;
use crate::field::{FieldMeta, FieldPath, Value};

use super::{Provided, Provider};

/// Sets a field from its `default = "..."` tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProvider;

impl DefaultProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for DefaultProvider {
    fn name(&self) -> &str {
        "default"
    }

    fn provide(&self, field: &FieldMeta, value: &mut dyn Value, _path: &FieldPath) -> Provided {
        match field.tags.get(TAG_DEFAULT) {
            Some(raw) => value.set_str(raw).into(),
            None => Provided::NotApplicable,
        }
    }
}
