//! Type descriptors for configurable structs.
//!
//! A configurable struct hands each of its fields to a [`FieldVisitor`]
//! together with static [`FieldMeta`]. The field itself is exposed as a
//! [`FieldMut`]: a nested struct, an optional (boxed) struct that the walker
//! allocates on demand, or a leaf [`Value`] slot that providers write into.
//!
//! Implementations are normally generated by the [`configurable!`](crate::configurable)
//! macro; leaf implementations live in [`value`].

mod macros;
pub mod value;

use std::fmt;
use std::ops::ControlFlow;

pub use value::Value;

/// Static metadata of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Field identifier as declared.
    pub name: &'static str,
    /// Declared type, as written in the struct definition.
    pub type_name: &'static str,
    pub tags: Tags,
}

/// Key/value annotations attached to a field (`env = "PORT"`, `default = "8080"`).
///
/// The vocabulary belongs to providers; the walker only prints tags in
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tags(&'static [(&'static str, &'static str)]);

impl Tags {
    pub const EMPTY: Tags = Tags(&[]);

    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Tags(pairs)
    }

    /// Value of the first tag named `key`.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}:{value:?}")?;
        }
        Ok(())
    }
}

/// Field names from the root struct down to the current field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<&'static str>);

impl FieldPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: impl IntoIterator<Item = &'static str>) -> Self {
        Self(segments.into_iter().collect())
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.0
    }

    /// Name of the innermost field.
    pub fn leaf(&self) -> Option<&'static str> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, segment: &'static str) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Mutable view of one field, classified by how the walker treats it.
pub enum FieldMut<'a> {
    /// Nested struct, visited in place.
    Struct(&'a mut dyn Configurable),
    /// Optional boxed struct, allocated before it is visited.
    OptionalStruct(&'a mut dyn OptionalStruct),
    /// Anything else: offered to the provider chain.
    Leaf(&'a mut dyn Value),
}

/// Implemented by every type that can appear as a field of a configurable struct.
pub trait Field {
    fn as_field_mut(&mut self) -> FieldMut<'_>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A struct whose fields can be walked.
pub trait Configurable {
    fn struct_name(&self) -> &'static str;

    /// Hand every field, in declaration order, to `visitor`.
    ///
    /// Stops and returns `Break` as soon as the visitor does.
    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> ControlFlow<()>;
}

pub trait FieldVisitor {
    fn visit(&mut self, meta: &'static FieldMeta, field: FieldMut<'_>) -> ControlFlow<()>;
}

/// Storage for a struct that does not exist until the walk reaches it.
pub trait OptionalStruct {
    /// Replace the slot with a fresh default instance and return it.
    fn allocate(&mut self) -> &mut dyn Configurable;
}

impl<T: Configurable + Default> OptionalStruct for Option<Box<T>> {
    fn allocate(&mut self) -> &mut dyn Configurable {
        &mut **self.insert(Box::new(T::default()))
    }
}

/// Types that may sit inside an `Option` field.
///
/// Scalars make `Option<T>` a leaf; `Box<T>` of a configurable struct makes
/// it an optional struct that the walker allocates.
pub trait OptionField: Sized {
    fn option_field(slot: &mut Option<Self>) -> FieldMut<'_>;
}

impl<T: Configurable + Default> OptionField for Box<T> {
    fn option_field(slot: &mut Option<Self>) -> FieldMut<'_> {
        FieldMut::OptionalStruct(slot)
    }
}

impl<T: OptionField> Field for Option<T> {
    fn as_field_mut(&mut self) -> FieldMut<'_> {
        T::option_field(self)
    }
}
