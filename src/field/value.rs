//! Leaf values: the slots providers write into.
//!
//! Providers deliver either text (flags, env vars, `default` tags) or a
//! document node (JSON / YAML / TOML files). Every leaf type accepts both.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::BuildHasher;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use super::{Field, FieldMut};
use crate::error::ValueError;

/// Document node handed to [`Value::set_json`].
pub use serde_json::Value as Json;

/// Separator between items in the text form of lists and maps.
pub const ITEM_SEPARATOR: char = ',';

/// Separator between key and value in the text form of maps.
pub const ENTRY_SEPARATOR: char = '=';

/// A leaf field's storage.
pub trait Value {
    /// Human-readable name of the stored type.
    fn value_type(&self) -> &'static str;

    /// Parse `raw` and store the result.
    fn set_str(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Convert a document node and store the result.
    fn set_json(&mut self, value: &Json) -> Result<(), ValueError>;

    /// Whether presence alone means "on" (boolean switches on the command line).
    fn is_switch(&self) -> bool {
        false
    }
}

/// A single value that can be read from text or from a document node.
///
/// Lists and maps of scalars are leaf values too. Implement it for your own
/// types with [`scalar_value!`](crate::scalar_value) when they are
/// `FromStr + Deserialize`.
pub trait Scalar: Sized {
    const TYPE: &'static str;
    const SWITCH: bool = false;

    fn parse_text(raw: &str) -> Result<Self, ValueError>;

    fn from_json(value: &Json) -> Result<Self, ValueError>;
}

#[doc(hidden)]
pub fn parse_from_str<T>(raw: &str, type_name: &'static str) -> Result<T, ValueError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|e| ValueError::parse(raw, type_name, e))
}

/// Deserialize `value`, falling back to text parsing for string nodes
/// so that `port: "8080"` still fills a `u16`.
#[doc(hidden)]
pub fn deserialize_json<T>(value: &Json, type_name: &'static str) -> Result<T, ValueError>
where
    T: DeserializeOwned + FromStr,
    T::Err: Display,
{
    match T::deserialize(value) {
        Ok(parsed) => Ok(parsed),
        Err(err) => match value.as_str() {
            Some(text) => parse_from_str(text, type_name),
            None => Err(ValueError::convert(value, type_name, err)),
        },
    }
}

/// Implement [`Scalar`] and the leaf traits for `FromStr + Deserialize` types.
#[macro_export]
macro_rules! scalar_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::field::value::Scalar for $ty {
            const TYPE: &'static str = stringify!($ty);

            fn parse_text(raw: &str) -> ::std::result::Result<Self, $crate::ValueError> {
                $crate::field::value::parse_from_str(raw, <Self as $crate::field::value::Scalar>::TYPE)
            }

            fn from_json(value: &$crate::field::value::Json) -> ::std::result::Result<Self, $crate::ValueError> {
                $crate::field::value::deserialize_json(value, <Self as $crate::field::value::Scalar>::TYPE)
            }
        }

        $crate::leaf_value!($ty);
    )+};
}

/// Implement [`Value`] and [`Field`] for a [`Scalar`] type, so that both
/// `T` and `Option<T>` can be used as leaf fields.
#[macro_export]
macro_rules! leaf_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::field::Value for $ty {
            fn value_type(&self) -> &'static str {
                <$ty as $crate::field::value::Scalar>::TYPE
            }

            fn set_str(&mut self, raw: &str) -> ::std::result::Result<(), $crate::ValueError> {
                *self = <$ty as $crate::field::value::Scalar>::parse_text(raw)?;
                Ok(())
            }

            fn set_json(&mut self, value: &$crate::field::value::Json) -> ::std::result::Result<(), $crate::ValueError> {
                *self = <$ty as $crate::field::value::Scalar>::from_json(value)?;
                Ok(())
            }

            fn is_switch(&self) -> bool {
                <$ty as $crate::field::value::Scalar>::SWITCH
            }
        }

        impl $crate::field::Field for $ty {
            fn as_field_mut(&mut self) -> $crate::field::FieldMut<'_> {
                $crate::field::FieldMut::Leaf(self)
            }
        }

        impl $crate::field::OptionField for $ty {
            fn option_field(slot: &mut ::std::option::Option<Self>) -> $crate::field::FieldMut<'_> {
                $crate::field::FieldMut::Leaf(slot)
            }
        }
    )+};
}

crate::scalar_value!(
    String, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr,
);

impl Scalar for bool {
    const TYPE: &'static str = "bool";
    const SWITCH: bool = true;

    fn parse_text(raw: &str) -> Result<Self, ValueError> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ValueError::parse(
                raw,
                Self::TYPE,
                "expected one of true, false, 1, 0, yes, no, on, off",
            )),
        }
    }

    fn from_json(value: &Json) -> Result<Self, ValueError> {
        match value {
            Json::Bool(b) => Ok(*b),
            Json::String(text) => Self::parse_text(text),
            other => Err(ValueError::convert(other, Self::TYPE, "expected a boolean")),
        }
    }
}

crate::leaf_value!(bool);

impl<T: Scalar> Value for Option<T> {
    fn value_type(&self) -> &'static str {
        T::TYPE
    }

    fn set_str(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = Some(T::parse_text(raw)?);
        Ok(())
    }

    fn set_json(&mut self, value: &Json) -> Result<(), ValueError> {
        *self = match value {
            Json::Null => None,
            other => Some(T::from_json(other)?),
        };
        Ok(())
    }

    fn is_switch(&self) -> bool {
        T::SWITCH
    }
}

fn split_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(ITEM_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn parse_list<T: Scalar>(raw: &str) -> Result<Vec<T>, ValueError> {
    split_items(raw).map(T::parse_text).collect()
}

fn list_from_json<T: Scalar>(value: &Json) -> Result<Vec<T>, ValueError> {
    match value {
        Json::Array(items) => items.iter().map(T::from_json).collect(),
        Json::String(text) => parse_list(text),
        Json::Null => Ok(Vec::new()),
        other => Err(ValueError::convert(other, "list", "expected an array")),
    }
}

fn parse_entries<T: Scalar>(raw: &str) -> Result<Vec<(String, T)>, ValueError> {
    split_items(raw)
        .map(|entry| {
            let (key, value) = entry.split_once(ENTRY_SEPARATOR).ok_or_else(|| {
                ValueError::parse(entry, "map entry", "expected `key=value`")
            })?;
            Ok((key.trim().to_string(), T::parse_text(value.trim())?))
        })
        .collect()
}

fn entries_from_json<T: Scalar>(value: &Json) -> Result<Vec<(String, T)>, ValueError> {
    match value {
        Json::Object(map) => map
            .iter()
            .map(|(key, item)| Ok((key.clone(), T::from_json(item)?)))
            .collect(),
        Json::String(text) => parse_entries(text),
        Json::Null => Ok(Vec::new()),
        other => Err(ValueError::convert(other, "map", "expected an object")),
    }
}

impl<T: Scalar> Value for Vec<T> {
    fn value_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn set_str(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = parse_list(raw)?;
        Ok(())
    }

    fn set_json(&mut self, value: &Json) -> Result<(), ValueError> {
        *self = list_from_json(value)?;
        Ok(())
    }
}

impl<T: Scalar> Field for Vec<T> {
    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Leaf(self)
    }
}

impl<T: Scalar, S: BuildHasher + Default> Value for HashMap<String, T, S> {
    fn value_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn set_str(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = parse_entries(raw)?.into_iter().collect();
        Ok(())
    }

    fn set_json(&mut self, value: &Json) -> Result<(), ValueError> {
        *self = entries_from_json(value)?.into_iter().collect();
        Ok(())
    }
}

impl<T: Scalar, S: BuildHasher + Default> Field for HashMap<String, T, S> {
    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Leaf(self)
    }
}

impl<T: Scalar, S: BuildHasher + Default> Value for IndexMap<String, T, S> {
    fn value_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn set_str(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = parse_entries(raw)?.into_iter().collect();
        Ok(())
    }

    fn set_json(&mut self, value: &Json) -> Result<(), ValueError> {
        *self = entries_from_json(value)?.into_iter().collect();
        Ok(())
    }
}

impl<T: Scalar, S: BuildHasher + Default> Field for IndexMap<String, T, S> {
    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Leaf(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_parse_text() {
        let mut port = 0u16;
        port.set_str("8080").unwrap();
        assert_eq!(port, 8080);

        let mut name = String::new();
        name.set_str(" spaced ").unwrap();
        assert_eq!(name, " spaced ");

        let mut ratio = 0.0f64;
        ratio.set_str("0.25").unwrap();
        assert_eq!(ratio, 0.25);

        let mut addr: Option<SocketAddr> = None;
        addr.set_str("127.0.0.1:9000").unwrap();
        assert_eq!(addr, Some("127.0.0.1:9000".parse().unwrap()));
    }

    #[test]
    fn scalar_parse_error_names_type() {
        let mut port = 0u16;
        let err = port.set_str("eighty").unwrap_err();
        assert!(err.to_string().contains("as u16"));
        assert_eq!(port, 0);
    }

    #[test]
    fn bool_accepts_common_spellings() {
        for raw in ["true", "1", "YES", "on"] {
            let mut flag = false;
            flag.set_str(raw).unwrap();
            assert!(flag, "{raw} should be true");
        }
        for raw in ["false", "0", "no", "Off"] {
            let mut flag = true;
            flag.set_str(raw).unwrap();
            assert!(!flag, "{raw} should be false");
        }
        let mut flag = false;
        assert!(flag.set_str("maybe").is_err());
        assert!(flag.is_switch());
        assert!(!0u8.is_switch());
    }

    #[test]
    fn json_numbers_and_numeric_strings() {
        let mut port = 0u16;
        port.set_json(&json!(8080)).unwrap();
        assert_eq!(port, 8080);
        port.set_json(&json!("9090")).unwrap();
        assert_eq!(port, 9090);
        assert!(port.set_json(&json!([1])).is_err());
        assert!(port.set_json(&json!(70000)).is_err());
    }

    #[test]
    fn option_null_clears() {
        let mut timeout: Option<u32> = Some(5);
        timeout.set_json(&Json::Null).unwrap();
        assert_eq!(timeout, None);
        timeout.set_json(&json!(30)).unwrap();
        assert_eq!(timeout, Some(30));
    }

    #[test]
    fn lists_from_text_and_arrays() {
        let mut hosts: Vec<String> = Vec::new();
        hosts.set_str("a, b,,c").unwrap();
        assert_eq!(hosts, vec!["a", "b", "c"]);

        let mut ports: Vec<u16> = Vec::new();
        ports.set_json(&json!([80, "443"])).unwrap();
        assert_eq!(ports, vec![80, 443]);

        ports.set_str("").unwrap();
        assert!(ports.is_empty());
        assert!(ports.set_json(&json!({"a": 1})).is_err());
    }

    #[test]
    fn maps_from_text_and_objects() {
        let mut limits: HashMap<String, u32> = HashMap::new();
        limits.set_str("read=10, write=2").unwrap();
        assert_eq!(limits.get("read"), Some(&10));
        assert_eq!(limits.get("write"), Some(&2));
        assert!(limits.set_str("broken").is_err());

        let mut ordered: IndexMap<String, String> = IndexMap::new();
        ordered.set_json(&json!({"z": "last", "a": "first"})).unwrap();
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered.get("a").map(String::as_str), Some("first"));
    }
}
