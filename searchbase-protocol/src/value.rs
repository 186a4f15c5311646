//! Dynamic JSON value representation.
//!
//! [`DynamicValue`] is a tagged union over the six JSON value kinds. It is the
//! payload type for opaque query fields (filter values) and schemaless result
//! records, where the server's field shapes are not known at compile time.
//!
//! Serialization is hand-written rather than derived so that variant
//! discrimination is driven by the JSON token type: the deserializer's visitor
//! callbacks decide the variant, which means `true` always becomes
//! [`DynamicValue::Bool`] and `"true"` always becomes [`DynamicValue::String`].
//!
//! # Round-trip
//!
//! For any value produced by [`DynamicValue::decode`],
//! `decode(encode(v)?) == v` holds structurally. Numbers are carried as `f64`,
//! so integral inputs may re-encode with a normalized representation
//! (`1` vs `1.0`) while remaining numerically equal.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ValueError};

/// An arbitrary JSON value.
///
/// Immutable tree: construct once, read via the `as_*` accessors. Mapping keys
/// are unique; key order is not significant for equality.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DynamicValue {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// JSON number, carried as a double.
    Number(f64),
    /// JSON string.
    String(String),
    /// JSON array.
    Sequence(Vec<DynamicValue>),
    /// JSON object.
    Mapping(BTreeMap<String, DynamicValue>),
}

impl DynamicValue {
    /// Parse JSON text into a dynamic value.
    ///
    /// Fails with [`ValueError::MalformedPayload`] if the text is not
    /// well-formed JSON.
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode this value as JSON text.
    ///
    /// Total over all six variants except for non-finite numbers, which fail
    /// with [`ValueError::UnencodableNumber`].
    pub fn encode(&self) -> Result<String> {
        self.check_encodable()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Verify that every number in this tree is finite.
    pub fn check_encodable(&self) -> Result<()> {
        match self {
            DynamicValue::Number(n) if !n.is_finite() => {
                Err(ValueError::UnencodableNumber(*n))
            }
            DynamicValue::Sequence(items) => {
                items.iter().try_for_each(Self::check_encodable)
            }
            DynamicValue::Mapping(entries) => {
                entries.values().try_for_each(Self::check_encodable)
            }
            _ => Ok(()),
        }
    }

    /// Convert an already-parsed [`serde_json::Value`] into a dynamic value.
    ///
    /// Fails with [`ValueError::UnsupportedNativeType`] if a number cannot be
    /// represented as a finite `f64`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(match value {
            serde_json::Value::Null => DynamicValue::Null,
            serde_json::Value::Bool(b) => DynamicValue::Bool(b),
            serde_json::Value::Number(n) => {
                let f = n
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| ValueError::UnsupportedNativeType(n.to_string()))?;
                DynamicValue::Number(f)
            }
            serde_json::Value::String(s) => DynamicValue::String(s),
            serde_json::Value::Array(items) => DynamicValue::Sequence(
                items.into_iter().map(Self::from_json).collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(entries) => DynamicValue::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((k, Self::from_json(v)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// True if this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload, if this is a `Number`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DynamicValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The element list, if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&[DynamicValue]> {
        match self {
            DynamicValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The entry map, if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match self {
            DynamicValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key in a `Mapping`; `None` for other variants or missing keys.
    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.as_mapping().and_then(|entries| entries.get(key))
    }
}

impl Serialize for DynamicValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DynamicValue::Null => serializer.serialize_unit(),
            DynamicValue::Bool(b) => serializer.serialize_bool(*b),
            DynamicValue::Number(n) => {
                if !n.is_finite() {
                    return Err(S::Error::custom(format!(
                        "non-finite number cannot be encoded as JSON: {n}"
                    )));
                }
                serializer.serialize_f64(*n)
            }
            DynamicValue::String(s) => serializer.serialize_str(s),
            DynamicValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DynamicValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DynamicValue {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct DynamicValueVisitor;

        impl<'de> Visitor<'de> for DynamicValueVisitor {
            type Value = DynamicValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("any JSON value")
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::Null)
            }

            fn visit_some<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> std::result::Result<Self::Value, D::Error> {
                DynamicValue::deserialize(deserializer)
            }

            fn visit_bool<E>(self, v: bool) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::Number(v as f64))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::Number(v as f64))
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::Number(v))
            }

            fn visit_str<E: serde::de::Error>(
                self,
                v: &str,
            ) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::String(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Self::Value, E> {
                Ok(DynamicValue::String(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(DynamicValue::Sequence(items))
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = BTreeMap::new();
                while let Some((key, value)) = map.next_entry::<String, DynamicValue>()? {
                    entries.insert(key, value);
                }
                Ok(DynamicValue::Mapping(entries))
            }
        }

        deserializer.deserialize_any(DynamicValueVisitor)
    }
}

impl From<bool> for DynamicValue {
    fn from(v: bool) -> Self {
        DynamicValue::Bool(v)
    }
}

impl From<i32> for DynamicValue {
    fn from(v: i32) -> Self {
        DynamicValue::Number(v as f64)
    }
}

impl From<i64> for DynamicValue {
    fn from(v: i64) -> Self {
        DynamicValue::Number(v as f64)
    }
}

impl From<u32> for DynamicValue {
    fn from(v: u32) -> Self {
        DynamicValue::Number(v as f64)
    }
}

impl From<f32> for DynamicValue {
    fn from(v: f32) -> Self {
        DynamicValue::Number(v as f64)
    }
}

impl From<f64> for DynamicValue {
    fn from(v: f64) -> Self {
        DynamicValue::Number(v)
    }
}

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        DynamicValue::String(v.to_owned())
    }
}

impl From<String> for DynamicValue {
    fn from(v: String) -> Self {
        DynamicValue::String(v)
    }
}

impl From<Vec<DynamicValue>> for DynamicValue {
    fn from(v: Vec<DynamicValue>) -> Self {
        DynamicValue::Sequence(v)
    }
}

impl From<BTreeMap<String, DynamicValue>> for DynamicValue {
    fn from(v: BTreeMap<String, DynamicValue>) -> Self {
        DynamicValue::Mapping(v)
    }
}

impl<T: Into<DynamicValue>> From<Option<T>> for DynamicValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(DynamicValue::Null)
    }
}
