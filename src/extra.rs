//! Structured extra fields that can be attached to a single log call.
//!
//! Extra fields are an ordered mapping from string keys to [`ExtraValue`]s. The
//! [`ExtraFieldsFormatter`](crate::ExtraFieldsFormatter) renders them as trailing JSON:
//!
//! ```rust
//! use ds_common_logger::{extra, ExtraFields};
//!
//! let fields: ExtraFields = extra! { "user" => "alice", "attempt" => 3 };
//! assert_eq!(fields.render(), r#"{"user": "alice", "attempt": 3}"#);
//! ```
//!
//! [`ExtraFields::render`] is the pure serialization function used by the formatter.
//! It produces JSON, with the spacing of `{"k": "v", "n": 42}`, and keeps the insertion order
//! of the keys. If the fields cannot be represented as JSON (which is the case for non-finite
//! floats), it falls back to the textual representation given by the `Display` implementation.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::Write;

/// A single value of an extra field.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraValue {
    /// A string.
    Str(String),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer that does not fit into an `i64`.
    UInt(u64),
    /// A float; non-finite values cannot be rendered as JSON.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// No value.
    Null,
    /// A sequence of values.
    List(Vec<ExtraValue>),
    /// A nested mapping.
    Map(ExtraFields),
}

impl ExtraValue {
    /// Converts any serializable value, e.g. a struct with `#[derive(Serialize)]`.
    ///
    /// Values that `serde_json` cannot represent are converted to their error text.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => v.into(),
            Err(e) => ExtraValue::Str(format!("<unserializable: {e}>")),
        }
    }
}

impl Serialize for ExtraValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ExtraValue::Str(s) => serializer.serialize_str(s),
            ExtraValue::Int(n) => serializer.serialize_i64(*n),
            ExtraValue::UInt(n) => serializer.serialize_u64(*n),
            ExtraValue::Float(f) => {
                if f.is_finite() {
                    serializer.serialize_f64(*f)
                } else {
                    Err(S::Error::custom(format!("{f} is not a valid JSON number")))
                }
            }
            ExtraValue::Bool(b) => serializer.serialize_bool(*b),
            ExtraValue::Null => serializer.serialize_unit(),
            ExtraValue::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            ExtraValue::Map(fields) => fields.serialize(serializer),
        }
    }
}

// The fallback representation resembles a dict literal: strings in single quotes,
// `True`/`False`/`None`, floats always with a fractional part.
impl fmt::Display for ExtraValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtraValue::Str(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
            ExtraValue::Int(n) => write!(f, "{n}"),
            ExtraValue::UInt(n) => write!(f, "{n}"),
            ExtraValue::Float(x) => {
                if x.is_nan() {
                    f.write_str("nan")
                } else if x.is_infinite() {
                    f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
                } else if x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            ExtraValue::Bool(true) => f.write_str("True"),
            ExtraValue::Bool(false) => f.write_str("False"),
            ExtraValue::Null => f.write_str("None"),
            ExtraValue::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            ExtraValue::Map(fields) => write!(f, "{fields}"),
        }
    }
}

impl From<&str> for ExtraValue {
    fn from(s: &str) -> Self {
        ExtraValue::Str(s.to_string())
    }
}
impl From<String> for ExtraValue {
    fn from(s: String) -> Self {
        ExtraValue::Str(s)
    }
}
impl From<&String> for ExtraValue {
    fn from(s: &String) -> Self {
        ExtraValue::Str(s.clone())
    }
}
impl From<bool> for ExtraValue {
    fn from(b: bool) -> Self {
        ExtraValue::Bool(b)
    }
}
impl From<f64> for ExtraValue {
    fn from(f: f64) -> Self {
        ExtraValue::Float(f)
    }
}
impl From<f32> for ExtraValue {
    fn from(f: f32) -> Self {
        ExtraValue::Float(f64::from(f))
    }
}

macro_rules! from_lossless {
    ($($t:ty),*) => {$(
        impl From<$t> for ExtraValue {
            fn from(n: $t) -> Self {
                ExtraValue::Int(i64::from(n))
            }
        }
    )*};
}
from_lossless!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ExtraValue {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(ExtraValue::UInt(n), ExtraValue::Int)
    }
}
impl From<usize> for ExtraValue {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(ExtraValue::UInt(n as u64), ExtraValue::Int)
    }
}
impl From<isize> for ExtraValue {
    fn from(n: isize) -> Self {
        ExtraValue::Int(n as i64)
    }
}

impl<T: Into<ExtraValue>> From<Option<T>> for ExtraValue {
    fn from(o: Option<T>) -> Self {
        o.map_or(ExtraValue::Null, Into::into)
    }
}
impl<T: Into<ExtraValue>> From<Vec<T>> for ExtraValue {
    fn from(v: Vec<T>) -> Self {
        ExtraValue::List(v.into_iter().map(Into::into).collect())
    }
}
impl From<ExtraFields> for ExtraValue {
    fn from(fields: ExtraFields) -> Self {
        ExtraValue::Map(fields)
    }
}

impl From<serde_json::Value> for ExtraValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ExtraValue::Null,
            serde_json::Value::Bool(b) => ExtraValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ExtraValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ExtraValue::UInt(u)
                } else {
                    ExtraValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => ExtraValue::Str(s),
            serde_json::Value::Array(values) => {
                ExtraValue::List(values.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => ExtraValue::Map(map.into_iter().collect()),
        }
    }
}

/// Ordered mapping of extra fields.
///
/// Keys keep their insertion order; inserting an existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraFields(Vec<(String, ExtraValue)>);

impl ExtraFields {
    /// An empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder-style [`ExtraFields::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a field, returning the previous value of the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ExtraValue>,
    ) -> Option<ExtraValue> {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(std::mem::replace(&mut slot.1, value))
        } else {
            self.0.push((key, value));
            None
        }
    }

    /// Removes a field.
    pub fn remove(&mut self, key: &str) -> Option<ExtraValue> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ExtraValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtraValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serializes the fields as JSON, or, if that fails, returns their textual representation.
    ///
    /// This never fails.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_json().unwrap_or_else(|_| self.to_string())
    }

    /// Serializes the fields as JSON with `": "` and `", "` as separators.
    ///
    /// # Errors
    ///
    /// `serde_json::Error` if some value cannot be represented in JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::with_capacity(64);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)?;
        // serde_json only produces valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Serialize for ExtraFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl fmt::Display for ExtraFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {v}", ExtraValue::Str(k.clone()))?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<ExtraValue>> FromIterator<(K, V)> for ExtraFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = ExtraFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl<K: Into<String>, V: Into<ExtraValue>> Extend<(K, V)> for ExtraFields {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for ExtraFields {
    type Item = (String, ExtraValue);
    type IntoIter = std::vec::IntoIter<(String, ExtraValue)>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Compact JSON, but with a blank after `:` and `,`.
struct SpacedFormatter;
impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Builds [`ExtraFields`] from `key => value` pairs.
///
/// ```rust
/// let fields = ds_common_logger::extra! { "k" => "v", "n" => 42 };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! extra {
    () => {
        $crate::ExtraFields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::ExtraFields::new();
        $( fields.insert($key, $value); )+
        fields
    }};
}
