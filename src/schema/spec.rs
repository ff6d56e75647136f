//! Schema input model.
//!
//! A [`Schema`] is plain data: a byte order plus an ordered list of
//! [`FieldSpec`]s. It can be built in code or exchanged as JSON, and is
//! compiled into a [`Layout`](crate::schema::Layout) exactly once per
//! distinct schema.
//!
//! # JSON form
//!
//! ```json
//! {
//!   "byte_order": "big_endian",
//!   "fields": [
//!     { "name": "magic", "type": "string", "count": 4,
//!       "default": "XSDP", "readonly": true },
//!     { "name": "correl_id", "type": "unsigned_long", "count": 1 }
//!   ]
//! }
//! ```
//!
//! Defaults are written as JSON scalars, strings, or arrays. String-field
//! defaults must be UTF-8 text in the JSON form.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ElementType, Value};

/// Byte order of a schema's multi-byte numeric fields.
///
/// Fixed at compile time. Single-byte and string fields are
/// order-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Most significant byte first (network order).
    #[serde(rename = "big_endian")]
    Big,
    /// Least significant byte first.
    #[serde(rename = "little_endian")]
    Little,
}

impl ByteOrder {
    /// The byte order of the machine running this process.
    pub fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// One field of a schema: name, element type, count, optional default,
/// optional read-only marker.
///
/// # Example
///
/// ```
/// use wirestruct::{ElementType, FieldSpec};
///
/// let magic = FieldSpec::new("magic", ElementType::Str, 4)
///     .with_default("XSDP")
///     .read_only();
/// let correl_id = FieldSpec::new("correl_id", ElementType::U32, 1);
/// assert!(magic.readonly && !correl_id.readonly);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, unique within a schema.
    pub name: String,
    /// Element type.
    #[serde(rename = "type", with = "type_name")]
    pub ty: ElementType,
    /// Element count: byte length for string types, array arity for
    /// numeric types (1 = scalar). Must be positive.
    pub count: usize,
    /// Default value encoded into every fresh instance. `None` means
    /// zero-fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Read-only marker. A field without it is mutable after
    /// construction.
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
}

impl FieldSpec {
    /// Create a mutable field with no default.
    pub fn new(name: impl Into<String>, ty: ElementType, count: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            count,
            default: None,
            readonly: false,
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field read-only after construction.
    pub fn read_only(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// A complete schema: byte order plus ordered field specifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Byte order for multi-byte numeric fields.
    pub byte_order: ByteOrder,
    /// Fields in declaration order; the buffer layout follows this order
    /// exactly.
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create a schema from parts.
    pub fn new(byte_order: ByteOrder, fields: Vec<FieldSpec>) -> Self {
        Self { byte_order, fields }
    }

    /// Parse a schema from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`StructError::Json`](crate::StructError::Json) when the
    /// document is malformed or names an unknown type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the schema as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serde adapter mapping [`ElementType`] to its schema-level name.
mod type_name {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::ElementType;

    pub fn serialize<S: Serializer>(ty: &ElementType, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(ty.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ElementType, D::Error> {
        let name = String::deserialize(deserializer)?;
        ElementType::from_name(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown element type: {}", name)))
    }
}

/// Wire representation of [`Value`] for schema interchange.
///
/// Untagged: numbers, strings, and arrays map onto the natural JSON
/// shapes. Non-UTF-8 byte values fall back to an array of byte numbers.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Uint(u64),
    Int(i64),
    Float(f64),
    Text(String),
    Seq(Vec<ValueRepr>),
}

impl From<&Value> for ValueRepr {
    fn from(value: &Value) -> Self {
        match value {
            Value::Uint(n) => ValueRepr::Uint(*n),
            Value::Int(n) => ValueRepr::Int(*n),
            Value::Float(x) => ValueRepr::Float(*x),
            Value::Bytes(b) => match std::str::from_utf8(b) {
                Ok(s) => ValueRepr::Text(s.to_string()),
                Err(_) => ValueRepr::Seq(b.iter().map(|&byte| ValueRepr::Uint(byte as u64)).collect()),
            },
            Value::Array(elements) => ValueRepr::Seq(elements.iter().map(Into::into).collect()),
        }
    }
}

impl From<ValueRepr> for Value {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Uint(n) => Value::Uint(n),
            ValueRepr::Int(n) => Value::Int(n),
            ValueRepr::Float(x) => Value::Float(x),
            ValueRepr::Text(s) => Value::Bytes(s.into_bytes()),
            ValueRepr::Seq(elements) => Value::Array(elements.into_iter().map(Into::into).collect()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ValueRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(ValueRepr::deserialize(deserializer)?.into())
    }
}
