//! Dynamic field values.
//!
//! Field reads and writes move data through [`Value`], the engine's only
//! dynamically-typed container. A field's element type decides which
//! variant a decode produces and which variants an encode accepts; the
//! instance buffer itself never stores a `Value` — it is rebuilt from the
//! bytes on every read.
//!
//! # Example
//!
//! ```
//! use wirestruct::Value;
//!
//! let v = Value::from("XSDP");
//! assert_eq!(v.as_bytes(), Some(&b"XSDP"[..]));
//!
//! let n = Value::from(0x01020304u32);
//! assert_eq!(n.as_uint(), Some(0x01020304));
//! ```

use std::fmt;

/// A dynamically-typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw bytes, produced and consumed by string fields. Not guaranteed
    /// to be valid UTF-8.
    Bytes(Vec<u8>),
    /// Unsigned integer scalar.
    Uint(u64),
    /// Signed integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Ordered sequence, produced and consumed by fields with an element
    /// count greater than one.
    Array(Vec<Value>),
}

impl Value {
    /// Build an array value from any iterable of convertible elements.
    ///
    /// # Example
    ///
    /// ```
    /// use wirestruct::Value;
    ///
    /// let version = Value::array([1u8, 0]);
    /// assert_eq!(version.as_array().unwrap().len(), 2);
    /// ```
    pub fn array<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Array(elements.into_iter().map(Into::into).collect())
    }

    /// Get the unsigned scalar, if this is a `Uint`.
    #[inline]
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the signed scalar, if this is an `Int`.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the float scalar, if this is a `Float`.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Get the raw bytes, if this is a `Bytes`.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the bytes as UTF-8 text, if this is a `Bytes` holding valid
    /// UTF-8. Trailing zero padding is not stripped.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Get the element slice, if this is an `Array`.
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Array(_) => "array",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bytes(b) => {
                // Printable ASCII verbatim, everything else escaped.
                for &byte in b {
                    if (0x20..0x7f).contains(&byte) {
                        write!(f, "{}", byte as char)?;
                    } else {
                        write!(f, "\\x{:02x}", byte)?;
                    }
                }
                Ok(())
            }
            Value::Uint(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Array(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::Array(elements)
    }
}

macro_rules! value_from_uint {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(n: $ty) -> Self {
                Value::Uint(n as u64)
            }
        })*
    };
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(n: $ty) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

value_from_uint!(u8, u16, u32, u64);
value_from_int!(i8, i16, i32, i64);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x as f64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
