//! Format-string packing and unpacking.
//!
//! The whole-buffer companion to schema-compiled structs: a format
//! string describes a packed byte layout in one line, and [`pack`] /
//! [`unpack`] move flat value lists through it. Useful for one-shot
//! encodes where compiling a [`StructType`](crate::StructType) would be
//! ceremony.
//!
//! # Format strings
//!
//! An optional byte-order prefix followed by items, each an optional
//! decimal count and a type code:
//!
//! | Prefix | Order |
//! |--------|-------|
//! | `>` or `!` | big-endian (default when omitted) |
//! | `<` | little-endian |
//! | `=` | host order |
//!
//! | Code | Type | Code | Type |
//! |------|------|------|------|
//! | `s` | fixed string (count = byte length) | `p` | pascal string (count = byte length) |
//! | `b` | signed byte | `B` | unsigned byte |
//! | `h` | signed 2-byte | `H` | unsigned 2-byte |
//! | `i`, `l` | signed 4-byte | `I`, `L` | unsigned 4-byte |
//! | `f` | 4-byte float | `d` | 8-byte float |
//! | `x` | pad byte (consumes/produces no value) | | |
//!
//! For numeric codes the count is a repeat: `2L` packs two values.
//! Whitespace between items is ignored. There is no native-alignment
//! mode; every layout is packed with standard sizes and no padding.
//!
//! # Example
//!
//! ```
//! use wirestruct::format::{calcsize, pack, unpack};
//! use wirestruct::Value;
//!
//! assert_eq!(calcsize(">4sB L").unwrap(), 9);
//!
//! let bytes = pack(
//!     ">4sBL",
//!     &[Value::from("XSDP"), Value::Uint(2), Value::Uint(0x01020304)],
//! )
//! .unwrap();
//! assert_eq!(bytes, b"XSDP\x02\x01\x02\x03\x04");
//!
//! let values = unpack(">4sBL", &bytes).unwrap();
//! assert_eq!(values[2], Value::Uint(0x01020304));
//! ```

use crate::error::{Result, StructError};
use crate::schema::ByteOrder;
use crate::types::{decode_field, encode_field, ElementType, Value};

/// One parsed format item: a type code and its count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FormatItem {
    ty: ElementType,
    count: usize,
}

impl FormatItem {
    /// Bytes this item occupies in the packed buffer.
    fn byte_len(&self) -> usize {
        self.ty.field_width(self.count)
    }

    /// Values this item consumes on pack / produces on unpack.
    fn value_count(&self) -> usize {
        match self.ty {
            // A string item is one value regardless of its byte length;
            // '0s' still consumes/produces one (empty) value.
            ElementType::Str => 1,
            ElementType::PascalStr => usize::from(self.count != 0),
            ElementType::Pad => 0,
            _ => self.count,
        }
    }
}

/// Parse a format string into its byte order and item list.
fn parse(fmt: &str) -> Result<(ByteOrder, Vec<FormatItem>)> {
    let mut chars = fmt.chars().peekable();

    let order = match chars.peek() {
        Some('>') | Some('!') => {
            chars.next();
            ByteOrder::Big
        }
        Some('<') => {
            chars.next();
            ByteOrder::Little
        }
        Some('=') => {
            chars.next();
            ByteOrder::host()
        }
        Some('@') => {
            return Err(StructError::Schema(
                "native-alignment mode '@' is not supported".to_string(),
            ))
        }
        _ => ByteOrder::Big,
    };

    let mut items = Vec::new();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let (count, code) = if c.is_ascii_digit() {
            let mut count = (c as u8 - b'0') as usize;
            loop {
                match chars.next() {
                    Some(digit) if digit.is_ascii_digit() => {
                        count = count
                            .checked_mul(10)
                            .and_then(|n| n.checked_add((digit as u8 - b'0') as usize))
                            .ok_or_else(|| {
                                StructError::Schema("overflow in item count".to_string())
                            })?;
                    }
                    Some(code) => break (count, code),
                    None => {
                        return Err(StructError::Schema(
                            "format string ends with a count".to_string(),
                        ))
                    }
                }
            }
        } else {
            (1, c)
        };

        let ty = ElementType::from_format_char(code).ok_or_else(|| {
            StructError::Schema(format!("bad char '{}' in struct format", code))
        })?;

        // A zero count contributes nothing, except '0s' which is a
        // zero-length string value.
        if count == 0 && ty != ElementType::Str {
            continue;
        }

        items.push(FormatItem { ty, count });
    }

    Ok((order, items))
}

/// Byte size of the buffer a format string describes.
///
/// # Errors
///
/// [`StructError::Schema`] on a malformed format string.
pub fn calcsize(fmt: &str) -> Result<usize> {
    let (_, items) = parse(fmt)?;
    Ok(items.iter().map(FormatItem::byte_len).sum())
}

/// Pack values into a buffer according to a format string.
///
/// Numeric items with a count consume that many values, flattened -
/// `"2L"` takes two `Uint`s, not one array.
///
/// # Errors
///
/// [`StructError::Schema`] on a malformed format,
/// [`StructError::Encoding`] when the value list is too short or too
/// long for the format, or when a value does not fit its item.
pub fn pack(fmt: &str, values: &[Value]) -> Result<Vec<u8>> {
    let (order, items) = parse(fmt)?;
    let mut out = Vec::with_capacity(items.iter().map(FormatItem::byte_len).sum());
    let mut next_value = 0;

    for item in &items {
        match item.ty {
            ElementType::Pad => {
                out.resize(out.len() + item.count, 0);
            }
            ElementType::Str | ElementType::PascalStr => {
                let value = values.get(next_value).ok_or_else(|| {
                    StructError::Encoding("insufficient arguments to pack".to_string())
                })?;
                next_value += 1;
                out.extend_from_slice(&encode_field(item.ty, item.count, order, value)?);
            }
            ty => {
                for _ in 0..item.count {
                    let value = values.get(next_value).ok_or_else(|| {
                        StructError::Encoding("insufficient arguments to pack".to_string())
                    })?;
                    next_value += 1;
                    out.extend_from_slice(&encode_field(ty, 1, order, value)?);
                }
            }
        }
    }

    if next_value < values.len() {
        return Err(StructError::Encoding(
            "too many arguments for pack format".to_string(),
        ));
    }

    Ok(out)
}

/// Unpack a buffer into values according to a format string.
///
/// The inverse of [`pack`]: numeric counts produce flattened scalars,
/// string items produce one `Bytes` value each, pad bytes are skipped.
///
/// # Errors
///
/// [`StructError::Schema`] on a malformed format,
/// [`StructError::SizeMismatch`] unless `data.len()` equals
/// [`calcsize`]`(fmt)`.
pub fn unpack(fmt: &str, data: &[u8]) -> Result<Vec<Value>> {
    let (order, items) = parse(fmt)?;
    let expected: usize = items.iter().map(FormatItem::byte_len).sum();
    if data.len() != expected {
        return Err(StructError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut values = Vec::with_capacity(items.iter().map(FormatItem::value_count).sum());
    let mut offset = 0;

    for item in &items {
        match item.ty {
            ElementType::Pad => {
                offset += item.count;
            }
            ElementType::Str | ElementType::PascalStr => {
                let end = offset + item.byte_len();
                values.push(decode_field(item.ty, item.count, order, &data[offset..end]));
                offset = end;
            }
            ty => {
                let width = ty.width();
                for _ in 0..item.count {
                    values.push(decode_field(ty, 1, order, &data[offset..offset + width]));
                    offset += width;
                }
            }
        }
    }

    Ok(values)
}
