//! Primitive element types and their wire codecs.
//!
//! Every field in a schema is an array of one primitive element type. An
//! element type knows its fixed byte width and how to encode/decode a
//! [`Value`] at that width under a given [`ByteOrder`]. Field-level
//! encoding ([`encode_field`]) and decoding ([`decode_field`]) layer the
//! element count on top: string types interpret the count as a byte
//! length, numeric types as an array arity.
//!
//! Encode and decode are mutual inverses for any value decode can produce,
//! and both are deterministic pure functions of (value, count, order).
//!
//! The registry itself is a closed enum plus match tables — a process-wide
//! immutable constant. Extending it means adding a variant and its table
//! rows; nothing is registered at runtime.

use crate::error::{Result, StructError};
use crate::schema::ByteOrder;
use crate::types::Value;

/// A primitive binary element type.
///
/// Names in parentheses are the schema-level names accepted by
/// [`ElementType::from_name`]; the single characters are the format-string
/// codes used by [`crate::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Fixed-length byte string (`string`, `s`). Count is the total byte
    /// length; shorter values are zero-padded, longer values rejected.
    Str,
    /// Length-prefixed string (`pascal_string`, `p`). Count is the total
    /// byte length including the leading length byte.
    PascalStr,
    /// Signed byte (`signed_char`, `b`).
    I8,
    /// Unsigned byte (`octet` / `unsigned_char`, `B`), range 0-255.
    U8,
    /// 2-byte signed integer (`short`, `h`).
    I16,
    /// 2-byte unsigned integer (`unsigned_short`, `H`).
    U16,
    /// 4-byte signed integer (`int` / `long`, `i` / `l`).
    I32,
    /// 4-byte unsigned integer (`unsigned_int` / `unsigned_long`,
    /// `I` / `L`).
    U32,
    /// IEEE-754 single-precision float (`float`, `f`).
    F32,
    /// IEEE-754 double-precision float (`double`, `d`).
    F64,
    /// Explicit zero padding (`x`). Only valid in format strings; carries
    /// no value and cannot appear as a schema field.
    Pad,
}

impl ElementType {
    /// Byte width of a single element.
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            ElementType::Str | ElementType::PascalStr | ElementType::Pad => 1,
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 => 4,
            ElementType::F32 => 4,
            ElementType::F64 => 8,
        }
    }

    /// Total byte width of a field with the given element count.
    ///
    /// For string types the count *is* the byte length; for numeric types
    /// it is an array arity.
    #[inline]
    pub fn field_width(&self, count: usize) -> usize {
        self.width() * count
    }

    /// Whether the element count means "byte length" rather than "arity".
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, ElementType::Str | ElementType::PascalStr)
    }

    /// Canonical schema-level name.
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Str => "string",
            ElementType::PascalStr => "pascal_string",
            ElementType::I8 => "signed_char",
            ElementType::U8 => "octet",
            ElementType::I16 => "short",
            ElementType::U16 => "unsigned_short",
            ElementType::I32 => "long",
            ElementType::U32 => "unsigned_long",
            ElementType::F32 => "float",
            ElementType::F64 => "double",
            ElementType::Pad => "pad",
        }
    }

    /// Resolve a schema-level type name, including aliases.
    ///
    /// Returns `None` for unknown names; schema compilation turns that
    /// into a [`StructError::Schema`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ElementType::Str),
            "pascal_string" => Some(ElementType::PascalStr),
            "signed_char" => Some(ElementType::I8),
            "octet" | "unsigned_char" => Some(ElementType::U8),
            "short" => Some(ElementType::I16),
            "unsigned_short" => Some(ElementType::U16),
            "int" | "long" => Some(ElementType::I32),
            "unsigned_int" | "unsigned_long" => Some(ElementType::U32),
            "float" => Some(ElementType::F32),
            "double" => Some(ElementType::F64),
            "pad" => Some(ElementType::Pad),
            _ => None,
        }
    }

    /// Single-character format-string code.
    pub fn format_char(&self) -> char {
        match self {
            ElementType::Str => 's',
            ElementType::PascalStr => 'p',
            ElementType::I8 => 'b',
            ElementType::U8 => 'B',
            ElementType::I16 => 'h',
            ElementType::U16 => 'H',
            ElementType::I32 => 'i',
            ElementType::U32 => 'I',
            ElementType::F32 => 'f',
            ElementType::F64 => 'd',
            ElementType::Pad => 'x',
        }
    }

    /// Resolve a format-string code.
    pub fn from_format_char(c: char) -> Option<Self> {
        match c {
            's' => Some(ElementType::Str),
            'p' => Some(ElementType::PascalStr),
            'b' => Some(ElementType::I8),
            'B' => Some(ElementType::U8),
            'h' => Some(ElementType::I16),
            'H' => Some(ElementType::U16),
            'i' | 'l' => Some(ElementType::I32),
            'I' | 'L' => Some(ElementType::U32),
            'f' => Some(ElementType::F32),
            'd' => Some(ElementType::F64),
            'x' => Some(ElementType::Pad),
            _ => None,
        }
    }

    /// Maximum value of an unsigned element, if this is one.
    fn uint_max(&self) -> Option<u64> {
        match self {
            ElementType::U8 => Some(u8::MAX as u64),
            ElementType::U16 => Some(u16::MAX as u64),
            ElementType::U32 => Some(u32::MAX as u64),
            _ => None,
        }
    }

    /// Inclusive range of a signed element, if this is one.
    fn int_range(&self) -> Option<(i64, i64)> {
        match self {
            ElementType::I8 => Some((i8::MIN as i64, i8::MAX as i64)),
            ElementType::I16 => Some((i16::MIN as i64, i16::MAX as i64)),
            ElementType::I32 => Some((i32::MIN as i64, i32::MAX as i64)),
            _ => None,
        }
    }
}

/// Write an unsigned integer into `dst` (whole slice) in the given order.
fn write_uint(dst: &mut [u8], n: u64, order: ByteOrder) {
    let width = dst.len();
    match order {
        ByteOrder::Big => {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = (n >> (8 * (width - 1 - i))) as u8;
            }
        }
        ByteOrder::Little => {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = (n >> (8 * i)) as u8;
            }
        }
    }
}

/// Read an unsigned integer from the whole of `src` in the given order.
fn read_uint(src: &[u8], order: ByteOrder) -> u64 {
    let mut n: u64 = 0;
    match order {
        ByteOrder::Big => {
            for &byte in src {
                n = (n << 8) | byte as u64;
            }
        }
        ByteOrder::Little => {
            for &byte in src.iter().rev() {
                n = (n << 8) | byte as u64;
            }
        }
    }
    n
}

/// Read a two's-complement signed integer of `src.len()` bytes.
fn read_int(src: &[u8], order: ByteOrder) -> i64 {
    let raw = read_uint(src, order);
    let bits = 8 * src.len() as u32;
    if bits >= 64 {
        return raw as i64;
    }
    let sign_bit = 1u64 << (bits - 1);
    if raw & sign_bit != 0 {
        (raw | (u64::MAX << bits)) as i64
    } else {
        raw as i64
    }
}

/// Encode one numeric element into `dst` (exactly `ty.width()` bytes).
///
/// The value is fully validated before any byte is written.
fn encode_element(ty: ElementType, dst: &mut [u8], value: &Value, order: ByteOrder) -> Result<()> {
    debug_assert_eq!(dst.len(), ty.width());

    if let Some(max) = ty.uint_max() {
        let n = match value {
            Value::Uint(n) => *n,
            // Non-negative signed values are accepted for unsigned fields.
            Value::Int(n) if *n >= 0 => *n as u64,
            other => {
                return Err(StructError::Encoding(format!(
                    "{} element requires an unsigned integer, got {}",
                    ty.name(),
                    other.kind()
                )))
            }
        };
        if n > max {
            return Err(StructError::Encoding(format!(
                "value {} out of range for {} (max {})",
                n,
                ty.name(),
                max
            )));
        }
        write_uint(dst, n, order);
        return Ok(());
    }

    if let Some((min, max)) = ty.int_range() {
        let n = match value {
            Value::Int(n) => *n,
            Value::Uint(n) if *n <= i64::MAX as u64 => *n as i64,
            other => {
                return Err(StructError::Encoding(format!(
                    "{} element requires an integer, got {}",
                    ty.name(),
                    other.kind()
                )))
            }
        };
        if n < min || n > max {
            return Err(StructError::Encoding(format!(
                "value {} out of range for {} ({}..={})",
                n,
                ty.name(),
                min,
                max
            )));
        }
        let bits = 8 * ty.width() as u32;
        let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
        write_uint(dst, (n as u64) & mask, order);
        return Ok(());
    }

    match ty {
        ElementType::F64 => {
            let x = float_input(ty, value)?;
            let bytes = match order {
                ByteOrder::Big => x.to_be_bytes(),
                ByteOrder::Little => x.to_le_bytes(),
            };
            dst.copy_from_slice(&bytes);
            Ok(())
        }
        ElementType::F32 => {
            let x = float_input(ty, value)?;
            let narrowed = x as f32;
            if x.is_finite() && narrowed.is_infinite() {
                return Err(StructError::Encoding(format!(
                    "value {} too large for 4-byte float",
                    x
                )));
            }
            let bytes = match order {
                ByteOrder::Big => narrowed.to_be_bytes(),
                ByteOrder::Little => narrowed.to_le_bytes(),
            };
            dst.copy_from_slice(&bytes);
            Ok(())
        }
        other => Err(StructError::Encoding(format!(
            "{} elements cannot be encoded directly",
            other.name()
        ))),
    }
}

fn float_input(ty: ElementType, value: &Value) -> Result<f64> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Int(n) => Ok(*n as f64),
        Value::Uint(n) => Ok(*n as f64),
        other => Err(StructError::Encoding(format!(
            "{} element requires a number, got {}",
            ty.name(),
            other.kind()
        ))),
    }
}

/// Decode one numeric element from `src` (exactly `ty.width()` bytes).
fn decode_element(ty: ElementType, src: &[u8], order: ByteOrder) -> Value {
    debug_assert_eq!(src.len(), ty.width());
    match ty {
        ElementType::U8 | ElementType::U16 | ElementType::U32 => {
            Value::Uint(read_uint(src, order))
        }
        ElementType::I8 | ElementType::I16 | ElementType::I32 => Value::Int(read_int(src, order)),
        ElementType::F32 => {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(src);
            let x = match order {
                ByteOrder::Big => f32::from_be_bytes(bytes),
                ByteOrder::Little => f32::from_le_bytes(bytes),
            };
            Value::Float(x as f64)
        }
        ElementType::F64 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(src);
            let x = match order {
                ByteOrder::Big => f64::from_be_bytes(bytes),
                ByteOrder::Little => f64::from_le_bytes(bytes),
            };
            Value::Float(x)
        }
        // Strings and pads are handled at field level.
        _ => Value::Bytes(src.to_vec()),
    }
}

/// Encode a whole field: exactly `ty.field_width(count)` bytes.
///
/// Validation is complete before the output buffer is built, so a failed
/// encode produces no bytes at all — callers can copy the result into a
/// larger buffer knowing it is all-or-nothing.
///
/// # Errors
///
/// [`StructError::Encoding`] on out-of-range elements, wrong arity, or
/// overlong strings. Overlong string values are rejected, never silently
/// truncated.
pub fn encode_field(
    ty: ElementType,
    count: usize,
    order: ByteOrder,
    value: &Value,
) -> Result<Vec<u8>> {
    let width = ty.field_width(count);
    match ty {
        ElementType::Str => {
            let content = value.as_bytes().ok_or_else(|| {
                StructError::Encoding(format!(
                    "string field requires bytes, got {}",
                    value.kind()
                ))
            })?;
            if content.len() > count {
                return Err(StructError::Encoding(format!(
                    "string of {} bytes does not fit in {}-byte field",
                    content.len(),
                    count
                )));
            }
            let mut out = vec![0u8; width];
            out[..content.len()].copy_from_slice(content);
            Ok(out)
        }
        ElementType::PascalStr => {
            let content = value.as_bytes().ok_or_else(|| {
                StructError::Encoding(format!(
                    "pascal_string field requires bytes, got {}",
                    value.kind()
                ))
            })?;
            // One byte is the length prefix.
            let capacity = count.saturating_sub(1);
            if content.len() > capacity {
                return Err(StructError::Encoding(format!(
                    "string of {} bytes does not fit in {}-byte pascal_string field",
                    content.len(),
                    count
                )));
            }
            let mut out = vec![0u8; width];
            out[0] = content.len() as u8;
            out[1..1 + content.len()].copy_from_slice(content);
            Ok(out)
        }
        ElementType::Pad => Err(StructError::Encoding(
            "pad fields carry no value".to_string(),
        )),
        _ if count == 1 => {
            let mut out = vec![0u8; width];
            encode_element(ty, &mut out, value, order)?;
            Ok(out)
        }
        _ => {
            let elements = value.as_array().ok_or_else(|| {
                StructError::Encoding(format!(
                    "field of {} {} elements requires a sequence, got {}",
                    count,
                    ty.name(),
                    value.kind()
                ))
            })?;
            if elements.len() != count {
                return Err(StructError::Encoding(format!(
                    "field element count mismatch: expected {}, got {}",
                    count,
                    elements.len()
                )));
            }
            let mut out = vec![0u8; width];
            let element_width = ty.width();
            for (i, element) in elements.iter().enumerate() {
                let slot = &mut out[i * element_width..(i + 1) * element_width];
                encode_element(ty, slot, element, order)?;
            }
            Ok(out)
        }
    }
}

/// Decode a whole field from exactly `ty.field_width(count)` bytes.
///
/// String fields return the raw bytes (callers own padding/trim
/// semantics); numeric fields return a scalar for count 1 and an ordered
/// [`Value::Array`] otherwise.
pub fn decode_field(ty: ElementType, count: usize, order: ByteOrder, src: &[u8]) -> Value {
    debug_assert_eq!(src.len(), ty.field_width(count));
    match ty {
        ElementType::Str => Value::Bytes(src.to_vec()),
        ElementType::PascalStr => {
            let capacity = count.saturating_sub(1);
            let len = (src[0] as usize).min(capacity);
            Value::Bytes(src[1..1 + len].to_vec())
        }
        ElementType::Pad => Value::Bytes(Vec::new()),
        _ if count == 1 => decode_element(ty, src, order),
        _ => {
            let element_width = ty.width();
            let elements = src
                .chunks_exact(element_width)
                .map(|chunk| decode_element(ty, chunk, order))
                .collect();
            Value::Array(elements)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_widths() {
        assert_eq!(ElementType::Str.width(), 1);
        assert_eq!(ElementType::U8.width(), 1);
        assert_eq!(ElementType::I16.width(), 2);
        assert_eq!(ElementType::U32.width(), 4);
        assert_eq!(ElementType::F64.width(), 8);
        assert_eq!(ElementType::U32.field_width(3), 12);
        assert_eq!(ElementType::Str.field_width(16), 16);
    }

    #[test]
    fn test_name_round_trip() {
        for ty in [
            ElementType::Str,
            ElementType::PascalStr,
            ElementType::I8,
            ElementType::U8,
            ElementType::I16,
            ElementType::U16,
            ElementType::I32,
            ElementType::U32,
            ElementType::F32,
            ElementType::F64,
            ElementType::Pad,
        ] {
            assert_eq!(ElementType::from_name(ty.name()), Some(ty));
            assert_eq!(ElementType::from_format_char(ty.format_char()), Some(ty));
        }
    }

    #[test]
    fn test_name_aliases() {
        assert_eq!(ElementType::from_name("unsigned_char"), Some(ElementType::U8));
        assert_eq!(ElementType::from_name("unsigned_int"), Some(ElementType::U32));
        assert_eq!(ElementType::from_name("int"), Some(ElementType::I32));
        assert_eq!(ElementType::from_format_char('L'), Some(ElementType::U32));
        assert_eq!(ElementType::from_format_char('l'), Some(ElementType::I32));
        assert_eq!(ElementType::from_name("quaternion"), None);
    }

    #[test]
    fn test_u32_byte_order() {
        let value = Value::Uint(0x01020304);
        let big = encode_field(ElementType::U32, 1, ByteOrder::Big, &value).unwrap();
        let little = encode_field(ElementType::U32, 1, ByteOrder::Little, &value).unwrap();
        assert_eq!(big, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(little, [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_numeric_round_trip_both_orders() {
        for order in [ByteOrder::Big, ByteOrder::Little] {
            for (ty, value) in [
                (ElementType::U8, Value::Uint(200)),
                (ElementType::U16, Value::Uint(0xBEEF)),
                (ElementType::U32, Value::Uint(0xDEADBEEF)),
                (ElementType::I8, Value::Int(-100)),
                (ElementType::I16, Value::Int(-30000)),
                (ElementType::I32, Value::Int(-2_000_000_000)),
                (ElementType::F64, Value::Float(-2.5)),
            ] {
                let bytes = encode_field(ty, 1, order, &value).unwrap();
                assert_eq!(decode_field(ty, 1, order, &bytes), value);
            }
        }
    }

    #[test]
    fn test_f32_round_trip() {
        let bytes =
            encode_field(ElementType::F32, 1, ByteOrder::Big, &Value::Float(1.5)).unwrap();
        assert_eq!(
            decode_field(ElementType::F32, 1, ByteOrder::Big, &bytes),
            Value::Float(1.5)
        );
    }

    #[test]
    fn test_f32_overflow_rejected() {
        let result = encode_field(ElementType::F32, 1, ByteOrder::Big, &Value::Float(1e300));
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_uint_range_check() {
        let result = encode_field(ElementType::U8, 1, ByteOrder::Big, &Value::Uint(256));
        assert!(matches!(result, Err(StructError::Encoding(_))));

        let result = encode_field(ElementType::U16, 1, ByteOrder::Big, &Value::Uint(0x10000));
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_negative_rejected_for_unsigned() {
        let result = encode_field(ElementType::U32, 1, ByteOrder::Big, &Value::Int(-1));
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_nonnegative_int_accepted_for_unsigned() {
        let bytes = encode_field(ElementType::U32, 1, ByteOrder::Big, &Value::Int(7)).unwrap();
        assert_eq!(bytes, [0, 0, 0, 7]);
    }

    #[test]
    fn test_int_range_check() {
        let result = encode_field(ElementType::I8, 1, ByteOrder::Big, &Value::Int(128));
        assert!(matches!(result, Err(StructError::Encoding(_))));
        let result = encode_field(ElementType::I8, 1, ByteOrder::Big, &Value::Int(-129));
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_signed_little_endian_round_trip() {
        let bytes =
            encode_field(ElementType::I16, 1, ByteOrder::Little, &Value::Int(-2)).unwrap();
        assert_eq!(bytes, [0xFE, 0xFF]);
        assert_eq!(
            decode_field(ElementType::I16, 1, ByteOrder::Little, &bytes),
            Value::Int(-2)
        );
    }

    #[test]
    fn test_string_pads_with_zeros() {
        let bytes = encode_field(
            ElementType::Str,
            8,
            ByteOrder::Big,
            &Value::from("abc"),
        )
        .unwrap();
        assert_eq!(bytes, b"abc\x00\x00\x00\x00\x00");
    }

    #[test]
    fn test_string_exact_fit() {
        let bytes = encode_field(
            ElementType::Str,
            4,
            ByteOrder::Big,
            &Value::from("XSDP"),
        )
        .unwrap();
        assert_eq!(bytes, b"XSDP");
    }

    #[test]
    fn test_string_too_long_rejected() {
        let result = encode_field(
            ElementType::Str,
            4,
            ByteOrder::Big,
            &Value::from("XSDPX"),
        );
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_string_decode_returns_raw_slice() {
        let decoded = decode_field(ElementType::Str, 4, ByteOrder::Big, b"ab\x00\x00");
        assert_eq!(decoded, Value::Bytes(b"ab\x00\x00".to_vec()));
    }

    #[test]
    fn test_pascal_string_round_trip() {
        let bytes = encode_field(
            ElementType::PascalStr,
            8,
            ByteOrder::Big,
            &Value::from("hey"),
        )
        .unwrap();
        assert_eq!(bytes, b"\x03hey\x00\x00\x00\x00");
        assert_eq!(
            decode_field(ElementType::PascalStr, 8, ByteOrder::Big, &bytes),
            Value::Bytes(b"hey".to_vec())
        );
    }

    #[test]
    fn test_pascal_string_capacity_excludes_length_byte() {
        let result = encode_field(
            ElementType::PascalStr,
            4,
            ByteOrder::Big,
            &Value::from("abcd"),
        );
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_pascal_string_decode_clamps_corrupt_length() {
        // Length byte claims more content than the field can hold.
        let decoded = decode_field(ElementType::PascalStr, 4, ByteOrder::Big, b"\xFFabc");
        assert_eq!(decoded, Value::Bytes(b"abc".to_vec()));
    }

    #[test]
    fn test_array_encode_decode() {
        let value = Value::array([1u8, 0]);
        let bytes = encode_field(ElementType::U8, 2, ByteOrder::Big, &value).unwrap();
        assert_eq!(bytes, [1, 0]);
        assert_eq!(decode_field(ElementType::U8, 2, ByteOrder::Big, &bytes), value);
    }

    #[test]
    fn test_array_arity_mismatch() {
        let value = Value::array([1u8, 2, 3]);
        let result = encode_field(ElementType::U8, 2, ByteOrder::Big, &value);
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_scalar_rejected_where_array_expected() {
        let result = encode_field(ElementType::U8, 2, ByteOrder::Big, &Value::Uint(1));
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_multi_element_u32_byte_order() {
        let value = Value::array([0x01020304u32, 0x05060708]);
        let big = encode_field(ElementType::U32, 2, ByteOrder::Big, &value).unwrap();
        let little = encode_field(ElementType::U32, 2, ByteOrder::Little, &value).unwrap();
        assert_eq!(big, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(little, [4, 3, 2, 1, 8, 7, 6, 5]);
    }

    #[test]
    fn test_wrong_value_type_rejected() {
        let result = encode_field(ElementType::U32, 1, ByteOrder::Big, &Value::from("four"));
        assert!(matches!(result, Err(StructError::Encoding(_))));

        let result = encode_field(ElementType::Str, 4, ByteOrder::Big, &Value::Uint(4));
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }

    #[test]
    fn test_pad_carries_no_value() {
        let result = encode_field(ElementType::Pad, 2, ByteOrder::Big, &Value::Uint(0));
        assert!(matches!(result, Err(StructError::Encoding(_))));
    }
}
