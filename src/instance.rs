//! Buffer-backed struct instances.
//!
//! An [`Instance`] owns exactly one contiguous byte buffer of its
//! layout's total size. The buffer is the single source of truth: field
//! reads decode the bytes at the field's offset on every call, and field
//! writes encode directly into them. No decoded values are cached.
//!
//! Writes are all-or-nothing: a value is fully validated and encoded
//! before any buffer byte changes, so a failed write leaves the instance
//! bit-identical.
//!
//! # Example
//!
//! ```
//! use wirestruct::{structdef, ByteOrder, ElementType, FieldSpec};
//!
//! let point = structdef(
//!     ByteOrder::Little,
//!     vec![
//!         FieldSpec::new("x", ElementType::U32, 1),
//!         FieldSpec::new("y", ElementType::U32, 1),
//!     ],
//! )
//! .unwrap();
//!
//! let mut p = point.new_instance();
//! p.set("x", 10u32).unwrap();
//! p.set("y", 20u32).unwrap();
//! assert_eq!(p.get("x").unwrap().as_uint(), Some(10));
//! assert_eq!(p.to_bytes().len(), 8);
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Result, StructError};
use crate::schema::{FieldDescriptor, Layout};
use crate::types::{decode_field, encode_field, Value};

/// A single buffer-backed value stamped from a
/// [`StructType`](crate::StructType).
///
/// The instance exclusively owns its buffer. Byte views handed out by
/// [`as_bytes`](Self::as_bytes) / [`as_bytes_mut`](Self::as_bytes_mut)
/// are borrows and cannot outlive it. The engine performs no internal
/// synchronization; sharing one instance across threads is the caller's
/// responsibility.
#[derive(Debug, Clone)]
pub struct Instance {
    layout: Arc<Layout>,
    buffer: Vec<u8>,
}

impl Instance {
    /// Assemble an instance from a layout and an exact-size buffer.
    pub(crate) fn from_parts(layout: Arc<Layout>, buffer: Vec<u8>) -> Self {
        debug_assert_eq!(buffer.len(), layout.total_size());
        Self { layout, buffer }
    }

    /// Read a field by name.
    ///
    /// # Errors
    ///
    /// [`StructError::UnknownField`] if the layout has no such field.
    pub fn get(&self, name: &str) -> Result<Value> {
        let descriptor = self
            .layout
            .descriptor(name)
            .ok_or_else(|| StructError::UnknownField(name.to_string()))?;
        Ok(self.read_field(descriptor))
    }

    /// Write a field by name.
    ///
    /// # Errors
    ///
    /// [`StructError::UnknownField`] for an unknown name,
    /// [`StructError::ReadOnlyField`] for an immutable field, and
    /// [`StructError::Encoding`] for a value that does not fit. In every
    /// error case the buffer is unmodified.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let layout = Arc::clone(&self.layout);
        let descriptor = layout
            .descriptor(name)
            .ok_or_else(|| StructError::UnknownField(name.to_string()))?;
        self.write_field(descriptor, &value.into())
    }

    /// Read through a descriptor (explicit-lookup form of [`get`](Self::get)).
    ///
    /// The descriptor must come from this instance's layout.
    pub fn read_field(&self, descriptor: &FieldDescriptor) -> Value {
        debug_assert!(descriptor.range().end <= self.buffer.len());
        decode_field(
            descriptor.ty,
            descriptor.count,
            self.layout.byte_order(),
            &self.buffer[descriptor.range()],
        )
    }

    /// Write through a descriptor (explicit-lookup form of [`set`](Self::set)).
    ///
    /// The descriptor must come from this instance's layout. Mutability
    /// and value validation are identical to [`set`](Self::set): the
    /// field's bytes are replaced only after the whole value has encoded
    /// cleanly, and no other field is touched.
    pub fn write_field(&mut self, descriptor: &FieldDescriptor, value: &Value) -> Result<()> {
        debug_assert!(descriptor.range().end <= self.buffer.len());
        if !descriptor.mutable {
            return Err(StructError::ReadOnlyField(descriptor.name.clone()));
        }
        let encoded = encode_field(
            descriptor.ty,
            descriptor.count,
            self.layout.byte_order(),
            value,
        )?;
        self.buffer[descriptor.range()].copy_from_slice(&encoded);
        Ok(())
    }

    /// Serialize: copy the whole buffer out as an immutable byte
    /// sequence of exactly [`size()`](Self::size) bytes.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer)
    }

    /// Borrow the buffer read-only (zero-copy export view).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Borrow the buffer mutably (zero-copy import view).
    ///
    /// External sources may overwrite the bytes wholesale; the next
    /// field read decodes whatever was written. Partial overwrites are
    /// the caller's responsibility on this raw path - the checked
    /// alternative is [`read_into`](crate::io::read_into).
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Overwrite the whole buffer from a byte slice, in place.
    ///
    /// # Errors
    ///
    /// [`StructError::SizeMismatch`] unless `buf.len()` equals
    /// [`size()`](Self::size); the buffer is unmodified on error.
    pub fn load_bytes(&mut self, buf: &[u8]) -> Result<()> {
        if buf.len() != self.buffer.len() {
            return Err(StructError::SizeMismatch {
                expected: self.buffer.len(),
                actual: buf.len(),
            });
        }
        self.buffer.copy_from_slice(buf);
        Ok(())
    }

    /// Buffer size in bytes (the layout's total size).
    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// The compiled layout this instance was stamped from.
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl fmt::Display for Instance {
    /// Renders a "field: value" dump in declaration order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for descriptor in self.layout.fields() {
            writeln!(f, "{}: {}", descriptor.name, self.read_field(descriptor))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ByteOrder, FieldSpec};
    use crate::struct_type::structdef;
    use crate::types::ElementType;

    fn xsdp_type() -> crate::StructType {
        structdef(
            ByteOrder::Big,
            vec![
                FieldSpec::new("magic", ElementType::Str, 4)
                    .with_default("XSDP")
                    .read_only(),
                FieldSpec::new("version", ElementType::U8, 2).with_default(Value::array([1u8, 0])),
                FieldSpec::new("byte_order", ElementType::U8, 1)
                    .with_default(0u8)
                    .read_only(),
                FieldSpec::new("message_type", ElementType::U8, 1),
                FieldSpec::new("correl_id", ElementType::U32, 1),
                FieldSpec::new("data", ElementType::Str, 16),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut msg = xsdp_type().new_instance();

        msg.set("correl_id", 0x01020304u32).unwrap();
        assert_eq!(msg.get("correl_id").unwrap(), Value::Uint(0x01020304));

        msg.set("data", "Hello, World !").unwrap();
        assert_eq!(
            msg.get("data").unwrap(),
            Value::Bytes(b"Hello, World !\x00\x00".to_vec())
        );
    }

    #[test]
    fn test_unknown_field() {
        let mut msg = xsdp_type().new_instance();
        assert!(matches!(
            msg.get("nope"),
            Err(StructError::UnknownField(_))
        ));
        assert!(matches!(
            msg.set("nope", 1u8),
            Err(StructError::UnknownField(_))
        ));
    }

    #[test]
    fn test_readonly_write_leaves_buffer_unchanged() {
        let mut msg = xsdp_type().new_instance();
        let before = msg.to_bytes();

        let result = msg.set("magic", "XXXX");
        assert!(matches!(result, Err(StructError::ReadOnlyField(name)) if name == "magic"));
        assert_eq!(msg.to_bytes(), before);
    }

    #[test]
    fn test_failed_encode_leaves_buffer_unchanged() {
        let mut msg = xsdp_type().new_instance();
        msg.set("data", "seed").unwrap();
        let before = msg.to_bytes();

        // Too long for the 16-byte field.
        let result = msg.set("data", "this string is way past sixteen bytes");
        assert!(matches!(result, Err(StructError::Encoding(_))));
        assert_eq!(msg.to_bytes(), before);

        // Arity mismatch on a partially-encodable array must not write
        // the leading elements either.
        let result = msg.set("version", Value::array([2u8, 0, 0]));
        assert!(matches!(result, Err(StructError::Encoding(_))));
        assert_eq!(msg.to_bytes(), before);
    }

    #[test]
    fn test_write_is_localized_to_field_range() {
        let mut msg = xsdp_type().new_instance();
        let before = msg.to_bytes();

        msg.set("correl_id", 0x01020304u32).unwrap();
        let after = msg.to_bytes();

        // Only bytes 8..12 changed.
        assert_eq!(&after[..8], &before[..8]);
        assert_eq!(&after[8..12], [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&after[12..], &before[12..]);
    }

    #[test]
    fn test_serialize_is_idempotent() {
        let mut msg = xsdp_type().new_instance();
        msg.set("message_type", 2u8).unwrap();

        assert_eq!(msg.to_bytes(), msg.to_bytes());
        assert_eq!(msg.to_bytes().len(), 28);
    }

    #[test]
    fn test_descriptor_access_matches_name_access() {
        let ty = xsdp_type();
        let mut msg = ty.new_instance();

        let descriptor = ty.layout().descriptor("correl_id").unwrap();
        msg.write_field(descriptor, &Value::Uint(42)).unwrap();

        assert_eq!(msg.read_field(descriptor), Value::Uint(42));
        assert_eq!(msg.get("correl_id").unwrap(), Value::Uint(42));
    }

    #[test]
    fn test_load_bytes_exact_length_only() {
        let mut msg = xsdp_type().new_instance();
        let before = msg.to_bytes();

        let result = msg.load_bytes(&[0u8; 27]);
        assert!(matches!(
            result,
            Err(StructError::SizeMismatch {
                expected: 28,
                actual: 27
            })
        ));
        assert_eq!(msg.to_bytes(), before);

        msg.load_bytes(&[0xAA; 28]).unwrap();
        assert!(msg.as_bytes().iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_mut_view_decodes_on_next_read() {
        let mut msg = xsdp_type().new_instance();

        // External source overwrites the buffer wholesale.
        msg.as_bytes_mut().copy_from_slice(&[0x01; 28]);
        assert_eq!(msg.get("byte_order").unwrap(), Value::Uint(1));
        assert_eq!(msg.get("correl_id").unwrap(), Value::Uint(0x01010101));
    }

    #[test]
    fn test_display_dumps_fields_in_order() {
        let mut msg = xsdp_type().new_instance();
        msg.set("correl_id", 5u32).unwrap();

        let dump = msg.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "magic: XSDP");
        assert_eq!(lines[1], "version: (1, 0)");
        assert_eq!(lines[4], "correl_id: 5");
    }
}
