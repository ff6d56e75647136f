//! The compiled struct blueprint.
//!
//! A [`StructType`] wraps an immutable [`Layout`] behind an `Arc` and
//! stamps out buffer-backed [`Instance`]s. Compiling is one-time work per
//! schema; the type is cheap to clone and safe to share across threads.
//!
//! # Example
//!
//! ```
//! use wirestruct::{structdef, ByteOrder, ElementType, FieldSpec};
//!
//! let message = structdef(
//!     ByteOrder::Big,
//!     vec![
//!         FieldSpec::new("magic", ElementType::Str, 4)
//!             .with_default("XSDP")
//!             .read_only(),
//!         FieldSpec::new("correl_id", ElementType::U32, 1),
//!     ],
//! )
//! .unwrap();
//!
//! let msg = message.new_instance();
//! assert_eq!(msg.get("magic").unwrap().as_str(), Some("XSDP"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StructError};
use crate::instance::Instance;
use crate::schema::{ByteOrder, FieldSpec, Layout, Schema};

/// A reusable, immutable struct blueprint compiled from a schema.
///
/// Cloning shares the underlying layout; any number of instances can be
/// stamped from one type, including concurrently.
#[derive(Debug, Clone)]
pub struct StructType {
    layout: Arc<Layout>,
}

impl StructType {
    /// Compile a schema into a struct type.
    ///
    /// # Errors
    ///
    /// Propagates [`StructError::Schema`] from [`Layout::compile`].
    pub fn compile(schema: &Schema) -> Result<Self> {
        Ok(Self {
            layout: Arc::new(Layout::compile(schema)?),
        })
    }

    /// Stamp a fresh instance: defaults applied, remaining bytes zero.
    pub fn new_instance(&self) -> Instance {
        Instance::from_parts(Arc::clone(&self.layout), self.layout.template().to_vec())
    }

    /// Build an instance from an exact-length byte sequence.
    ///
    /// The bytes are copied verbatim; no field-level validation is
    /// performed, so a message received from a peer stays inspectable
    /// even when a field value would be rejected by a write.
    ///
    /// # Errors
    ///
    /// [`StructError::SizeMismatch`] unless `buf.len()` equals
    /// [`size()`](Self::size).
    pub fn instance_from_bytes(&self, buf: &[u8]) -> Result<Instance> {
        if buf.len() != self.layout.total_size() {
            return Err(StructError::SizeMismatch {
                expected: self.layout.total_size(),
                actual: buf.len(),
            });
        }
        Ok(Instance::from_parts(
            Arc::clone(&self.layout),
            buf.to_vec(),
        ))
    }

    /// Total instance buffer size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.total_size()
    }

    /// The schema's byte order.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.layout.byte_order()
    }

    /// The compiled layout.
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl fmt::Display for StructType {
    /// Renders the compiled layout table (introspection surface).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.layout)
    }
}

/// Compile a struct type from a byte order and field list.
///
/// Convenience entry point mirroring the `structdef(byte_order, fields)`
/// schema-definition call.
pub fn structdef(byte_order: ByteOrder, fields: Vec<FieldSpec>) -> Result<StructType> {
    StructType::compile(&Schema::new(byte_order, fields))
}
