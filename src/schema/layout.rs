//! Schema compilation: field specs in, offset table out.
//!
//! [`Layout::compile`] walks the field list in declaration order, assigns
//! each field its byte offset and width, validates the schema, and
//! materializes the defaulted template buffer that instances are stamped
//! from. The result is immutable; one layout serves any number of
//! instances.
//!
//! Fields are packed exactly as declared: no reordering, no padding. The
//! buffer layout *is* the wire format, byte for byte.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, StructError};
use crate::schema::{ByteOrder, FieldSpec, Schema};
use crate::types::{encode_field, ElementType, Value};

/// Compiled per-field metadata.
///
/// Descriptors are ordered by ascending offset with no gaps and no
/// overlap: `offset[0] == 0` and `offset[i+1] == offset[i] + width[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name, unique within the layout.
    pub name: String,
    /// Element type.
    pub ty: ElementType,
    /// Element count (byte length for string types, arity otherwise).
    pub count: usize,
    /// Byte offset within the instance buffer.
    pub offset: usize,
    /// Byte width: element width x count.
    pub width: usize,
    /// Whether field writes are allowed after construction.
    pub mutable: bool,
    /// Materialized, width-checked default value.
    pub default: Option<Value>,
}

impl FieldDescriptor {
    /// The buffer range this field occupies.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }
}

/// An immutable compiled layout: ordered descriptors, byte order, total
/// size, and the defaulted template buffer.
#[derive(Debug, Clone)]
pub struct Layout {
    byte_order: ByteOrder,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
    total_size: usize,
    template: Vec<u8>,
}

impl Layout {
    /// Compile a schema into a layout.
    ///
    /// Iterates fields in declaration order, assigning
    /// `offset = running total` and advancing by each field's width.
    ///
    /// # Errors
    ///
    /// [`StructError::Schema`] on a zero element count, a duplicate field
    /// name, a pad field (format strings only), or a default value whose
    /// shape or range does not fit its field. An empty field list is
    /// accepted and compiles to a zero-size layout.
    pub fn compile(schema: &Schema) -> Result<Layout> {
        let mut fields = Vec::with_capacity(schema.fields.len());
        let mut index = HashMap::with_capacity(schema.fields.len());
        let mut offset = 0usize;

        for spec in &schema.fields {
            let descriptor = Self::compile_field(spec, offset)?;
            if index.insert(descriptor.name.clone(), fields.len()).is_some() {
                return Err(StructError::Schema(format!(
                    "duplicate field name: {}",
                    descriptor.name
                )));
            }
            offset += descriptor.width;
            fields.push(descriptor);
        }

        let template = Self::build_template(schema.byte_order, &fields, offset)?;

        tracing::debug!(
            "compiled layout: {} fields, {} bytes total",
            fields.len(),
            offset
        );

        Ok(Layout {
            byte_order: schema.byte_order,
            fields,
            index,
            total_size: offset,
            template,
        })
    }

    fn compile_field(spec: &FieldSpec, offset: usize) -> Result<FieldDescriptor> {
        if spec.ty == ElementType::Pad {
            return Err(StructError::Schema(format!(
                "field '{}': pad is only valid in format strings",
                spec.name
            )));
        }
        if spec.count == 0 {
            return Err(StructError::Schema(format!(
                "field '{}': element count must be positive",
                spec.name
            )));
        }

        Ok(FieldDescriptor {
            name: spec.name.clone(),
            ty: spec.ty,
            count: spec.count,
            offset,
            width: spec.ty.field_width(spec.count),
            mutable: !spec.readonly,
            default: spec.default.clone(),
        })
    }

    /// Zero-fill a buffer of the total size and encode each default in
    /// place. Every fresh instance clones this template.
    fn build_template(
        order: ByteOrder,
        fields: &[FieldDescriptor],
        total_size: usize,
    ) -> Result<Vec<u8>> {
        let mut template = vec![0u8; total_size];
        for descriptor in fields {
            if let Some(default) = &descriptor.default {
                let encoded = encode_field(descriptor.ty, descriptor.count, order, default)
                    .map_err(|e| {
                        StructError::Schema(format!(
                            "field '{}': incompatible default: {}",
                            descriptor.name, e
                        ))
                    })?;
                template[descriptor.range()].copy_from_slice(&encoded);
            }
        }
        Ok(template)
    }

    /// The schema's byte order.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Total buffer size in bytes: the sum of all field widths.
    #[inline]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the layout has no fields (zero-size degenerate case).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Descriptors in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by field name.
    #[inline]
    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// The defaulted template buffer instances are stamped from.
    #[inline]
    pub(crate) fn template(&self) -> &[u8] {
        &self.template
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.byte_order {
            ByteOrder::Big => "big_endian",
            ByteOrder::Little => "little_endian",
        };
        writeln!(f, "layout ({}, {} bytes):", order, self.total_size)?;
        writeln!(
            f,
            "  {:>6}  {:>5}  {:<16} {:<14} {:>5}",
            "offset", "width", "name", "type", "count"
        )?;
        for field in &self.fields {
            write!(
                f,
                "  {:>6}  {:>5}  {:<16} {:<14} {:>5}",
                field.offset,
                field.width,
                field.name,
                field.ty.name(),
                field.count
            )?;
            if !field.mutable {
                write!(f, "  (read-only)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
