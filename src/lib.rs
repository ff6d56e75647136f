//! # wirestruct
//!
//! A declarative binary-struct engine: describe a packed byte layout as
//! data (byte order + ordered, typed, fixed-width fields), compile it
//! once into a [`StructType`], and stamp out [`Instance`]s backed by a
//! single contiguous byte buffer. Fields are read and written by name
//! through the compiled offset table; whole instances move to and from
//! byte sinks and sources without ever re-parsing the schema.
//!
//! The buffer layout is exactly the declaration order with no padding -
//! what you declare is what goes on the wire, byte for byte.
//!
//! ## Architecture
//!
//! - [`types`]: primitive element types and their byte-order-aware codecs
//! - [`schema`]: schema input model + compiler producing an immutable
//!   offset/width [`Layout`]
//! - [`StructType`] / [`Instance`]: blueprint and buffer-backed values
//! - [`io`]: length-exact export/import against sync and async endpoints
//! - [`format`]: one-shot format-string `pack` / `unpack` / `calcsize`
//!
//! ## Example
//!
//! ```
//! use wirestruct::{structdef, ByteOrder, ElementType, FieldSpec, Value};
//!
//! let message = structdef(
//!     ByteOrder::Big,
//!     vec![
//!         FieldSpec::new("magic", ElementType::Str, 4)
//!             .with_default("XSDP")
//!             .read_only(),
//!         FieldSpec::new("version", ElementType::U8, 2)
//!             .with_default(Value::array([1u8, 0])),
//!         FieldSpec::new("correl_id", ElementType::U32, 1),
//!     ],
//! )
//! .unwrap();
//!
//! let mut msg = message.new_instance();
//! msg.set("correl_id", 0x01020304u32).unwrap();
//!
//! let bytes = msg.to_bytes();
//! assert_eq!(&bytes[6..10], [0x01, 0x02, 0x03, 0x04]);
//!
//! let received = message.instance_from_bytes(&bytes).unwrap();
//! assert_eq!(received.get("correl_id").unwrap().as_uint(), Some(0x01020304));
//! ```

pub mod error;
pub mod format;
pub mod io;
pub mod schema;
pub mod types;

mod instance;
mod struct_type;

pub use error::{Result, StructError};
pub use instance::Instance;
pub use schema::{ByteOrder, FieldDescriptor, FieldSpec, Layout, Schema};
pub use struct_type::{structdef, StructType};
pub use types::{ElementType, Value};
