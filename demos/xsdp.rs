//! XSDP walkthrough - the demonstration protocol message.
//!
//! This example demonstrates:
//! - Defining a struct type from a schema (`structdef`)
//! - Inspecting the compiled layout
//! - Field access by name, including read-only enforcement
//! - Serializing, and rebuilding an instance from raw bytes
//! - In-place import: filling an existing instance from a byte source
//!
//! XSDP is a 28-byte big-endian message:
//!
//! ```text
//! ┌───────┬─────────┬────────────┬──────────────┬───────────┬──────────┐
//! │ magic │ version │ byte_order │ message_type │ correl_id │ data     │
//! │ 4s    │ 2B      │ B          │ B            │ L         │ 16s      │
//! └───────┴─────────┴────────────┴──────────────┴───────────┴──────────┘
//! ```

use std::io::Cursor;

use wirestruct::{io, structdef, ByteOrder, ElementType, FieldSpec, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile the message type once; it is reused for every instance.
    let xsdp_message = structdef(
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
    )?;

    println!("compiled type:\n{}", xsdp_message);

    // A fresh instance carries the defaults, zero elsewhere.
    let mut msg = xsdp_message.new_instance();
    println!("default instance:\n{}", msg);

    // Field writes encode straight into the buffer.
    msg.set("correl_id", 0x01020304u32)?;
    msg.set("data", "Hello, World !")?;
    println!("correl_id = {}", msg.get("correl_id")?);

    // Read-only fields reject writes.
    match msg.set("magic", "XXXX") {
        Err(e) => println!("set magic -> {}", e),
        Ok(_) => unreachable!("magic is read-only"),
    }

    // Serialize and rebuild from the raw bytes.
    let buf = msg.to_bytes();
    println!("serialized {} bytes: {:02x?}", buf.len(), &buf[..]);

    let msg2 = xsdp_message.instance_from_bytes(&buf)?;
    println!("rebuilt from bytes:\n{}", msg2);

    // In-place import: fill an existing instance from a byte source
    // without allocating a new one.
    let mut msg3 = xsdp_message.new_instance();
    io::read_into(&mut msg3, &mut Cursor::new(buf))?;
    println!("read into existing instance:\n{}", msg3);

    Ok(())
}
