//! Byte-sink and byte-source interop for instances.
//!
//! The adapter moves whole buffers, never fields:
//!
//! - **Export**: hand an instance's bytes to a sink verbatim - the same
//!   bytes [`Instance::to_bytes`] would produce, without the copy-out.
//! - **In-place import**: request exactly `instance.size()` bytes from a
//!   source and overwrite the instance's buffer with them. No new
//!   instance is allocated and no field-level validation occurs.
//!
//! Imports fail atomically: incoming bytes are staged and copied into
//! the instance only once all of them have arrived, so a short read
//! ([`StructError::SizeMismatch`]) leaves the buffer bit-identical -
//! never a mix of old and new bytes. Retry-until-full is a caller-level
//! policy layered on top.
//!
//! Both `std::io` and `tokio::io` endpoints are supported; the two
//! halves are byte-for-byte equivalent.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use wirestruct::{structdef, io, ByteOrder, ElementType, FieldSpec};
//!
//! let ty = structdef(
//!     ByteOrder::Big,
//!     vec![FieldSpec::new("id", ElementType::U32, 1)],
//! )
//! .unwrap();
//!
//! let mut msg = ty.new_instance();
//! msg.set("id", 7u32).unwrap();
//!
//! let mut sink = Vec::new();
//! io::write_to(&msg, &mut sink).unwrap();
//!
//! let mut received = ty.new_instance();
//! io::read_into(&mut received, &mut Cursor::new(sink)).unwrap();
//! assert_eq!(received.get("id").unwrap().as_uint(), Some(7));
//! ```

use std::io::{ErrorKind, Read, Write};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, StructError};
use crate::instance::Instance;

/// Write the instance's bytes to a sink and flush.
///
/// # Errors
///
/// [`StructError::Io`] on sink failure.
pub fn write_to<W: Write>(instance: &Instance, sink: &mut W) -> Result<()> {
    sink.write_all(instance.as_bytes())?;
    sink.flush()?;
    Ok(())
}

/// Overwrite the instance's buffer with exactly `instance.size()` bytes
/// from a source, in place.
///
/// # Errors
///
/// [`StructError::SizeMismatch`] when the source is exhausted early
/// (reporting how many bytes it could supply), [`StructError::Io`] on
/// source failure. The buffer is unchanged in both cases.
pub fn read_into<R: Read>(instance: &mut Instance, source: &mut R) -> Result<()> {
    let expected = instance.size();
    let mut staged = vec![0u8; expected];
    let mut filled = 0;

    while filled < expected {
        match source.read(&mut staged[filled..]) {
            Ok(0) => {
                return Err(StructError::SizeMismatch {
                    expected,
                    actual: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    instance.as_bytes_mut().copy_from_slice(&staged);
    tracing::debug!("in-place import filled {} bytes", expected);
    Ok(())
}

/// Async variant of [`write_to`].
///
/// # Errors
///
/// [`StructError::Io`] on sink failure.
pub async fn write_to_async<W>(instance: &Instance, sink: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    sink.write_all(instance.as_bytes()).await?;
    sink.flush().await?;
    Ok(())
}

/// Async variant of [`read_into`]. Same atomic-failure contract.
///
/// # Errors
///
/// [`StructError::SizeMismatch`] on a short source, [`StructError::Io`]
/// on source failure; the buffer is unchanged in both cases.
pub async fn read_into_async<R>(instance: &mut Instance, source: &mut R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let expected = instance.size();
    let mut staged = vec![0u8; expected];
    let mut filled = 0;

    while filled < expected {
        let n = source.read(&mut staged[filled..]).await?;
        if n == 0 {
            return Err(StructError::SizeMismatch {
                expected,
                actual: filled,
            });
        }
        filled += n;
    }

    instance.as_bytes_mut().copy_from_slice(&staged);
    tracing::debug!("in-place import filled {} bytes", expected);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::schema::{ByteOrder, FieldSpec};
    use crate::struct_type::{structdef, StructType};
    use crate::types::{ElementType, Value};

    fn sample_type() -> StructType {
        structdef(
            ByteOrder::Big,
            vec![
                FieldSpec::new("magic", ElementType::Str, 4)
                    .with_default("XSDP")
                    .read_only(),
                FieldSpec::new("correl_id", ElementType::U32, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_to_emits_exact_buffer() {
        let mut msg = sample_type().new_instance();
        msg.set("correl_id", 0x01020304u32).unwrap();

        let mut sink = Vec::new();
        write_to(&msg, &mut sink).unwrap();

        assert_eq!(sink.len(), msg.size());
        assert_eq!(sink, msg.as_bytes());
    }

    #[test]
    fn test_read_into_round_trip() {
        let ty = sample_type();
        let mut original = ty.new_instance();
        original.set("correl_id", 99u32).unwrap();

        let mut received = ty.new_instance();
        read_into(&mut received, &mut Cursor::new(original.to_bytes())).unwrap();

        assert_eq!(received.as_bytes(), original.as_bytes());
        assert_eq!(received.get("correl_id").unwrap(), Value::Uint(99));
    }

    #[test]
    fn test_short_read_fails_atomically() {
        let ty = sample_type();
        let mut msg = ty.new_instance();
        msg.set("correl_id", 7u32).unwrap();
        let before = msg.to_bytes();

        // Source holds 3 of the required 8 bytes.
        let result = read_into(&mut msg, &mut Cursor::new(vec![0xFFu8; 3]));
        match result {
            Err(StructError::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 3);
            }
            other => panic!("expected SizeMismatch, got {:?}", other),
        }

        // Not a single byte of the instance changed.
        assert_eq!(msg.to_bytes(), before);
    }

    #[test]
    fn test_read_into_consumes_only_what_it_needs() {
        let ty = sample_type();
        let mut msg = ty.new_instance();

        let mut source = Cursor::new(vec![0x01u8; 12]); // 8 needed, 12 available
        read_into(&mut msg, &mut source).unwrap();

        assert_eq!(source.position(), 8);
        assert_eq!(msg.get("correl_id").unwrap(), Value::Uint(0x01010101));
    }

    #[test]
    fn test_zero_size_instance_io_is_noop() {
        let ty = structdef(ByteOrder::Big, vec![]).unwrap();
        let mut msg = ty.new_instance();

        let mut sink = Vec::new();
        write_to(&msg, &mut sink).unwrap();
        assert!(sink.is_empty());

        read_into(&mut msg, &mut Cursor::new(Vec::new())).unwrap();
    }

    #[tokio::test]
    async fn test_async_round_trip_over_duplex() {
        let ty = sample_type();
        let mut sent = ty.new_instance();
        sent.set("correl_id", 0xDEADBEEFu32).unwrap();

        let (mut client, mut server) = tokio::io::duplex(64);
        write_to_async(&sent, &mut client).await.unwrap();

        let mut received = ty.new_instance();
        read_into_async(&mut received, &mut server).await.unwrap();

        assert_eq!(received.as_bytes(), sent.as_bytes());
    }

    #[tokio::test]
    async fn test_async_short_read_fails_atomically() {
        let ty = sample_type();
        let mut msg = ty.new_instance();
        let before = msg.to_bytes();

        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(&[0u8; 5]).await.unwrap();
        drop(client); // EOF after 5 of 8 bytes

        let result = read_into_async(&mut msg, &mut server).await;
        assert!(matches!(
            result,
            Err(StructError::SizeMismatch {
                expected: 8,
                actual: 5
            })
        ));
        assert_eq!(msg.to_bytes(), before);
    }

    #[tokio::test]
    async fn test_sync_and_async_streams_are_identical() {
        let ty = sample_type();
        let mut msg = ty.new_instance();
        msg.set("correl_id", 0x0A0B0C0Du32).unwrap();

        let mut sync_sink = Vec::new();
        write_to(&msg, &mut sync_sink).unwrap();

        let mut async_sink = Vec::new();
        write_to_async(&msg, &mut async_sink).await.unwrap();

        assert_eq!(sync_sink, async_sink);
    }
}
