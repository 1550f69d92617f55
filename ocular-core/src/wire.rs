//! Primitive wire codec — fixed-width integers, one-byte enum ordinals
//! and length-prefixed byte buffers over a duplex byte stream.
//!
//! All multi-byte integers travel in network byte order (big-endian).
//! Every read in the crate is built on a single partial-read-tolerant
//! primitive, [`read_fully`]; nothing else loops on the stream.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::OcularError;

/// Hard ceiling on any length-prefixed field (64 MiB).
///
/// Enforced both at message construction and at decode, before any
/// allocation, so a malformed length can never pin the reader to an
/// unbounded read.
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

// ── Full-frame reader ────────────────────────────────────────────

/// Fill `buf` completely from `reader`, or fail.
///
/// Accumulates bytes across as many partial reads as the stream needs.
/// `Ok(0)` from the stream is end-of-stream: if any byte of the frame
/// is still missing, the result is [`OcularError::Truncated`] — a
/// partial frame is never surfaced as data. `ErrorKind::Interrupted`
/// is transient and retried; a readable-but-empty stream simply leaves
/// the future pending.
pub async fn read_fully<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), OcularError>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => {
                return Err(OcularError::Truncated {
                    expected: buf.len(),
                    got: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(OcularError::Io(e)),
        }
    }
    Ok(())
}

// ── Reads ────────────────────────────────────────────────────────

pub async fn read_u8<R>(reader: &mut R) -> Result<u8, OcularError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 1];
    read_fully(reader, &mut buf).await?;
    Ok(buf[0])
}

pub async fn read_i32<R>(reader: &mut R) -> Result<i32, OcularError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 4];
    read_fully(reader, &mut buf).await?;
    Ok(i32::from_be_bytes(buf))
}

/// Read a one-byte enum ordinal and map it to its variant.
///
/// An ordinal outside the known range fails with
/// [`OcularError::UnknownVariant`] carrying the raw byte — decoding
/// never guesses or clamps.
pub async fn read_enum<T, R>(reader: &mut R) -> Result<T, OcularError>
where
    T: TryFrom<u8, Error = OcularError>,
    R: AsyncRead + Unpin,
{
    T::try_from(read_u8(reader).await?)
}

/// Read a 32-bit length then exactly that many raw bytes.
pub async fn read_length_prefixed<R>(reader: &mut R) -> Result<Vec<u8>, OcularError>
where
    R: AsyncRead + Unpin,
{
    let len = read_i32(reader).await?;
    if len < 0 {
        return Err(OcularError::NegativeLength(len));
    }
    let len = len as usize;
    if len > MAX_PAYLOAD_SIZE {
        return Err(OcularError::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    let mut buf = vec![0u8; len];
    read_fully(reader, &mut buf).await?;
    Ok(buf)
}

// ── Writes ───────────────────────────────────────────────────────

pub async fn write_u8<W>(writer: &mut W, value: u8) -> Result<(), OcularError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&[value]).await?;
    Ok(())
}

pub async fn write_i32<W>(writer: &mut W, value: i32) -> Result<(), OcularError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&value.to_be_bytes()).await?;
    Ok(())
}

/// Write an enum as its one-byte ordinal.
///
/// Every enumerable wire type has at most 256 variants.
pub async fn write_enum<W>(writer: &mut W, ordinal: u8) -> Result<(), OcularError>
where
    W: AsyncWrite + Unpin,
{
    write_u8(writer, ordinal).await
}

/// Write a 32-bit length followed by the raw bytes.
pub async fn write_length_prefixed<W>(writer: &mut W, bytes: &[u8]) -> Result<(), OcularError>
where
    W: AsyncWrite + Unpin,
{
    if bytes.len() > MAX_PAYLOAD_SIZE {
        return Err(OcularError::PayloadTooLarge {
            size: bytes.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }
    write_i32(writer, bytes.len() as i32).await?;
    writer.write_all(bytes).await?;
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn i32_roundtrip_big_endian() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 0x0102_0304).await.unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);

        let mut slice = buf.as_slice();
        assert_eq!(read_i32(&mut slice).await.unwrap(), 0x0102_0304);
    }

    #[tokio::test]
    async fn negative_i32_roundtrip() {
        let mut buf = Vec::new();
        write_i32(&mut buf, -42).await.unwrap();
        let mut slice = buf.as_slice();
        assert_eq!(read_i32(&mut slice).await.unwrap(), -42);
    }

    #[tokio::test]
    async fn read_fully_across_arbitrary_chunks() {
        // 10 bytes delivered as 1 + 4 + 2 + 3.
        let mut mock = Builder::new()
            .read(&[0])
            .read(&[1, 2, 3, 4])
            .read(&[5, 6])
            .read(&[7, 8, 9])
            .build();

        let mut buf = [0u8; 10];
        read_fully(&mut mock, &mut buf).await.unwrap();
        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[tokio::test]
    async fn read_fully_detects_truncation() {
        let mut mock = Builder::new().read(&[1, 2, 3]).build();

        let mut buf = [0u8; 8];
        let err = read_fully(&mut mock, &mut buf).await.unwrap_err();
        match err {
            OcularError::Truncated { expected, got } => {
                assert_eq!(expected, 8);
                assert_eq!(got, 3);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn interrupted_reads_are_retried() {
        let mut mock = Builder::new()
            .read(&[1, 2])
            .read_error(std::io::Error::new(
                std::io::ErrorKind::Interrupted,
                "signal",
            ))
            .read(&[3, 4])
            .build();

        let mut buf = [0u8; 4];
        read_fully(&mut mock, &mut buf).await.unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn length_prefixed_roundtrip() {
        let payload = vec![0xAB; 300];
        let mut buf = Vec::new();
        write_length_prefixed(&mut buf, &payload).await.unwrap();
        assert_eq!(buf.len(), 4 + 300);

        let mut slice = buf.as_slice();
        let decoded = read_length_prefixed(&mut slice).await.unwrap();
        assert_eq!(decoded, payload);
    }

    #[tokio::test]
    async fn negative_length_rejected() {
        let mut buf = Vec::new();
        write_i32(&mut buf, -1).await.unwrap();
        let mut slice = buf.as_slice();
        let err = read_length_prefixed(&mut slice).await.unwrap_err();
        assert!(matches!(err, OcularError::NegativeLength(-1)));
    }

    #[tokio::test]
    async fn oversized_length_rejected_before_reading() {
        // Declared length far above the cap; no payload bytes follow.
        // The decode must fail on the length alone, without hanging.
        let mut buf = Vec::new();
        write_i32(&mut buf, i32::MAX).await.unwrap();
        let mut slice = buf.as_slice();
        let err = read_length_prefixed(&mut slice).await.unwrap_err();
        assert!(matches!(err, OcularError::PayloadTooLarge { .. }));
    }

    #[tokio::test]
    async fn length_prefixed_truncated_payload() {
        // Declares 8 bytes, delivers 3, then end-of-stream.
        let mut mock = Builder::new()
            .read(&[0, 0, 0, 8])
            .read(&[1, 2, 3])
            .build();
        let err = read_length_prefixed(&mut mock).await.unwrap_err();
        assert!(matches!(
            err,
            OcularError::Truncated {
                expected: 8,
                got: 3
            }
        ));
    }
}
