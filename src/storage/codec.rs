//! Binary framing for persisted records.
//!
//! Every persisted payload (snapshot map, lazy manifest, per-key record)
//! is serialized as JSON and framed with a version byte, a length
//! prefix, and a CRC32 checksum so corruption is detected at read time
//! instead of producing garbage entries.

use std::io::{Error as IoError, ErrorKind, Read, Result as IoResult, Write};

use crc32fast::Hasher;
use serde::{de::DeserializeOwned, Serialize};

/// Current framing version.
const CODEC_VERSION: u8 = 1;

/// Magic bytes identifying termquery store files.
pub const MAGIC: [u8; 4] = *b"TQDB";

/// Largest accepted payload (16 MB). A terminology store holding more
/// than this in a single frame indicates a corrupt length prefix.
const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Serializes a value into a checksummed frame.
///
/// Format:
/// ```text
/// [version: 1 byte][length: 4 bytes LE][data: N bytes JSON][crc32: 4 bytes LE]
/// ```
pub fn encode<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    let data = serde_json::to_vec(value).map_err(|e| {
        IoError::new(ErrorKind::InvalidData, format!("serialization failed: {e}"))
    })?;

    let mut hasher = Hasher::new();
    hasher.update(&data);
    let crc = hasher.finalize();

    let len =
        u32::try_from(data.len()).map_err(|_| IoError::new(ErrorKind::InvalidData, "frame too large"))?;

    let mut out = Vec::with_capacity(1 + 4 + data.len() + 4);
    out.push(CODEC_VERSION);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&data);
    out.extend_from_slice(&crc.to_le_bytes());

    Ok(out)
}

/// Deserializes a value from a frame, verifying the checksum.
///
/// # Errors
/// Returns `InvalidData` if the version is unknown, the length prefix
/// is implausible, the checksum does not match, or the JSON payload
/// fails to deserialize.
pub fn decode<T: DeserializeOwned>(reader: &mut impl Read) -> IoResult<T> {
    let mut version = [0u8; 1];
    reader.read_exact(&mut version)?;

    if version[0] != CODEC_VERSION {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!(
                "unsupported codec version: {} (expected {CODEC_VERSION})",
                version[0]
            ),
        ));
    }

    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_FRAME_SIZE {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("frame size {len} exceeds maximum {MAX_FRAME_SIZE}"),
        ));
    }

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data)?;

    let mut crc_bytes = [0u8; 4];
    reader.read_exact(&mut crc_bytes)?;
    let stored_crc = u32::from_le_bytes(crc_bytes);

    let mut hasher = Hasher::new();
    hasher.update(&data);
    let computed_crc = hasher.finalize();

    if stored_crc != computed_crc {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("CRC mismatch: stored={stored_crc:08x}, computed={computed_crc:08x}"),
        ));
    }

    serde_json::from_slice(&data).map_err(|e| {
        IoError::new(ErrorKind::InvalidData, format!("deserialization failed: {e}"))
    })
}

/// Write the file header (magic + version).
pub fn write_header(writer: &mut impl Write) -> IoResult<()> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&[CODEC_VERSION])?;
    Ok(())
}

/// Read and validate the file header, returning the version byte.
pub fn read_header(reader: &mut impl Read) -> IoResult<u8> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;

    if magic != MAGIC {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("invalid magic bytes: expected {MAGIC:?}, got {magic:?}"),
        ));
    }

    let mut version = [0u8; 1];
    reader.read_exact(&mut version)?;

    Ok(version[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    use crate::entry::{Entry, TermType};

    #[test]
    fn test_roundtrip_simple() {
        let value = "hello, terminology".to_string();
        let encoded = encode(&value).unwrap();

        let mut cursor = Cursor::new(encoded);
        let decoded: String = decode(&mut cursor).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn test_roundtrip_entry_map() {
        let mut map = BTreeMap::new();
        map.insert(
            "quick".to_string(),
            Entry::new(
                vec!["fast".to_string()],
                TermType::Adjective,
                "moving with speed",
                vec!["speedy".to_string()],
            ),
        );

        let encoded = encode(&map).unwrap();
        let mut cursor = Cursor::new(encoded);
        let decoded: BTreeMap<String, Entry> = decode(&mut cursor).unwrap();

        assert_eq!(map, decoded);
    }

    #[test]
    fn test_detects_corruption() {
        let value = "test data".to_string();
        let mut encoded = encode(&value).unwrap();

        // Flip a byte in the data section
        encoded[7] ^= 0xFF;

        let mut cursor = Cursor::new(encoded);
        let result: IoResult<String> = decode(&mut cursor);

        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_oversized_frame() {
        let mut bad_data = vec![CODEC_VERSION];
        bad_data.extend_from_slice(&(100_000_000u32).to_le_bytes());

        let mut cursor = Cursor::new(bad_data);
        let result: IoResult<String> = decode(&mut cursor);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let value = "x".to_string();
        let mut encoded = encode(&value).unwrap();
        encoded[0] = 99;

        let mut cursor = Cursor::new(encoded);
        let result: IoResult<String> = decode(&mut cursor);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("version"));
    }

    #[test]
    fn test_header_roundtrip() {
        let mut buf = Vec::new();
        write_header(&mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let version = read_header(&mut cursor).unwrap();

        assert_eq!(version, CODEC_VERSION);
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let mut cursor = Cursor::new(b"NOPE\x01".to_vec());
        assert!(read_header(&mut cursor).is_err());
    }
}
