//! Native binary model format.
//!
//! A 32-byte header followed by a Postcard-encoded payload. Large payloads
//! are gzip-compressed.
//!
//! # Format Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Header (32 bytes)                        │
//! ├────────────────────────────────────────────────────────────┤
//! │                    Payload (variable)                       │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::model::ModelKind;

// ============================================================================
// Constants
// ============================================================================

/// Magic bytes identifying a solvency model file.
pub const MAGIC: &[u8; 4] = b"SLVC";

/// Current format version (major).
pub const CURRENT_VERSION_MAJOR: u8 = 1;

/// Current format version (minor).
pub const CURRENT_VERSION_MINOR: u8 = 0;

/// Size of the format header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Minimum payload size for auto-compression (32KB).
pub const COMPRESSION_THRESHOLD: usize = 32 * 1024;

// ============================================================================
// Format Flags
// ============================================================================

/// Bitfield flags for format features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatFlags(u16);

impl FormatFlags {
    /// Payload is gzip-compressed.
    pub const COMPRESSED: u16 = 1 << 0;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }
}

// ============================================================================
// Format Header
// ============================================================================

/// 32-byte header for the native format.
///
/// # Layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     Magic ("SLVC")
/// 4       1     Version major
/// 5       1     Version minor
/// 6       1     Model kind
/// 7       1     Reserved
/// 8       2     Flags (bitfield)
/// 10      2     Reserved
/// 12      4     Payload size (bytes)
/// 16      4     CRC32 checksum of payload
/// 20      4     Number of features
/// 24      8     Reserved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub kind: ModelKind,
    pub flags: FormatFlags,
    /// Size of the stored (possibly compressed) payload in bytes.
    pub payload_size: u32,
    /// CRC32 of the stored payload.
    pub checksum: u32,
    pub num_features: u32,
}

impl FormatHeader {
    /// Create a new header with the current version.
    pub fn new(kind: ModelKind, num_features: u32) -> Self {
        Self {
            version_major: CURRENT_VERSION_MAJOR,
            version_minor: CURRENT_VERSION_MINOR,
            kind,
            flags: FormatFlags::empty(),
            payload_size: 0,
            checksum: 0,
            num_features,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.version_major;
        buf[5] = self.version_minor;
        buf[6] = self.kind as u8;
        buf[8..10].copy_from_slice(&self.flags.bits().to_le_bytes());
        buf[12..16].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[16..20].copy_from_slice(&self.checksum.to_le_bytes());
        buf[20..24].copy_from_slice(&self.num_features.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, ReadError> {
        if &buf[0..4] != MAGIC {
            return Err(ReadError::NotAModel);
        }

        let version_major = buf[4];
        let version_minor = buf[5];
        if version_major > CURRENT_VERSION_MAJOR {
            return Err(ReadError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        let kind = ModelKind::from_u8(buf[6])
            .ok_or_else(|| ReadError::CorruptPayload(format!("invalid model kind {}", buf[6])))?;

        Ok(Self {
            version_major,
            version_minor,
            kind,
            flags: FormatFlags::from_bits(u16::from_le_bytes([buf[8], buf[9]])),
            payload_size: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
            checksum: u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]),
            num_features: u32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]),
        })
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while writing a model.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while reading a model.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Wrong magic bytes.
    #[error("not a solvency model file")]
    NotAModel,

    /// Written by a newer format version.
    #[error("model requires format version {major}.{minor} or later")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("file truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    #[error("decoding error: {0}")]
    Decoding(#[from] postcard::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Decoded fine but describes an invalid model.
    #[error("invalid model: {0}")]
    Validation(String),

    /// Header and payload disagree on the model kind.
    #[error("model kind mismatch: header says {expected}, payload holds {actual}")]
    KindMismatch { expected: ModelKind, actual: ModelKind },
}

// ============================================================================
// CRC32 Helper
// ============================================================================

/// Compute CRC32 checksum of data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Read up to `len` bytes, reporting a short read as [`ReadError::Truncated`].
fn read_exactly<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>, ReadError> {
    let mut buf = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(ReadError::Truncated {
            expected: len,
            actual: buf.len(),
        });
    }
    Ok(buf)
}

// ============================================================================
// Native Codec
// ============================================================================

/// Codec for reading and writing the native format.
#[derive(Debug, Clone)]
pub struct NativeCodec {
    /// Whether to compress payloads above [`COMPRESSION_THRESHOLD`].
    pub compress: bool,
    /// gzip level (0-9, default 6).
    pub compression_level: u32,
}

impl Default for NativeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeCodec {
    pub fn new() -> Self {
        Self {
            compress: true,
            compression_level: 6,
        }
    }

    pub fn without_compression() -> Self {
        Self {
            compress: false,
            compression_level: 0,
        }
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    /// Write header and payload to a writer.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        header: &mut FormatHeader,
        payload: &[u8],
    ) -> Result<(), WriteError> {
        let compressed = self.compress && payload.len() >= COMPRESSION_THRESHOLD;
        let stored = if compressed {
            let mut encoder = GzEncoder::new(
                Vec::with_capacity(payload.len() / 2),
                Compression::new(self.compression_level),
            );
            encoder.write_all(payload)?;
            encoder.finish()?
        } else {
            payload.to_vec()
        };

        header.payload_size = u32::try_from(stored.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "payload exceeds 4 GiB")
        })?;
        header.checksum = compute_checksum(&stored);
        if compressed {
            header.flags.set(FormatFlags::COMPRESSED);
        }

        writer.write_all(&header.to_bytes())?;
        writer.write_all(&stored)?;
        Ok(())
    }

    /// Read header and (decompressed) payload from a reader.
    pub fn read_from<R: Read>(&self, reader: &mut R) -> Result<(FormatHeader, Vec<u8>), ReadError> {
        let header_buf = read_exactly(reader, HEADER_SIZE)?;
        let mut fixed = [0u8; HEADER_SIZE];
        fixed.copy_from_slice(&header_buf);
        let header = FormatHeader::from_bytes(&fixed)?;

        let payload = read_exactly(reader, header.payload_size as usize)?;

        let actual = compute_checksum(&payload);
        if actual != header.checksum {
            return Err(ReadError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let payload = if header.flags.contains(FormatFlags::COMPRESSED) {
            let mut out = Vec::with_capacity(payload.len() * 2);
            GzDecoder::new(payload.as_slice())
                .read_to_end(&mut out)
                .map_err(|e| ReadError::CorruptPayload(format!("gzip: {e}")))?;
            out
        } else {
            payload
        };

        Ok((header, payload))
    }

    /// Serialize a payload to bytes with header.
    pub fn serialize<T: serde::Serialize>(
        &self,
        kind: ModelKind,
        num_features: u32,
        payload: &T,
    ) -> Result<Vec<u8>, WriteError> {
        let payload_bytes = postcard::to_allocvec(payload)?;
        let mut header = FormatHeader::new(kind, num_features);
        let mut output = Vec::with_capacity(HEADER_SIZE + payload_bytes.len());
        self.write_to(&mut output, &mut header, &payload_bytes)?;
        Ok(output)
    }

    /// Deserialize a payload from a reader.
    pub fn deserialize<T, R>(&self, reader: &mut R) -> Result<(FormatHeader, T), ReadError>
    where
        T: for<'de> serde::Deserialize<'de>,
        R: Read,
    {
        let (header, payload_bytes) = self.read_from(reader)?;
        let payload = postcard::from_bytes(&payload_bytes)?;
        Ok((header, payload))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = FormatHeader {
            version_major: 1,
            version_minor: 2,
            kind: ModelKind::Forest,
            flags: FormatFlags::from_bits(FormatFlags::COMPRESSED),
            payload_size: 12345,
            checksum: 0xDEADBEEF,
            num_features: 64,
        };

        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"SLVC");
        assert_eq!(bytes[24..32], [0u8; 8]);
        assert_eq!(FormatHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn header_wrong_magic() {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"BSTR");
        assert!(matches!(FormatHeader::from_bytes(&buf), Err(ReadError::NotAModel)));
    }

    #[test]
    fn header_unsupported_version() {
        let mut header = FormatHeader::new(ModelKind::Tree, 3);
        header.version_major = 99;
        let result = FormatHeader::from_bytes(&header.to_bytes());
        assert!(matches!(result, Err(ReadError::UnsupportedVersion { major: 99, .. })));
    }

    #[test]
    fn header_unknown_kind() {
        let mut bytes = FormatHeader::new(ModelKind::Tree, 3).to_bytes();
        bytes[6] = 7;
        assert!(matches!(
            FormatHeader::from_bytes(&bytes),
            Err(ReadError::CorruptPayload(_))
        ));
    }

    #[test]
    fn codec_write_read() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(ModelKind::Logistic, 10);
        let payload = b"test payload data";

        let mut buffer = Vec::new();
        codec.write_to(&mut buffer, &mut header, payload).unwrap();
        assert!(!header.flags.contains(FormatFlags::COMPRESSED));

        let (read_header, read_payload) = codec.read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(read_header.kind, ModelKind::Logistic);
        assert_eq!(read_header.num_features, 10);
        assert_eq!(read_payload, payload);
    }

    #[test]
    fn large_payloads_are_compressed() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(ModelKind::Forest, 1);
        let payload = vec![7u8; COMPRESSION_THRESHOLD * 2];

        let mut buffer = Vec::new();
        codec.write_to(&mut buffer, &mut header, &payload).unwrap();
        assert!(header.flags.contains(FormatFlags::COMPRESSED));
        assert!(buffer.len() < payload.len());

        let (_, read_payload) = codec.read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(read_payload, payload);

        let mut plain = Vec::new();
        let mut header = FormatHeader::new(ModelKind::Forest, 1);
        NativeCodec::without_compression()
            .write_to(&mut plain, &mut header, &payload)
            .unwrap();
        assert!(!header.flags.contains(FormatFlags::COMPRESSED));
        assert_eq!(plain.len(), HEADER_SIZE + payload.len());
    }

    #[test]
    fn codec_detects_corruption() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(ModelKind::Tree, 5);
        let mut buffer = Vec::new();
        codec.write_to(&mut buffer, &mut header, b"some model data").unwrap();

        buffer[HEADER_SIZE + 5] ^= 0xFF;
        let result = codec.read_from(&mut buffer.as_slice());
        assert!(matches!(result, Err(ReadError::ChecksumMismatch { .. })));
    }

    #[test]
    fn codec_detects_truncation() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(ModelKind::Tree, 5);
        let mut buffer = Vec::new();
        codec.write_to(&mut buffer, &mut header, b"some model data").unwrap();

        let short = &buffer[..buffer.len() - 4];
        assert!(matches!(
            codec.read_from(&mut &short[..]),
            Err(ReadError::Truncated { expected: 15, actual: 11 })
        ));
        assert!(matches!(
            codec.read_from(&mut &buffer[..10]),
            Err(ReadError::Truncated { expected: HEADER_SIZE, actual: 10 })
        ));
    }
}
