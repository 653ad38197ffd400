//! Model persistence.
//!
//! Two encodings of the same [`payload`] types:
//!
//! - the native binary format ([`native`]): header, CRC32 checksum,
//!   Postcard payload, gzip above 32 KiB;
//! - JSON, for inspection and hand-written fixtures.
//!
//! ```no_run
//! use solvency::model::Model;
//!
//! let model = Model::load("model.slvc")?;
//! model.save_json("model.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::model::Model;

mod convert;
pub mod native;
pub mod payload;

pub use native::{
    FormatFlags, FormatHeader, NativeCodec, ReadError, WriteError, CURRENT_VERSION_MAJOR,
    CURRENT_VERSION_MINOR, HEADER_SIZE, MAGIC,
};
pub use payload::{
    ForestPayload, LogisticPayload, MetadataPayload, ModelPayload, Payload, PayloadV1, TreePayload,
};

fn into_model(payload: Payload) -> Result<Model, ReadError> {
    let Payload::V1(v1) = payload;
    Model::try_from(v1)
}

// ============================================================================
// Native format
// ============================================================================

impl Model {
    /// Load a model from a file in the native format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }

    /// Read a model in the native format.
    ///
    /// Beyond the checksum, the header's kind and feature count must agree
    /// with the decoded payload.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ReadError> {
        let (header, payload): (_, Payload) = NativeCodec::new().deserialize(reader)?;
        let model = into_model(payload)?;

        let actual = model.kind();
        if header.kind != actual {
            return Err(ReadError::KindMismatch {
                expected: header.kind,
                actual,
            });
        }
        if header.num_features as usize != model.n_features() {
            return Err(ReadError::Validation(format!(
                "header declares {} features, payload has {}",
                header.num_features,
                model.n_features()
            )));
        }
        Ok(model)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReadError> {
        Self::read_from(&mut &bytes[..])
    }

    /// Save the model to a file in the native format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), WriteError> {
        self.write_with(writer, &NativeCodec::new())
    }

    /// Write with explicit codec settings (e.g. compression off).
    pub fn write_with<W: Write>(&self, writer: &mut W, codec: &NativeCodec) -> Result<(), WriteError> {
        let payload = Payload::V1(PayloadV1::from(self));
        let bytes = codec.serialize(self.kind(), self.n_features() as u32, &payload)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WriteError> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}

// ============================================================================
// JSON format
// ============================================================================

impl Model {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let reader = BufReader::new(File::open(path)?);
        Self::read_json(reader)
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self, ReadError> {
        let payload: Payload = serde_json::from_reader(reader)?;
        into_model(payload)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        let payload = Payload::V1(PayloadV1::from(self));
        serde_json::to_writer_pretty(writer, &payload)?;
        Ok(())
    }
}
