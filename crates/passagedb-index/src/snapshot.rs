//! Durable snapshot of the (vector index, document store) pair.
//!
//! Two artifacts live side by side in one directory and are only valid
//! together: `vectors.bin` carries a fixed header (magic, format
//! version, dimension, count) followed by raw little-endian f32 rows,
//! and `passages.json` carries the position-aligned passage records.
//! Writes stage both artifacts as temp files in the destination
//! directory before renaming either, so a failed save never leaves a
//! truncated or mixed pair behind.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use passagedb_core::error::Error;
use passagedb_core::types::Passage;

use crate::flat::FlatIndex;
use crate::store::DocumentStore;

const MAGIC: &[u8; 4] = b"PDBV";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

pub const VECTORS_FILE: &str = "vectors.bin";
pub const PASSAGES_FILE: &str = "passages.json";

pub struct Snapshot {
    pub index: FlatIndex,
    pub store: DocumentStore,
}

/// Write the pair to `dir`. All-or-nothing: both artifacts are staged
/// before either is renamed into place.
pub fn save(dir: &Path, index: &FlatIndex, store: &DocumentStore) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating snapshot dir {}", dir.display()))?;

    let mut vectors_tmp = NamedTempFile::new_in(dir)?;
    vectors_tmp.write_all(&encode_vectors(index))?;
    vectors_tmp.as_file().sync_all()?;

    let mut passages_tmp = NamedTempFile::new_in(dir)?;
    passages_tmp.write_all(&serde_json::to_vec(store.passages())?)?;
    passages_tmp.as_file().sync_all()?;

    vectors_tmp
        .persist(dir.join(VECTORS_FILE))
        .with_context(|| "persisting vector artifact")?;
    passages_tmp
        .persist(dir.join(PASSAGES_FILE))
        .with_context(|| "persisting passage artifact")?;
    Ok(())
}

/// Load the pair from `dir`. A directory with neither artifact is an
/// empty (valid) state; exactly one artifact present is rejected.
pub fn load(dir: &Path) -> Result<Option<Snapshot>> {
    let vectors_path = dir.join(VECTORS_FILE);
    let passages_path = dir.join(PASSAGES_FILE);
    match (vectors_path.exists(), passages_path.exists()) {
        (false, false) => Ok(None),
        (true, true) => {
            let index = decode_vectors(&fs::read(&vectors_path)?)?;
            let passages: Vec<Passage> = serde_json::from_slice(&fs::read(&passages_path)?)
                .with_context(|| format!("parsing {}", passages_path.display()))?;
            if passages.len() != index.len() {
                return Err(Error::SnapshotCorrupt(format!(
                    "{} vectors but {} passages",
                    index.len(),
                    passages.len()
                ))
                .into());
            }
            Ok(Some(Snapshot { index, store: DocumentStore::from_passages(passages) }))
        }
        (present_vectors, _) => {
            let missing = if present_vectors { PASSAGES_FILE } else { VECTORS_FILE };
            Err(Error::SnapshotIncomplete(format!(
                "{} missing from {}",
                missing,
                dir.display()
            ))
            .into())
        }
    }
}

fn encode_vectors(index: &FlatIndex) -> Vec<u8> {
    let raw = index.raw();
    let mut out = Vec::with_capacity(HEADER_LEN + raw.len() * 4);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(index.dim() as u32).to_le_bytes());
    out.extend_from_slice(&(index.len() as u64).to_le_bytes());
    for x in raw {
        out.extend_from_slice(&x.to_le_bytes());
    }
    out
}

fn decode_vectors(buf: &[u8]) -> Result<FlatIndex> {
    if buf.len() < HEADER_LEN || buf[..4] != *MAGIC {
        return Err(Error::SnapshotCorrupt("bad magic or truncated header".to_string()).into());
    }
    let version = read_u32(buf, 4)?;
    if version != FORMAT_VERSION {
        return Err(Error::SnapshotCorrupt(format!(
            "unsupported format version {version}"
        ))
        .into());
    }
    let dim = read_u32(buf, 8)? as usize;
    let count = read_u64(buf, 12)? as usize;
    let payload = &buf[HEADER_LEN..];
    let expected_bytes = dim
        .checked_mul(count)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| Error::SnapshotCorrupt("header overflow".to_string()))?;
    if payload.len() != expected_bytes {
        return Err(Error::SnapshotCorrupt(format!(
            "payload of {} bytes, header promised {}",
            payload.len(),
            expected_bytes
        ))
        .into());
    }
    let data: Vec<f32> = payload
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    FlatIndex::from_raw(dim, data)
}

fn read_u32(buf: &[u8], at: usize) -> Result<u32> {
    buf.get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| Error::SnapshotCorrupt("truncated header".to_string()).into())
}

fn read_u64(buf: &[u8], at: usize) -> Result<u64> {
    buf.get(at..at + 8)
        .and_then(|b| b.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| Error::SnapshotCorrupt("truncated header".to_string()).into())
}
