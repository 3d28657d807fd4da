//! Flat exact-search index over unit-normalized embedding vectors.
//!
//! Stored and query vectors are unit length, so the inner product used
//! here is exactly cosine similarity. Append-only; the scan is exact by
//! contract, not an approximation.

use anyhow::Result;
use passagedb_core::error::Error;

pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// An empty index of the given dimension. Dimension zero cannot
    /// hold vectors and is rejected up front.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(
                Error::InvalidConfig("embedding dimension must be non-zero".to_string()).into()
            );
        }
        Ok(Self { dim, data: Vec::new() })
    }

    /// Rebuild from raw row-major storage, e.g. a loaded snapshot.
    pub(crate) fn from_raw(dim: usize, data: Vec<f32>) -> Result<Self> {
        if dim == 0 || data.len() % dim != 0 {
            return Err(Error::SnapshotCorrupt(format!(
                "raw vector data of {} floats is not a multiple of dim {}",
                data.len(),
                dim
            ))
            .into());
        }
        Ok(Self { dim, data })
    }

    pub(crate) fn raw(&self) -> &[f32] {
        &self.data
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        let start = i.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    /// Append `vectors` in order. Every vector must have the index
    /// dimension.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        for v in vectors {
            if v.len() != self.dim {
                return Err(Error::DimensionMismatch { expected: self.dim, actual: v.len() }.into());
            }
        }
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    /// Exact top-k by inner product, descending; ties broken by lower
    /// position. Returns fewer than `k` pairs when the index is small,
    /// and an empty vec when it is empty.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            return Err(
                Error::DimensionMismatch { expected: self.dim, actual: query.len() }.into()
            );
        }
        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| row.iter().zip(query.iter()).map(|(a, b)| a * b).sum::<f32>())
            .enumerate()
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

/// Scale `v` to unit length in place. A zero or non-finite norm cannot
/// be normalized and is an error.
pub fn l2_normalize(v: &mut [f32]) -> Result<()> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if !norm.is_finite() || norm <= f32::EPSILON {
        return Err(Error::ZeroNormEmbedding.into());
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    Ok(())
}
