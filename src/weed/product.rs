//! Weeded point bundle handed to the next pipeline stage.
//!
//! Serialized with rkyv so the next stage can load it without re-parsing.

use anyhow::Context;
use nalgebra::DMatrix;
use rkyv::{Archive, Deserialize, Serialize};
use tracing::info;

use super::WeedResult;
use crate::{CandidateSet, Phase};

/// Phase matrix flattened row by row into `[re, im]` pairs.
#[derive(Debug, Clone, PartialEq, Default, Archive, Serialize, Deserialize)]
pub struct PhaseRows {
    pub nrows: u32,
    /// Number of interferograms.
    pub ncols: u32,
    pub values: Vec<[f32; 2]>,
}

impl PhaseRows {
    pub fn from_matrix(m: &DMatrix<Phase>) -> Self {
        let values = (0..m.nrows())
            .flat_map(|r| (0..m.ncols()).map(move |c| [m[(r, c)].re, m[(r, c)].im]))
            .collect();
        Self {
            nrows: m.nrows() as u32,
            ncols: m.ncols() as u32,
            values,
        }
    }

    /// Rebuild the matrix; fails if `values` does not hold `nrows × ncols` entries.
    pub fn to_matrix(&self) -> anyhow::Result<DMatrix<Phase>> {
        let (nrows, ncols) = (self.nrows as usize, self.ncols as usize);
        if self.values.len() != nrows * ncols {
            anyhow::bail!(
                "phase rows hold {} values, expected {}x{}",
                self.values.len(),
                nrows,
                ncols
            );
        }
        Ok(DMatrix::from_row_iterator(
            nrows,
            ncols,
            self.values.iter().map(|v| Phase::new(v[0], v[1])),
        ))
    }
}

/// Surviving candidates plus the mask that selected them.
///
/// Per-candidate vectors hold survivors only, in input order; pass-through
/// attributes that were not supplied stay empty.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct WeedProduct {
    /// Full-length mask over the input candidates.
    pub selectable: Vec<bool>,
    /// Input indices of the survivors.
    pub kept_indices: Vec<u32>,
    pub ij: Vec<[i32; 2]>,
    pub xy: Vec<[f64; 2]>,
    pub lonlat: Vec<[f64; 2]>,
    pub coherence: Vec<f32>,
    pub height: Vec<f32>,
    pub ph_res: Vec<f32>,
    pub k_ps: Vec<f32>,
    pub c_ps: Vec<f32>,
    /// Wrapped phase of the survivors.
    pub ph: PhaseRows,
    /// Patch phase of the survivors.
    pub ph_patch: PhaseRows,
    /// Perpendicular baseline per interferogram, unchanged.
    pub bperp: Vec<f32>,
}

impl WeedProduct {
    /// Bundle the survivors of `result` from `candidates`.
    pub fn new(candidates: &CandidateSet, result: &WeedResult) -> anyhow::Result<Self> {
        let kept = candidates
            .select(&result.selectable)
            .context("weed result does not match candidate set")?;
        Ok(Self {
            selectable: result.selectable.clone(),
            kept_indices: result.kept_indices().into_iter().map(|i| i as u32).collect(),
            ij: kept.ij,
            xy: kept.xy,
            lonlat: kept.lonlat,
            coherence: kept.coherence,
            height: kept.height,
            ph_res: kept.ph_res,
            k_ps: kept.k_ps,
            c_ps: kept.c_ps,
            ph: PhaseRows::from_matrix(&kept.ph),
            ph_patch: PhaseRows::from_matrix(&kept.ph_patch),
            bperp: kept.bperp,
        })
    }

    /// Number of interferograms carried by the wrapped phase.
    pub fn num_ifgs(&self) -> usize {
        self.ph.ncols as usize
    }

    /// Number of surviving candidates.
    pub fn len(&self) -> usize {
        self.kept_indices.len()
    }

    /// Return `true` when nothing survived.
    pub fn is_empty(&self) -> bool {
        self.kept_indices.is_empty()
    }

    /// Serialize the product to bytes using rkyv.
    pub fn to_rkyv_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {}", e))?;
        Ok(bytes.to_vec())
    }

    /// Deserialize a product from rkyv bytes.
    pub fn from_rkyv_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        // Archived data must be aligned; a plain byte buffer is not guaranteed to be.
        let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned)
            .map_err(|e| anyhow::anyhow!("rkyv deserialization failed: {}", e))
    }

    /// Save the product to a file.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let bytes = self.to_rkyv_bytes()?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(
            "Saved weeded product to {} ({} points, {} bytes)",
            path.display(),
            self.len(),
            bytes.len()
        );
        Ok(())
    }

    /// Load a product previously written by [`WeedProduct::save_to_file`].
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let product = Self::from_rkyv_bytes(&bytes)?;
        info!("Loaded weeded product: {} points", product.len());
        Ok(product)
    }
}
