//! Persistent-scatterer candidates as handed over by the selection stage.
//!
//! Candidates are stored as a struct of arrays: every per-candidate vector
//! shares one index order, so a boolean mask computed by the weeding pass can
//! be projected through all of them at once.

use nalgebra::{Complex, DMatrix};

use crate::WeedError;

/// Complex interferometric phase sample.
pub type Phase = Complex<f32>;

/// A set of candidate scatterers in a single consistent index order.
///
/// Only `ij`, `xy`, `coherence` and `height` are interpreted by the weeding
/// algorithm. The remaining attributes are carried through so the surviving
/// subset can be handed to the next stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSet {
    /// Grid position `[row, column]` in the radar image. Need not start at (0, 0).
    pub ij: Vec<[i32; 2]>,
    /// Projected ground coordinate `[x, y]`, used for exact-duplicate detection.
    pub xy: Vec<[f64; 2]>,
    /// Quality score; higher is better.
    pub coherence: Vec<f32>,
    /// Elevation estimate. May be empty, which disables sea-level dropping.
    pub height: Vec<f32>,
    /// Geographic `[lon, lat]` in degrees. Empty when not supplied.
    pub lonlat: Vec<[f64; 2]>,
    /// Phase residual per candidate. Empty when not supplied.
    pub ph_res: Vec<f32>,
    /// Look-angle error estimate per candidate. Empty when not supplied.
    pub k_ps: Vec<f32>,
    /// Constant phase offset per candidate. Empty when not supplied.
    pub c_ps: Vec<f32>,
    /// Wrapped phase, one row per candidate and one column per interferogram.
    pub ph: DMatrix<Phase>,
    /// Spatially filtered patch phase, same layout as `ph`.
    pub ph_patch: DMatrix<Phase>,
    /// Perpendicular baseline per interferogram (not per candidate).
    pub bperp: Vec<f32>,
}

impl CandidateSet {
    /// Create a set from the attributes the weeding pass interprets.
    ///
    /// Pass-through attributes start out empty and phase matrices have zero
    /// columns; fill them in before calling [`CandidateSet::select`] if the
    /// downstream stage needs them.
    pub fn new(
        ij: Vec<[i32; 2]>,
        xy: Vec<[f64; 2]>,
        coherence: Vec<f32>,
        height: Vec<f32>,
    ) -> Self {
        let n = ij.len();
        Self {
            ij,
            xy,
            coherence,
            height,
            lonlat: Vec::new(),
            ph_res: Vec::new(),
            k_ps: Vec::new(),
            c_ps: Vec::new(),
            ph: DMatrix::from_element(n, 0, Phase::new(0.0, 0.0)),
            ph_patch: DMatrix::from_element(n, 0, Phase::new(0.0, 0.0)),
            bperp: Vec::new(),
        }
    }

    /// An empty set.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.ij.len()
    }

    /// Return `true` when the set holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.ij.is_empty()
    }

    /// Number of interferograms carried by the phase matrices.
    pub fn num_ifgs(&self) -> usize {
        self.ph.ncols()
    }

    /// Check that every attribute agrees on the candidate count and that
    /// coherence is finite.
    pub fn validate(&self) -> Result<(), WeedError> {
        let n = self.len();
        check_len("xy", n, self.xy.len(), false)?;
        check_len("coherence", n, self.coherence.len(), false)?;
        check_len("height", n, self.height.len(), true)?;
        check_len("lonlat", n, self.lonlat.len(), true)?;
        check_len("ph_res", n, self.ph_res.len(), true)?;
        check_len("k_ps", n, self.k_ps.len(), true)?;
        check_len("c_ps", n, self.c_ps.len(), true)?;
        check_len("ph", n, self.ph.nrows(), false)?;
        check_len("ph_patch", n, self.ph_patch.nrows(), false)?;

        if let Some(index) = self.coherence.iter().position(|c| !c.is_finite()) {
            return Err(WeedError::NonFiniteCoherence { index });
        }
        Ok(())
    }

    /// Project every per-candidate attribute through `mask`, keeping the
    /// entries flagged `true` in their original order.
    pub fn select(&self, mask: &[bool]) -> Result<CandidateSet, WeedError> {
        self.validate()?;
        check_len("mask", self.len(), mask.len(), false)?;

        let keep: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect();

        Ok(CandidateSet {
            ij: pick(&self.ij, &keep),
            xy: pick(&self.xy, &keep),
            coherence: pick(&self.coherence, &keep),
            height: pick(&self.height, &keep),
            lonlat: pick(&self.lonlat, &keep),
            ph_res: pick(&self.ph_res, &keep),
            k_ps: pick(&self.k_ps, &keep),
            c_ps: pick(&self.c_ps, &keep),
            ph: self.ph.select_rows(keep.iter()),
            ph_patch: self.ph_patch.select_rows(keep.iter()),
            bperp: self.bperp.clone(),
        })
    }
}

/// Gather `keep` from `values`; an absent (empty) attribute stays empty.
fn pick<T: Copy>(values: &[T], keep: &[usize]) -> Vec<T> {
    if values.is_empty() {
        return Vec::new();
    }
    keep.iter().map(|&i| values[i]).collect()
}

fn check_len(
    field: &'static str,
    expected: usize,
    found: usize,
    optional: bool,
) -> Result<(), WeedError> {
    if found == expected || (optional && found == 0) {
        Ok(())
    } else {
        Err(WeedError::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}
