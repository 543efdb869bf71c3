//! Spatial weeding of persistent-scatterer candidates.
//!
//! The pass runs four components in sequence over one patch:
//!
//! 1. **Grid index** ([`grid`]): shift candidate grid positions so the minimum
//!    lands at (2, 2), then let each candidate claim the unclaimed cells of a
//!    3×3 look-back window ending at its own cell (centre excluded). First
//!    claimant wins.
//! 2. **Neighbour lists** ([`neighbours`]): a candidate whose window centre was
//!    claimed by an earlier candidate is recorded as that owner's neighbour.
//! 3. **Cluster resolution** ([`cluster`]): connected neighbour clusters are
//!    reduced to their highest-coherence member; optionally points at sea
//!    level are dropped as well.
//! 4. **Coordinate dedup** ([`dedup`]): survivors sharing an identical
//!    projected coordinate are reduced to their highest-coherence member.
//!
//! A fifth, noise-based pass ([`noise`]) is gated by configuration but has no
//! implementation; triggering it is an error unless the caller opts to skip it.

pub mod cluster;
pub mod dedup;
pub mod grid;
pub mod neighbours;
pub mod noise;
pub mod product;
mod stage;

use crate::edgefile::EDGE_FILE_NAME;

pub use noise::NoiseFilterPolicy;
pub use product::{PhaseRows, WeedProduct};

// ── Configuration ───────────────────────────────────────────────────────────

/// Parameters controlling a weeding run.
#[derive(Debug, Clone, PartialEq)]
pub struct WeedConfig {
    /// Reduce each spatial neighbour cluster to one point.
    /// When `false` only the sea-level and duplicate-coordinate passes run.
    /// Default: true
    pub weed_neighbours: bool,

    /// Drop candidates whose height is below `zero_elevation_threshold`.
    /// Useful for coastal scenes where the DEM is zero over water.
    /// Default: false
    pub drop_zero_elevation: bool,

    /// Height (metres) below which a candidate counts as being at sea level.
    /// Default: 1e-6
    pub zero_elevation_threshold: f32,

    /// Standard deviation of phase noise (radians) above which a point would be
    /// dropped. `None` means not configured.
    /// Default: None
    pub noise_standard_dev: Option<f64>,

    /// Maximum phase noise (radians) above which a point would be dropped.
    /// `None` means not configured.
    /// Default: None
    pub noise_max: Option<f64>,

    /// What to do when a noise threshold is configured.
    /// Default: [`NoiseFilterPolicy::Abort`]
    pub noise_policy: NoiseFilterPolicy,

    /// Name of the triangulation edge file inside the patch directory.
    /// Default: `psweed.2.edge`
    pub edge_file_name: String,
}

impl Default for WeedConfig {
    fn default() -> Self {
        Self {
            weed_neighbours: true,
            drop_zero_elevation: false,
            zero_elevation_threshold: 1e-6,
            noise_standard_dev: None,
            noise_max: None,
            noise_policy: NoiseFilterPolicy::Abort,
            edge_file_name: EDGE_FILE_NAME.to_string(),
        }
    }
}

// ── The stage ───────────────────────────────────────────────────────────────

/// The weeding stage for one patch.
///
/// Holds only configuration. All working state (grid index, neighbour lists,
/// mask) is created and dropped inside a single call, so one stage value can
/// process any number of patches, one after the other or from separate threads.
#[derive(Debug, Clone, Default)]
pub struct WeedStage {
    pub config: WeedConfig,
}

impl WeedStage {
    /// Create a stage with the given configuration.
    pub fn new(config: WeedConfig) -> Self {
        Self { config }
    }
}

// ── Result ──────────────────────────────────────────────────────────────────

/// Outcome of a weeding run.
#[derive(Debug, Clone, PartialEq)]
pub struct WeedResult {
    /// `true` for every input candidate that survived all passes.
    pub selectable: Vec<bool>,
    /// Number of input candidates.
    pub num_candidates: usize,
    /// Number of survivors.
    pub num_kept: usize,
    /// Connected neighbour clusters with more than one member.
    pub num_clusters: usize,
    /// Candidates dropped because a better neighbour exists.
    pub dropped_by_neighbours: usize,
    /// Candidates dropped for lying at sea level (and not already dropped).
    pub dropped_by_zero_elevation: usize,
    /// Groups of survivors sharing an identical projected coordinate.
    pub duplicate_groups: usize,
    /// Candidates dropped by the duplicate-coordinate pass.
    pub dropped_by_duplicate_xy: usize,
    /// Whether a noise filter was applied. Always `false` at present.
    pub noise_filter_applied: bool,
    /// Edge count declared by the patch edge file, when one was loaded.
    pub edge_count: Option<usize>,
    /// Wall-clock time spent in the algorithm, in milliseconds.
    pub elapsed_ms: f32,
}

impl WeedResult {
    /// Indices of the surviving candidates, ascending.
    pub fn kept_indices(&self) -> Vec<usize> {
        self.selectable
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect()
    }
}
