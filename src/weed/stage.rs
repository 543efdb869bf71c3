//! Stage entry points: run the weeding components in order over one patch.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use super::cluster::{drop_zero_elevation, select_best};
use super::dedup::drop_duplicate_xy;
use super::grid::{shift_positions, GridIndex};
use super::neighbours::NeighbourLists;
use super::noise::drop_noisy;
use super::{WeedResult, WeedStage};
use crate::edgefile::EdgeFile;
use crate::{CandidateSet, WeedError};

impl WeedStage {
    /// Weed the candidates of one patch.
    ///
    /// The patch directory must contain the triangulation edge file named by
    /// [`WeedConfig::edge_file_name`](super::WeedConfig::edge_file_name); it is
    /// loaded before any candidate is processed and its absence aborts the run.
    pub fn run_for_patch<P: AsRef<Path>>(
        &self,
        patch_dir: P,
        candidates: &CandidateSet,
    ) -> Result<WeedResult, WeedError> {
        let edges = EdgeFile::load(patch_dir.as_ref().join(&self.config.edge_file_name))?;
        info!(
            "Loaded edge file: {} edges declared, {} listed",
            edges.declared_count,
            edges.len()
        );
        let mut result = self.run(candidates)?;
        result.edge_count = Some(edges.declared_count);
        Ok(result)
    }

    /// Weed an in-memory candidate set.
    ///
    /// Returns a mask over `candidates`; use [`CandidateSet::select`] to
    /// project the survivors. An empty set yields an empty mask.
    ///
    /// With neighbour weeding enabled, memory use is dense in the extent of
    /// the grid positions: the grid index holds `rows × cols` cells for the
    /// bounding box of `candidates.ij`, however sparse the candidates are.
    /// Callers bound it by choosing the patch size. An extent too large to
    /// index fails with [`WeedError::GridTooLarge`].
    pub fn run(&self, candidates: &CandidateSet) -> Result<WeedResult, WeedError> {
        let t0 = Instant::now();
        let config = &self.config;
        candidates.validate()?;
        let n = candidates.len();
        info!("Weeding {} candidates", n);

        let mut selectable = vec![true; n];

        let mut num_clusters = 0;
        let mut dropped_by_neighbours = 0;
        if config.weed_neighbours {
            let shifted = shift_positions(&candidates.ij);
            let grid = GridIndex::build(&shifted)?;
            debug!(
                "Grid index {}x{}, {} cells claimed",
                grid.rows(),
                grid.cols(),
                grid.num_claimed()
            );

            let neighbours = NeighbourLists::find(&grid, &shifted)?;
            debug!(
                "Neighbour lists: {} edges from {} owners",
                neighbours.num_edges(),
                neighbours.num_owners()
            );

            let stats = select_best(&neighbours, &candidates.coherence, &mut selectable);
            num_clusters = stats.num_clusters;
            dropped_by_neighbours = stats.dropped;
        }

        let mut dropped_by_zero_elevation = 0;
        if config.drop_zero_elevation && !candidates.height.is_empty() {
            dropped_by_zero_elevation = drop_zero_elevation(
                &candidates.height,
                config.zero_elevation_threshold,
                &mut selectable,
            );
        }

        let dedup = drop_duplicate_xy(&candidates.xy, &candidates.coherence, &mut selectable);

        let noise_filter_applied = drop_noisy(config, &mut selectable)?;

        let num_kept = selectable.iter().filter(|&&k| k).count();
        let elapsed_ms = t0.elapsed().as_secs_f32() * 1000.0;
        info!(
            "Kept {} of {} candidates in {:.1} ms",
            num_kept, n, elapsed_ms
        );

        Ok(WeedResult {
            selectable,
            num_candidates: n,
            num_kept,
            num_clusters,
            dropped_by_neighbours,
            dropped_by_zero_elevation,
            duplicate_groups: dedup.duplicate_groups,
            dropped_by_duplicate_xy: dedup.dropped,
            noise_filter_applied,
            edge_count: None,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weed::WeedConfig;

    #[test]
    fn test_weed_neighbours_disabled() {
        let candidates = CandidateSet::new(
            vec![[0, 0], [0, 1]],
            vec![[1.0, 1.0], [2.0, 2.0]],
            vec![0.5, 0.6],
            vec![],
        );
        let stage = WeedStage::new(WeedConfig {
            weed_neighbours: false,
            ..Default::default()
        });
        let result = stage.run(&candidates).unwrap();
        assert_eq!(result.selectable, vec![true, true]);
        assert_eq!(result.num_clusters, 0);
    }

    #[test]
    fn test_empty_heights_skip_sea_level() {
        let candidates = CandidateSet::new(vec![[0, 0]], vec![[0.0, 0.0]], vec![0.5], vec![]);
        let stage = WeedStage::new(WeedConfig {
            drop_zero_elevation: true,
            ..Default::default()
        });
        let result = stage.run(&candidates).unwrap();
        assert_eq!(result.selectable, vec![true]);
        assert_eq!(result.dropped_by_zero_elevation, 0);
    }

    #[test]
    fn test_invalid_candidates_rejected() {
        let candidates = CandidateSet::new(
            vec![[0, 0], [1, 1]],
            vec![[0.0, 0.0]],
            vec![0.5, 0.4],
            vec![],
        );
        assert!(matches!(
            WeedStage::default().run(&candidates),
            Err(WeedError::LengthMismatch { field: "xy", .. })
        ));
    }
}
