//! Remove survivors that share an identical projected coordinate.
//!
//! Two candidates can land on exactly the same ground coordinate through
//! independent selection paths upstream. Among the currently selectable
//! candidates, each group of identical `[x, y]` keeps its highest-coherence
//! member (lowest index on a tie). Comparison is exact; a coordinate with a
//! NaN component never matches anything.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::debug;

/// Counters from a deduplication pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Coordinates shared by more than one selectable candidate.
    pub duplicate_groups: usize,
    /// Candidates dropped in favour of a better twin.
    pub dropped: usize,
}

/// Bit pattern used as the hash key; folds -0.0 onto 0.0 so the key agrees
/// with `==`.
fn coord_key(xy: &[f64; 2]) -> Option<(u64, u64)> {
    if xy[0].is_nan() || xy[1].is_nan() {
        return None;
    }
    let norm = |v: f64| if v == 0.0 { 0.0f64 } else { v };
    Some((norm(xy[0]).to_bits(), norm(xy[1]).to_bits()))
}

/// Keep one candidate per exact coordinate among the selectable ones.
///
/// Mutates `selectable` in place. Running it again on its own output
/// changes nothing.
pub fn drop_duplicate_xy(
    xy: &[[f64; 2]],
    coherence: &[f32],
    selectable: &mut [bool],
) -> DedupStats {
    let mut best_at: HashMap<(u64, u64), usize> = HashMap::new();
    let mut grouped: HashSet<(u64, u64)> = HashSet::new();
    let mut stats = DedupStats::default();

    for i in 0..selectable.len() {
        if !selectable[i] {
            continue;
        }
        let Some(key) = coord_key(&xy[i]) else {
            continue;
        };
        match best_at.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
            Entry::Occupied(mut slot) => {
                if grouped.insert(key) {
                    stats.duplicate_groups += 1;
                }
                let best = slot.get_mut();
                if coherence[i] > coherence[*best] {
                    selectable[*best] = false;
                    *best = i;
                } else {
                    selectable[i] = false;
                }
                stats.dropped += 1;
            }
        }
    }

    debug!(
        "Found {} duplicate coordinates, dropped {} candidates",
        stats.duplicate_groups, stats.dropped
    );
    stats
}
