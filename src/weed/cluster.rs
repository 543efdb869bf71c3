//! Reduce each neighbour cluster to its highest-coherence member.
//!
//! Clusters are the connected components of the neighbour graph, with the
//! owner → member edges taken as undirected. Components are found with a
//! disjoint-set forest; every component with more than one member keeps its
//! highest-coherence candidate and drops the rest. Ties go to the lowest
//! candidate index.

use tracing::debug;

use super::neighbours::NeighbourLists;

/// Disjoint-set forest over candidate indices.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<u32>,
}

impl DisjointSet {
    /// `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    /// Root of the set containing `x`, halving the path on the way.
    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            self.parent[x as usize] = self.parent[self.parent[x as usize] as usize];
            x = self.parent[x as usize];
        }
        x
    }

    /// Merge the sets containing `a` and `b`.
    pub fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Merge higher into lower so the root is the smallest index
            if ra < rb {
                self.parent[rb as usize] = ra;
            } else {
                self.parent[ra as usize] = rb;
            }
        }
    }
}

/// Counters from a cluster-resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterStats {
    /// Components with more than one member.
    pub num_clusters: usize,
    /// Candidates dropped in favour of a better cluster member.
    pub dropped: usize,
}

/// Group candidates into clusters. Only components with more than one
/// member are returned; members are in ascending index order and clusters
/// are ordered by their smallest member.
pub fn clusters(neighbours: &NeighbourLists) -> Vec<Vec<usize>> {
    let n = neighbours.len();
    let mut forest = DisjointSet::new(n);
    for (owner, member) in neighbours.edges() {
        forest.union(owner as u32, member as u32);
    }

    // Roots are the smallest index of each component, so visiting in index
    // order creates groups in order of their smallest member.
    let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = forest.find(i as u32) as usize;
        let slot = *slot_of_root[root].get_or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }
    groups.retain(|g| g.len() > 1);
    groups
}

/// Index of the highest-coherence member; the first one wins a tie.
pub fn best_member(members: &[usize], coherence: &[f32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &m in members {
        match best {
            Some(b) if coherence[m] <= coherence[b] => {}
            _ => best = Some(m),
        }
    }
    best
}

/// Keep only the highest-coherence member of every cluster.
///
/// `selectable` is indexed like `coherence`; dropped members are set to
/// `false`. Candidates outside any cluster are left untouched.
pub fn select_best(
    neighbours: &NeighbourLists,
    coherence: &[f32],
    selectable: &mut [bool],
) -> ClusterStats {
    let mut stats = ClusterStats::default();
    for group in clusters(neighbours) {
        stats.num_clusters += 1;
        let Some(best) = best_member(&group, coherence) else {
            continue;
        };
        for &m in &group {
            if m != best && selectable[m] {
                selectable[m] = false;
                stats.dropped += 1;
            }
        }
    }
    debug!(
        "Resolved {} clusters, dropped {} candidates",
        stats.num_clusters, stats.dropped
    );
    stats
}

/// Drop every candidate whose height is below `threshold`, regardless of
/// cluster membership. Returns how many still-selectable candidates were dropped.
pub fn drop_zero_elevation(height: &[f32], threshold: f32, selectable: &mut [bool]) -> usize {
    let mut dropped = 0;
    for (keep, &h) in selectable.iter_mut().zip(height) {
        if h < threshold && *keep {
            *keep = false;
            dropped += 1;
        }
    }
    debug!("Dropped {} candidates at sea level", dropped);
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weed::grid::{shift_positions, GridIndex};

    fn lists_for(ij: &[[i32; 2]]) -> NeighbourLists {
        let shifted = shift_positions(ij);
        let grid = GridIndex::build(&shifted).unwrap();
        NeighbourLists::find(&grid, &shifted).unwrap()
    }

    #[test]
    fn test_disjoint_set_merges_to_lowest_root() {
        let mut ds = DisjointSet::new(5);
        ds.union(3, 4);
        ds.union(4, 1);
        assert_eq!(ds.find(4), 1);
        assert_eq!(ds.find(3), 1);
        assert_eq!(ds.find(0), 0);
        assert_eq!(ds.find(2), 2);
    }

    #[test]
    fn test_three_close_one_far() {
        let lists = lists_for(&[[10, 10], [10, 11], [10, 10], [50, 50]]);
        let coherence = [0.9, 0.8, 0.95, 0.99];
        let mut selectable = vec![true; 4];
        let stats = select_best(&lists, &coherence, &mut selectable);
        assert_eq!(selectable, vec![false, false, true, true]);
        assert_eq!(stats.num_clusters, 1);
        assert_eq!(stats.dropped, 2);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let lists = lists_for(&[[0, 0], [0, 1], [0, 2]]);
        let coherence = [0.4, 0.7, 0.7];
        let mut selectable = vec![true; 3];
        select_best(&lists, &coherence, &mut selectable);
        assert_eq!(selectable, vec![false, true, false]);
    }

    #[test]
    fn test_chain_forms_one_cluster() {
        // A line of adjacent pixels is connected end to end.
        let ij: Vec<[i32; 2]> = (0..6).map(|c| [0, c]).collect();
        let lists = lists_for(&ij);
        let groups = clusters(&lists);
        assert_eq!(groups, vec![vec![0, 1, 2, 3, 4, 5]]);

        let coherence = [0.1, 0.2, 0.3, 0.9, 0.2, 0.1];
        let mut selectable = vec![true; 6];
        select_best(&lists, &coherence, &mut selectable);
        assert_eq!(selectable.iter().filter(|&&k| k).count(), 1);
        assert!(selectable[3]);
    }

    #[test]
    fn test_shared_member_joins_both_owners() {
        // Candidate 2 sits between 0 and 1; all three belong to one cluster
        // even though no edge links 0 and 1 directly.
        let lists = lists_for(&[[0, 0], [0, 2], [0, 1]]);
        assert!(lists
            .edges()
            .all(|(a, b)| !matches!((a, b), (0, 1) | (1, 0))));
        let groups = clusters(&lists);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0], vec![0, 1, 2]);
    }

    #[test]
    fn test_singletons_untouched() {
        let lists = lists_for(&[[0, 0], [20, 20], [40, 40]]);
        let mut selectable = vec![true; 3];
        let stats = select_best(&lists, &[0.1, 0.2, 0.3], &mut selectable);
        assert_eq!(selectable, vec![true; 3]);
        assert_eq!(stats, ClusterStats::default());
    }

    #[test]
    fn test_best_member_empty() {
        assert_eq!(best_member(&[], &[]), None);
    }

    #[test]
    fn test_sea_level_drops_cluster_winner() {
        let mut selectable = vec![true, false, true];
        let dropped = drop_zero_elevation(&[1e-9, 0.0, 15.0], 1e-6, &mut selectable);
        assert_eq!(selectable, vec![false, false, true]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_empty_input() {
        let lists = lists_for(&[]);
        let mut selectable: Vec<bool> = Vec::new();
        let stats = select_best(&lists, &[], &mut selectable);
        assert_eq!(stats, ClusterStats::default());
        assert_eq!(drop_zero_elevation(&[], 1e-6, &mut selectable), 0);
    }
}
