//! Neighbour lists derived from the grid index.
//!
//! Each candidate looks up the centre of its own claim window. If an earlier
//! candidate claimed that cell, the candidate is appended to the owner's list.
//! Edges therefore point owner → member only; cluster resolution treats them
//! as undirected.

use super::grid::GridIndex;
use crate::WeedError;

/// Owner → member adjacency, one list per candidate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NeighbourLists {
    lists: Vec<Vec<u32>>,
}

impl NeighbourLists {
    /// Record, for every candidate, the owner of its window centre.
    pub fn find(grid: &GridIndex, shifted: &[[usize; 2]]) -> Result<Self, WeedError> {
        let mut lists: Vec<Vec<u32>> = vec![Vec::new(); shifted.len()];
        for (i, pos) in shifted.iter().enumerate() {
            if let Some(owner) = grid.centre_owner(*pos)? {
                lists[owner as usize].push(i as u32);
            }
        }
        Ok(Self { lists })
    }

    /// Number of candidates covered.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Return `true` when no candidates are covered.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Members recorded for `owner`.
    pub fn neighbours_of(&self, owner: usize) -> &[u32] {
        &self.lists[owner]
    }

    /// All owner → member edges, in owner order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.lists
            .iter()
            .enumerate()
            .flat_map(|(owner, members)| members.iter().map(move |&m| (owner, m as usize)))
    }

    /// Total number of edges.
    pub fn num_edges(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Number of candidates owning at least one neighbour.
    pub fn num_owners(&self) -> usize {
        self.lists.iter().filter(|l| !l.is_empty()).count()
    }
}
