//! Grid index: which candidate first claimed each pixel cell.
//!
//! Grid positions are translated so the minimum row and column land at
//! [`GRID_MARGIN`]. Each candidate, in index order, then claims every
//! still-unclaimed cell of the 3×3 window whose lower-right corner is its own
//! shifted cell, except the window centre. Later stages look up the window
//! centre of each candidate to discover who claimed it first.
//!
//! The look-back window (rows `r-2..=r`, not `r-1..=r+1`) reproduces the
//! established behaviour of the processing chain; it is kept as-is pending
//! review rather than re-centred.

use crate::WeedError;

/// Cells between the smallest shifted position and the array origin.
/// Two cells keep the look-back window inside the array.
pub const GRID_MARGIN: i64 = 2;

/// Side length of the claim window.
const WINDOW: usize = 3;

/// Translate raw grid positions so the minimum row and column map to
/// [`GRID_MARGIN`]. The translation is uniform over all positions.
pub fn shift_positions(ij: &[[i32; 2]]) -> Vec<[usize; 2]> {
    let (Some(min_row), Some(min_col)) = (
        ij.iter().map(|p| p[0]).min(),
        ij.iter().map(|p| p[1]).min(),
    ) else {
        return Vec::new();
    };

    ij.iter()
        .map(|p| {
            [
                (p[0] as i64 - min_row as i64 + GRID_MARGIN) as usize,
                (p[1] as i64 - min_col as i64 + GRID_MARGIN) as usize,
            ]
        })
        .collect()
}

/// Row-major array of first-claim owners, sized to the shifted extent.
#[derive(Debug, Clone, PartialEq)]
pub struct GridIndex {
    rows: usize,
    cols: usize,
    cells: Vec<Option<u32>>,
}

impl GridIndex {
    /// Build the index from shifted positions (see [`shift_positions`]).
    ///
    /// The index is dense: it holds one cell per pixel of the bounding box of
    /// the positions, whether occupied or not. An extent whose cell count
    /// overflows or cannot be allocated is [`WeedError::GridTooLarge`].
    /// An empty input yields a 0×0 index.
    pub fn build(shifted: &[[usize; 2]]) -> Result<Self, WeedError> {
        let rows = shifted.iter().map(|p| p[0] + 1).max().unwrap_or(0);
        let cols = shifted.iter().map(|p| p[1] + 1).max().unwrap_or(0);
        let too_large = || WeedError::GridTooLarge { rows, cols };
        let len = rows.checked_mul(cols).ok_or_else(too_large)?;
        let mut cells: Vec<Option<u32>> = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, None);
        let mut grid = Self { rows, cols, cells };

        for (owner, pos) in shifted.iter().enumerate() {
            grid.claim_window(owner as u32, *pos)?;
        }
        Ok(grid)
    }

    /// Claim the unclaimed cells of the window ending at `pos`, skipping its centre.
    fn claim_window(&mut self, owner: u32, pos: [usize; 2]) -> Result<(), WeedError> {
        let top = pos[0] as i64 - (WINDOW as i64 - 1);
        let left = pos[1] as i64 - (WINDOW as i64 - 1);
        for dr in 0..WINDOW as i64 {
            for dc in 0..WINDOW as i64 {
                if dr == 1 && dc == 1 {
                    continue;
                }
                let idx = self.offset(top + dr, left + dc)?;
                let cell = &mut self.cells[idx];
                if cell.is_none() {
                    *cell = Some(owner);
                }
            }
        }
        Ok(())
    }

    fn offset(&self, row: i64, col: i64) -> Result<usize, WeedError> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return Err(WeedError::GridOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row as usize * self.cols + col as usize)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Owner of the cell at (`row`, `col`), or `None` when unclaimed.
    pub fn owner(&self, row: i64, col: i64) -> Result<Option<u32>, WeedError> {
        Ok(self.cells[self.offset(row, col)?])
    }

    /// Owner of the centre of the window that ends at `pos`.
    ///
    /// The centre is the one cell a candidate never claims itself, so any
    /// owner found here is a different, earlier-claiming candidate.
    pub fn centre_owner(&self, pos: [usize; 2]) -> Result<Option<u32>, WeedError> {
        self.owner(pos[0] as i64 - 1, pos[1] as i64 - 1)
    }

    /// Number of claimed cells.
    pub fn num_claimed(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
