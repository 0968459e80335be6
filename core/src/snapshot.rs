use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only copy of the board for renderers and status displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Coord,
    pub status: GameStatus,
    pub total_items: CellCount,
    pub flags_placed: CellCount,
    /// Cells indexed `[row, col]`.
    pub cells: Array2<Cell>,
}

impl Snapshot {
    pub fn from_engine(engine: &BoardEngine) -> Self {
        Self {
            size: engine.size(),
            status: engine.status(),
            total_items: engine.total_items(),
            flags_placed: engine.flags_placed(),
            cells: engine.board().clone(),
        }
    }

    pub fn flags_remaining(&self) -> CellCount {
        self.total_items.saturating_sub(self.flags_placed)
    }

    pub fn cell(&self, index: CellIndex) -> Option<Cell> {
        if index >= self.cells.len() {
            return None;
        }
        self.cell_at(to_coords(index, self.size))
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Cells in linear index order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Cell> + '_> + '_ {
        self.cells.rows().into_iter().map(|row| row.into_iter().copied())
    }
}

/// One line per row, one symbol per cell.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
