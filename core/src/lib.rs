//! Board engine for Pokesweep, a Minesweeper variant where the player tries to catch every hidden creature.
//!
//! The [`BoardEngine`] owns the grid and the item layout. Everything else in this crate (snapshots, save files,
//! high scores, the [`GameSession`] controller) only reads its state or calls its mutation operations.

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use save::*;
pub use scores::*;
pub use session::*;
pub use snapshot::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod layout;
mod save;
mod scores;
mod session;
mod snapshot;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub items: CellCount,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord = 10;
    pub const DEFAULT_ITEMS: CellCount = 15;

    pub const fn new_unchecked(size: Coord, items: CellCount) -> Self {
        Self { size, items }
    }

    /// Validates the grid size and caps `items` at the number of cells.
    pub fn new(size: Coord, items: CellCount) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidConfig);
        }

        let total_cells = square(size);
        if items > total_cells {
            log::warn!(
                "Requested {} items but a {}x{} grid only fits {}, clamping",
                items,
                size,
                size,
                total_cells
            );
        }

        Ok(Self::new_unchecked(size, items.min(total_cells)))
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_SIZE, Self::DEFAULT_ITEMS)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoOp,
    Flagged,
    Unflagged,
    /// Every flag is already on the board.
    BudgetExhausted,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Flagged | Self::Unflagged)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoOp,
    /// Cells touched by the reveal in ascending order, including flags the flood fill stopped at.
    Revealed(Vec<CellIndex>),
    Lost,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoOp)
    }

    pub fn touched(&self) -> &[CellIndex] {
        match self {
            Self::Revealed(touched) => touched,
            Self::NoOp | Self::Lost => &[],
        }
    }
}
