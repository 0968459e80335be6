use std::collections::{BTreeSet, VecDeque};
use std::num::Saturating;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Board state machine: the item layout plus the player-visible state of every cell.
///
/// The engine never triggers side effects on reaching a terminal state, it only reports [`GameStatus`] on demand.
/// Once the game is won or lost every further move is a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    layout: ItemLayout,
    board: Array2<Cell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    exposed: bool,
}

impl BoardEngine {
    /// Starts a game on a `size`x`size` grid with `items` randomly placed items.
    pub fn initialize(size: Coord, items: CellCount) -> Result<Self> {
        let config = GameConfig::new(size, items)?;
        Ok(Self::with_seed(config, rand::random()))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        log::debug!(
            "New {}x{} board with {} items, seed: {}",
            config.size,
            config.size,
            config.items,
            seed
        );
        Self::new(RandomItemGenerator::new(seed).generate(config))
    }

    pub fn new(layout: ItemLayout) -> Self {
        let size = usize::from(layout.size());
        Self {
            layout,
            board: Array2::default((size, size)),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            exposed: false,
        }
    }

    /// Rebuilds an engine from stored cell states in linear index order.
    ///
    /// Only the internal counters are derived. Cached counts are kept but must match the layout.
    pub fn restore(layout: ItemLayout, cells: Vec<Cell>) -> Result<Self> {
        let size = usize::from(layout.size());
        let board = Array2::from_shape_vec((size, size), cells)
            .map_err(|_| GameError::CorruptSaveData("cell count does not match grid size"))?;

        let mut engine = Self {
            layout,
            board,
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            exposed: false,
        };

        for (index, &cell) in engine.board.iter().enumerate() {
            let has_item = engine.layout.contains_item(index);
            match (cell, has_item) {
                (Cell::Hidden, _) => {}
                (Cell::Flagged, _) => engine.flagged_count += 1,
                (Cell::Revealed(count), false) if count == engine.layout.adjacent_item_count(index) => {
                    engine.revealed_count += 1;
                }
                (Cell::Revealed(_), false) => {
                    return Err(GameError::CorruptSaveData("stale adjacent count"));
                }
                (Cell::Revealed(_), true) => {
                    return Err(GameError::CorruptSaveData("item cell shown as safe"));
                }
                (Cell::ItemRevealed, true) => engine.exposed = true,
                (Cell::ItemRevealed, false) => {
                    return Err(GameError::CorruptSaveData("safe cell shown as item"));
                }
            }
        }

        if engine.flagged_count.0 > engine.total_items() {
            return Err(GameError::CorruptSaveData("more flags than items"));
        }
        if engine.exposed
            && engine
                .layout
                .items()
                .iter()
                .any(|&index| engine.cell_unchecked(index) != Cell::ItemRevealed)
        {
            return Err(GameError::CorruptSaveData("item left hidden on a lost board"));
        }

        Ok(engine)
    }

    /// Hides every cell again, keeping the same item layout.
    pub fn restart(&mut self) {
        log::debug!("Restarting board, items stay in place");
        self.board.fill(Cell::Hidden);
        self.revealed_count = Saturating(0);
        self.flagged_count = Saturating(0);
        self.exposed = false;
    }

    pub fn status(&self) -> GameStatus {
        if self.exposed {
            GameStatus::Lost
        } else if self.revealed_count.0 == self.layout.safe_cell_count()
            && self.flagged_count.0 == self.layout.item_count()
        {
            // revealed cells never hold items, so the flags sit exactly on the items
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.layout.game_config()
    }

    pub fn layout(&self) -> &ItemLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord {
        self.layout.size()
    }

    /// Number of placed items, which is also the flag budget.
    pub fn total_items(&self) -> CellCount {
        self.layout.item_count()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn flags_remaining(&self) -> CellCount {
        self.total_items().saturating_sub(self.flagged_count.0)
    }

    pub fn item_locations(&self) -> &[CellIndex] {
        self.layout.items()
    }

    pub fn cell(&self, index: CellIndex) -> Result<Cell> {
        let index = self.layout.validate_index(index)?;
        Ok(self.cell_unchecked(index))
    }

    pub(crate) fn board(&self) -> &Array2<Cell> {
        &self.board
    }

    /// Cells in linear index order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.board.iter().copied()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_engine(self)
    }

    pub fn neighbors(&self, index: CellIndex) -> Result<Vec<CellIndex>> {
        let index = self.layout.validate_index(index)?;
        Ok(self.layout.iter_neighbors(index).collect())
    }

    pub fn item_count_around(&self, index: CellIndex) -> Result<u8> {
        let index = self.layout.validate_index(index)?;
        Ok(self.layout.adjacent_item_count(index))
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<FlagOutcome> {
        let index = self.layout.validate_index(index)?;
        if self.is_finished() {
            return Ok(FlagOutcome::NoOp);
        }

        Ok(match self.cell_unchecked(index) {
            Cell::Flagged => {
                self.set_cell(index, Cell::Hidden);
                self.flagged_count -= 1;
                FlagOutcome::Unflagged
            }
            Cell::Hidden if self.flags_remaining() == 0 => FlagOutcome::BudgetExhausted,
            Cell::Hidden => {
                self.set_cell(index, Cell::Flagged);
                self.flagged_count += 1;
                FlagOutcome::Flagged
            }
            Cell::Revealed(_) | Cell::ItemRevealed => FlagOutcome::NoOp,
        })
    }

    pub fn reveal(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let index = self.layout.validate_index(index)?;
        if self.is_finished() || !self.cell_unchecked(index).is_hidden() {
            return Ok(RevealOutcome::NoOp);
        }

        if self.layout.contains_item(index) {
            self.expose_items();
            return Ok(RevealOutcome::Lost);
        }

        if self.reveal_safe_cell(index) != 0 {
            return Ok(RevealOutcome::Revealed(vec![index]));
        }

        Ok(RevealOutcome::Revealed(self.flood_fill(index)))
    }

    /// Breadth-first expansion from a zero-count cell.
    ///
    /// Returns every discovered cell. Flagged cells are discovered but neither revealed nor expanded through.
    fn flood_fill(&mut self, start: CellIndex) -> Vec<CellIndex> {
        let mut discovered = BTreeSet::from([start]);
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_index) = to_visit.pop_front() {
            for neighbor in self.layout.iter_neighbors(visit_index) {
                if !discovered.insert(neighbor) {
                    continue;
                }

                if self.cell_unchecked(neighbor).is_flagged() {
                    continue;
                }

                if self.reveal_safe_cell(neighbor) == 0 {
                    to_visit.push_back(neighbor);
                }
            }
        }

        discovered.into_iter().collect()
    }

    /// Reveals a non-item cell, caching its count the first time. Returns the count.
    fn reveal_safe_cell(&mut self, index: CellIndex) -> u8 {
        match self.cell_unchecked(index) {
            Cell::Revealed(count) => count,
            _ => {
                let count = self.layout.adjacent_item_count(index);
                self.set_cell(index, Cell::Revealed(count));
                self.revealed_count += 1;
                count
            }
        }
    }

    /// Turns every item cell into [`Cell::ItemRevealed`], flagged ones included.
    fn expose_items(&mut self) {
        let size = self.layout.size();
        for &index in self.layout.items() {
            let cell = &mut self.board[to_coords(index, size).to_nd_index()];
            if cell.is_flagged() {
                self.flagged_count -= 1;
            }
            *cell = Cell::ItemRevealed;
        }
        self.exposed = true;
        log::debug!("Item revealed, exposing all {} items", self.layout.item_count());
    }

    fn cell_unchecked(&self, index: CellIndex) -> Cell {
        self.board[to_coords(index, self.layout.size()).to_nd_index()]
    }

    fn set_cell(&mut self, index: CellIndex, cell: Cell) {
        self.board[to_coords(index, self.layout.size()).to_nd_index()] = cell;
    }
}
