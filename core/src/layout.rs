use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable placement of the hidden items on a square grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLayout {
    item_mask: Array2<bool>,
    /// Item indices in ascending order.
    items: Vec<CellIndex>,
}

impl ItemLayout {
    pub fn from_indices(size: Coord, indices: &[CellIndex]) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidConfig);
        }

        let mut item_mask: Array2<bool> = Array2::default((usize::from(size), usize::from(size)));
        let total_cells = item_mask.len();

        for &index in indices {
            if index >= total_cells {
                return Err(GameError::IndexOutOfRange);
            }
            let slot = &mut item_mask[to_coords(index, size).to_nd_index()];
            if *slot {
                return Err(GameError::DuplicateItem);
            }
            *slot = true;
        }

        let mut items = indices.to_vec();
        items.sort_unstable();
        Ok(Self { item_mask, items })
    }

    /// Builds a layout from indices already known to be distinct and in range.
    pub(crate) fn from_distinct(size: Coord, mut items: Vec<CellIndex>) -> Self {
        let mut item_mask: Array2<bool> = Array2::default((usize::from(size), usize::from(size)));
        for &index in &items {
            item_mask[to_coords(index, size).to_nd_index()] = true;
        }
        items.sort_unstable();
        Self { item_mask, items }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.item_count())
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < self.item_mask.len() {
            Ok(index)
        } else {
            Err(GameError::IndexOutOfRange)
        }
    }

    pub fn size(&self) -> Coord {
        self.item_mask.dim().0.try_into().unwrap()
    }

    pub fn total_cells(&self) -> CellCount {
        self.item_mask.len().try_into().unwrap()
    }

    pub fn item_count(&self) -> CellCount {
        self.items.len().try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.item_count()
    }

    pub fn items(&self) -> &[CellIndex] {
        &self.items
    }

    pub fn contains_item(&self, index: CellIndex) -> bool {
        self[index]
    }

    pub fn adjacent_item_count(&self, index: CellIndex) -> u8 {
        self.iter_neighbors(index)
            .filter(|&neighbor| self[neighbor])
            .count()
            .try_into()
            .unwrap()
    }

    /// Neighbors of an in-range `index`, as linear indices.
    pub(crate) fn iter_neighbors(&self, index: CellIndex) -> impl Iterator<Item = CellIndex> + use<> {
        let size = self.size();
        self.item_mask
            .iter_neighbors(to_coords(index, size))
            .map(move |coords| to_index(coords, size))
    }
}

impl Index<CellIndex> for ItemLayout {
    type Output = bool;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.item_mask[to_coords(index, self.size()).to_nd_index()]
    }
}
