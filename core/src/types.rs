use ndarray::Array2;

/// Single coordinate axis, also used for the side length of the square grid.
pub type Coord = u8;

/// Count type used for item counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(col, row)`.
pub type Coord2 = (Coord, Coord);

/// Linear cell index, `col + row * size`.
pub type CellIndex = usize;

/// Converts coordinates into an ndarray index.
///
/// Boards are stored row-major (`[row, col]`), so iterating an `Array2` visits cells in linear index order.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

/// Number of cells in a square grid of side `size`.
pub const fn square(size: Coord) -> CellCount {
    let size = size as CellCount;
    size.saturating_mul(size)
}

/// Linear index of `(col, row)` on a grid of side `size`.
pub const fn to_index((col, row): Coord2, size: Coord) -> CellIndex {
    col as CellIndex + row as CellIndex * size as CellIndex
}

/// Coordinates of a linear index; the caller guarantees `index < size²`.
pub const fn to_coords(index: CellIndex, size: Coord) -> Coord2 {
    let size = size as CellIndex;
    ((index % size) as Coord, (index / size) as Coord)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        let bounds = (cols.try_into().unwrap(), rows.try_into().unwrap());
        NeighborIter::new(coords, bounds)
    }
}

/// Up-left, up, up-right, left, right, down-left, down, down-right.
const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (col, row) = coords;
    let (dx, dy) = delta;
    let (max_col, max_row) = bounds;

    let next_col = col.checked_add_signed(dx)?;
    if next_col >= max_col {
        return None;
    }

    let next_row = row.checked_add_signed(dy)?;
    if next_row >= max_row {
        return None;
    }

    Some((next_col, next_row))
}

/// Iterator over the in-bounds neighbors of a cell, in a fixed order.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(
                self.center,
                DISPLACEMENTS[usize::from(self.index)],
                self.bounds,
            );
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_coords_are_inverse() {
        let size = 7;
        for index in 0..usize::from(square(size)) {
            assert_eq!(to_index(to_coords(index, size), size), index);
        }
        assert_eq!(to_index((2, 1), 3), 5);
        assert_eq!(to_coords(5, 3), (2, 1));
    }

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, [(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn center_has_eight_neighbors_in_fixed_order() {
        let neighbors: Vec<_> = NeighborIter::new((1, 1), (3, 3)).collect();
        assert_eq!(
            neighbors,
            [
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (2, 1),
                (0, 2),
                (1, 2),
                (2, 2)
            ]
        );
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        assert_eq!(NeighborIter::new((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn far_edge_is_bounded() {
        let neighbors: Vec<_> = NeighborIter::new((254, 254), (255, 255)).collect();
        assert_eq!(neighbors, [(253, 253), (254, 253), (253, 254)]);
    }
}
