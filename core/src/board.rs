use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One row, column or diagonal.
pub type Line = [CellIndex; 3];

const fn line(a: u8, b: u8, c: u8) -> Line {
    [
        CellIndex::new_unchecked(a),
        CellIndex::new_unchecked(b),
        CellIndex::new_unchecked(c),
    ]
}

/// Every winning combination: rows, then columns, then diagonals.
pub const WIN_LINES: [Line; 8] = [
    line(0, 1, 2),
    line(3, 4, 5),
    line(6, 7, 8),
    line(0, 3, 6),
    line(1, 4, 7),
    line(2, 5, 8),
    line(0, 4, 8),
    line(2, 4, 6),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: Array2::default((SIDE as usize, SIDE as usize)),
        }
    }

    pub fn cell_at(&self, index: CellIndex) -> Cell {
        self.cells[index.to_nd_index()]
    }

    /// Marks an empty cell, leaving taken cells alone.
    pub(crate) fn place(&mut self, index: CellIndex, player: Player) -> Result<()> {
        let cell = &mut self.cells[index.to_nd_index()];
        if !cell.is_empty() {
            return Err(GameError::CellOccupied(index));
        }
        *cell = Cell::Taken(player);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn owns_line(&self, player: Player, line: &Line) -> bool {
        line.iter()
            .all(|&index| self.cell_at(index) == Cell::Taken(player))
    }

    /// Every line fully owned by `player`, in `WIN_LINES` order.
    pub fn lines_owned_by(&self, player: Player) -> impl Iterator<Item = Line> + '_ {
        WIN_LINES
            .iter()
            .copied()
            .filter(move |line| self.owns_line(player, line))
    }

    pub fn has_line(&self, player: Player) -> bool {
        self.lines_owned_by(player).next().is_some()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn taken_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Cells in index order.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, Cell)> + '_ {
        CellIndex::all().map(|index| (index, self.cell_at(index)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<CellIndex> for Board {
    type Output = Cell;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.cells[index.to_nd_index()]
    }
}
