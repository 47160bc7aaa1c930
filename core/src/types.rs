use core::fmt;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Side length of the board.
pub const SIDE: u8 = 3;

/// Number of cells on the board.
pub const CELL_COUNT: u8 = SIDE * SIDE;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::X
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Taken(Player),
}

impl Cell {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn owner(self) -> Option<Player> {
        match self {
            Self::Empty => None,
            Self::Taken(player) => Some(player),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}

/// Position of a cell, `0..9` in row-major order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellIndex(u8);

impl CellIndex {
    pub const fn new(index: u8) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Caller guarantees `index < CELL_COUNT`.
    pub(crate) const fn new_unchecked(index: u8) -> Self {
        Self(index)
    }

    pub const fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if row < SIDE && col < SIDE {
            Some(Self(row * SIDE + col))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn row(self) -> u8 {
        self.0 / SIDE
    }

    pub const fn col(self) -> u8 {
        self.0 % SIDE
    }

    /// Moves one row or column over, wrapping around the edges of the board.
    pub const fn step(self, direction: Direction) -> Self {
        let (mut row, mut col) = (self.row(), self.col());
        match direction {
            Direction::Left => col = (col + SIDE - 1) % SIDE,
            Direction::Right => col = (col + 1) % SIDE,
            Direction::Up => row = (row + SIDE - 1) % SIDE,
            Direction::Down => row = (row + 1) % SIDE,
        }
        Self(row * SIDE + col)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..CELL_COUNT).map(Self)
    }
}

impl TryFrom<usize> for CellIndex {
    type Error = GameError;

    fn try_from(index: usize) -> Result<Self> {
        u8::try_from(index)
            .ok()
            .and_then(Self::new)
            .ok_or(GameError::InvalidCell(index))
    }
}

impl From<CellIndex> for usize {
    fn from(index: CellIndex) -> Self {
        index.0.into()
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for CellIndex {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row().into(), self.col().into()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Round wins per player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub x: u32,
    pub o: u32,
}

impl Index<Player> for Scores {
    type Output = u32;

    fn index(&self, player: Player) -> &Self::Output {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }
}

impl IndexMut<Player> for Scores {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        match player {
            Player::X => &mut self.x,
            Player::O => &mut self.o,
        }
    }
}

/// A point in canvas pixels.
pub type Point = (f32, f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_maps_to_row_and_column() {
        let index = CellIndex::new(7).unwrap();
        assert_eq!((index.row(), index.col()), (2, 1));
        assert_eq!(index.to_nd_index(), [2, 1]);
        assert_eq!(CellIndex::from_row_col(2, 1), Some(index));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        assert_eq!(CellIndex::new(9), None);
        assert_eq!(CellIndex::try_from(42usize), Err(GameError::InvalidCell(42)));
        assert_eq!(CellIndex::try_from(300usize), Err(GameError::InvalidCell(300)));
    }

    #[test]
    fn step_wraps_around_each_edge() {
        let top_left = CellIndex::new(0).unwrap();
        assert_eq!(top_left.step(Direction::Left).get(), 2);
        assert_eq!(top_left.step(Direction::Up).get(), 6);
        assert_eq!(top_left.step(Direction::Right).get(), 1);
        assert_eq!(top_left.step(Direction::Down).get(), 3);

        let bottom_right = CellIndex::new(8).unwrap();
        assert_eq!(bottom_right.step(Direction::Right).get(), 6);
        assert_eq!(bottom_right.step(Direction::Down).get(), 2);
    }

    #[test]
    fn four_steps_in_one_direction_return_home() {
        for index in CellIndex::all() {
            let mut pos = index;
            for _ in 0..SIDE {
                pos = pos.step(Direction::Down);
            }
            assert_eq!(pos, index);
        }
    }

    #[test]
    fn scores_index_by_player() {
        let mut scores = Scores::default();
        scores[Player::O] += 2;
        assert_eq!(scores[Player::O], 2);
        assert_eq!(scores[Player::X], 0);
    }
}
