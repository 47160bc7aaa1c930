use thiserror::Error;

use crate::CellIndex;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index {0} is outside the board")]
    InvalidCell(usize),
    #[error("Cell {0} is already taken")]
    CellOccupied(CellIndex),
    #[error("Round already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
