use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Lines completed by a single winning move. Two is the most a legal game allows
/// (a move at the shared cell of two lines).
pub type WinningLines = SmallVec<[Line; 2]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won(Player),
    Tied,
}

impl GameState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won(_) | Self::Tied)
    }

    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    NoChange,
    Placed(Player),
    Won { player: Player, lines: WinningLines },
    Tied(Player),
}

impl MoveOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Player whose mark was placed, if any.
    pub fn mover(&self) -> Option<Player> {
        match *self {
            Self::NoChange => None,
            Self::Placed(player) | Self::Won { player, .. } | Self::Tied(player) => Some(player),
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Won { .. } | Self::Tied(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    board: Board,
    current: Player,
    state: GameState,
    scores: Scores,
}

impl PlayEngine {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current: Player::X,
            state: GameState::InProgress,
            scores: Scores::default(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, index: CellIndex) -> Cell {
        self.board.cell_at(index)
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Lines owned by the winner, empty unless the round was won.
    pub fn winning_lines(&self) -> WinningLines {
        match self.state {
            GameState::Won(player) => self.board.lines_owned_by(player).collect(),
            _ => WinningLines::new(),
        }
    }

    pub fn can_play_at(&self, index: CellIndex) -> bool {
        self.is_running() && self.cell_at(index).is_empty()
    }

    /// Plays the current player at `index`. Rejected moves are reported and change nothing.
    pub fn try_move(&mut self, index: usize) -> Result<MoveOutcome> {
        let index = CellIndex::try_from(index)?;
        self.check_running()?;

        let player = self.current;
        self.board.place(index, player)?;

        let lines: WinningLines = self.board.lines_owned_by(player).collect();
        Ok(if !lines.is_empty() {
            self.state = GameState::Won(player);
            self.scores[player] += 1;
            log::info!("{} wins at {}", player, index);
            MoveOutcome::Won { player, lines }
        } else if self.board.is_full() {
            self.state = GameState::Tied;
            log::info!("tie after {} at {}", player, index);
            MoveOutcome::Tied(player)
        } else {
            self.current = player.other();
            MoveOutcome::Placed(player)
        })
    }

    /// Like [`Self::try_move`], but a rejected move is simply a no-op.
    pub fn apply_move(&mut self, index: usize) -> MoveOutcome {
        self.try_move(index).unwrap_or_else(|err| {
            log::debug!("ignored move at {}: {}", index, err);
            MoveOutcome::NoChange
        })
    }

    /// New round with the score tally zeroed and X to move.
    pub fn reset_all(&mut self) {
        self.board.clear();
        self.current = Player::X;
        self.state = GameState::InProgress;
        self.scores = Scores::default();
    }

    /// New round keeping the scores and whoever was last to move.
    pub fn restart_round(&mut self) {
        self.board.clear();
        self.state = GameState::InProgress;
    }

    fn check_running(&self) -> Result<()> {
        if self.state.is_running() {
            Ok(())
        } else {
            Err(GameError::AlreadyEnded)
        }
    }
}

impl Default for PlayEngine {
    fn default() -> Self {
        Self::new()
    }
}
