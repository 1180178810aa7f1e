use cozy_chess::Color;
use thiserror::Error;

use crate::board::{Position, PositionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Engine,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("it is not {0:?}'s turn to move")]
    WrongTurn(Color),
    #[error(transparent)]
    Position(#[from] PositionError),
}

/// One seat at the board: identity, color, and the moves it has played.
#[derive(Debug)]
pub struct Player {
    name: String,
    kind: PlayerKind,
    color: Color,
    history: Vec<String>,
}

impl Player {
    pub fn new(name: impl Into<String>, kind: PlayerKind, color: Color) -> Self {
        Self { name: name.into(), kind, color, history: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Applies a UCI move for this player, enforcing turn ownership and
    /// recording it on success.
    pub fn make_move(&mut self, pos: &mut Position, uci: &str) -> Result<(), PlayerError> {
        if pos.side_to_move() != self.color {
            return Err(PlayerError::WrongTurn(self.color));
        }
        pos.make_uci(uci)?;
        self.history.push(uci.to_string());
        Ok(())
    }
}
