//! Game model: one board between two players, or a bye.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EntityId, GameId, Player, PlayerId, RoundId};

/// Errors raised when updating a game.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("Game {0} has already finished and cannot be updated")]
    AlreadyFinished(GameId),

    #[error("Invalid game result: {0}")]
    InvalidResult(String),
}

/// Outcome of a game.
///
/// Serialized with the single-character codes used in result entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "w")]
    WhiteWins,
    #[serde(rename = "b")]
    BlackWins,
    #[serde(rename = "=")]
    Draw,
    #[default]
    #[serde(rename = "*")]
    NotAvailable,
    /// Bye worth a draw.
    #[serde(rename = "H")]
    ByeHalf,
    /// Bye worth a win.
    #[serde(rename = "F")]
    ByeFull,
    /// Unpaired player, scored as a win.
    #[serde(rename = "U")]
    ByeUnplayed,
    /// Bye worth nothing.
    #[serde(rename = "Z")]
    ByeZero,
    /// Win by forfeit, credited to the white side.
    #[serde(rename = "+")]
    ForfeitWin,
}

impl GameResult {
    pub const ALL: [GameResult; 9] = [
        GameResult::WhiteWins,
        GameResult::BlackWins,
        GameResult::Draw,
        GameResult::NotAvailable,
        GameResult::ByeHalf,
        GameResult::ByeFull,
        GameResult::ByeUnplayed,
        GameResult::ByeZero,
        GameResult::ForfeitWin,
    ];

    pub fn code(&self) -> char {
        match self {
            GameResult::WhiteWins => 'w',
            GameResult::BlackWins => 'b',
            GameResult::Draw => '=',
            GameResult::NotAvailable => '*',
            GameResult::ByeHalf => 'H',
            GameResult::ByeFull => 'F',
            GameResult::ByeUnplayed => 'U',
            GameResult::ByeZero => 'Z',
            GameResult::ForfeitWin => '+',
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, GameResult::NotAvailable)
    }

    /// Decided at the board. Byes and forfeits are not.
    pub fn is_over_the_board(&self) -> bool {
        matches!(
            self,
            GameResult::WhiteWins | GameResult::BlackWins | GameResult::Draw
        )
    }
}

impl FromStr for GameResult {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let found = match (chars.next(), chars.next()) {
            (Some(c), None) => GameResult::ALL.into_iter().find(|r| r.code() == c),
            _ => None,
        };
        found.ok_or_else(|| GameError::InvalidResult(trimmed.to_string()))
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GameResult::WhiteWins => "White",
            GameResult::BlackWins => "Black",
            GameResult::Draw => "Draw",
            GameResult::NotAvailable => "Not available",
            GameResult::ByeHalf => "Bye (half point)",
            GameResult::ByeFull => "Bye (full point)",
            GameResult::ByeUnplayed => "Bye (unpaired)",
            GameResult::ByeZero => "Bye (zero points)",
            GameResult::ForfeitWin => "Forfeit win",
        };
        write!(f, "{}", label)
    }
}

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

/// A single game within a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier
    pub id: GameId,

    /// Round this game belongs to
    pub round_id: RoundId,

    /// White player; `None` is a bye
    pub white: Option<PlayerId>,

    /// Black player; `None` is a bye
    pub black: Option<PlayerId>,

    /// Finished games are read-only
    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub result: GameResult,

    pub started_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Create an unfinished game. The id is derived from the round and board.
    pub fn new(
        round_id: RoundId,
        board: usize,
        white: Option<PlayerId>,
        black: Option<PlayerId>,
    ) -> Self {
        let id = EntityId::generate(&[round_id.as_str(), "board", &board.to_string()]);
        let now = Utc::now();

        Self {
            id,
            round_id,
            white,
            black,
            finished: false,
            result: GameResult::NotAvailable,
            started_at: now,
            updated_at: now,
        }
    }

    /// Colour the player holds in this game, if they play in it.
    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        if self.white == Some(player) {
            Some(Color::White)
        } else if self.black == Some(player) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The other side of the board, if the player plays here and it is not a bye.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        match self.color_of(player)? {
            Color::White => self.black,
            Color::Black => self.white,
        }
    }

    /// Whether this game feeds scores: finished with an available result.
    pub fn counts(&self) -> bool {
        self.finished && self.result.is_available()
    }

    /// Whether this game counts and was actually played out.
    pub fn is_played(&self) -> bool {
        self.counts() && self.result.is_over_the_board()
    }

    /// Record the final result. A game transitions to a terminal result once.
    pub fn record_result(&mut self, result: GameResult) -> Result<(), GameError> {
        if self.finished {
            return Err(GameError::AlreadyFinished(self.id.clone()));
        }
        if !result.is_available() {
            return Err(GameError::InvalidResult(result.code().to_string()));
        }

        self.result = result;
        self.finished = true;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Human-readable line, e.g. `alyx(1) vs BYE = White`.
    pub fn describe(&self, players: &[Player]) -> String {
        let side = |id: Option<PlayerId>| match id {
            Some(id) => match players.iter().find(|p| p.id == id) {
                Some(player) => format!("{}({})", player, id),
                None => format!("Player {}({})", id, id),
            },
            None => "BYE".to_string(),
        };
        format!("{} vs {} = {}", side(self.white), side(self.black), self.result)
    }
}
