//! Round model — one scheduling step of a tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Game, RoundId, TournamentId};

/// A tournament round and the games played in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Unique identifier
    pub id: RoundId,

    /// Round name, e.g. "Round 3"
    pub name: String,

    /// Tournament this round belongs to
    pub tournament_id: TournamentId,

    pub started_at: Option<DateTime<Utc>>,

    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub games: Vec<Game>,
}

impl Round {
    /// Create an empty round. `number` is 1-based.
    pub fn new(tournament_id: TournamentId, number: usize) -> Self {
        let id = EntityId::generate(&[tournament_id.as_str(), "round", &number.to_string()]);

        Self {
            id,
            name: format!("Round {}", number),
            tournament_id,
            started_at: Some(Utc::now()),
            ended_at: None,
            finished: false,
            games: Vec::new(),
        }
    }

    /// Whether any game in this round has finished.
    pub fn has_finished_games(&self) -> bool {
        self.games.iter().any(|g| g.finished)
    }

    /// Most recent update timestamp across the round's games.
    pub fn last_game_update(&self) -> Option<DateTime<Utc>> {
        self.games.iter().map(|g| g.updated_at).max()
    }
}
