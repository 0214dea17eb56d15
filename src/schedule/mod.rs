//! Round-robin pairing scheduler.
//!
//! Uses the fixed-player circle method: the highest id stays put while the
//! remaining players rotate around it. The scheduler is total: player
//! counts it cannot pair (odd, or fewer than two) produce an empty schedule
//! instead of an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Game, PlayerId, Round, Tournament, TournamentId, TournamentType};

/// One board: who plays white and who plays black.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing<T> {
    pub white: T,
    pub black: T,
}

impl<T> Pairing<T> {
    pub fn new(white: T, black: T) -> Self {
        Self { white, black }
    }

    /// Same players, colours swapped.
    pub fn reversed(self) -> Self {
        Self {
            white: self.black,
            black: self.white,
        }
    }
}

/// Ordered list of rounds, each an ordered list of pairings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule<T> {
    rounds: Vec<Vec<Pairing<T>>>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self { rounds: Vec::new() }
    }
}

impl<T> Schedule<T> {
    pub fn rounds(&self) -> &[Vec<Pairing<T>>] {
        &self.rounds
    }

    pub fn into_rounds(self) -> Vec<Vec<Pairing<T>>> {
        self.rounds
    }

    /// Number of rounds.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Total number of pairings across all rounds.
    pub fn pairing_count(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<Pairing<T>>> {
        self.rounds.iter()
    }
}

impl<T: Clone> Schedule<T> {
    /// Rounds as `[white, black]` arrays, the shape used in the reference tables.
    pub fn to_pairs(&self) -> Vec<Vec<[T; 2]>> {
        self.rounds
            .iter()
            .map(|round| {
                round
                    .iter()
                    .map(|p| [p.white.clone(), p.black.clone()])
                    .collect()
            })
            .collect()
    }

    /// The same rounds with every pairing's colours swapped.
    pub fn mirrored(&self) -> Self {
        let rounds = self
            .rounds
            .iter()
            .map(|round| round.iter().cloned().map(Pairing::reversed).collect())
            .collect();
        Self { rounds }
    }
}

impl Schedule<PlayerId> {
    /// Build unfinished round and game records for a tournament.
    ///
    /// Round numbers are 1-based; game ids derive from the round id and board.
    pub fn materialize(&self, tournament_id: &TournamentId) -> Vec<Round> {
        self.rounds
            .iter()
            .enumerate()
            .map(|(index, pairings)| {
                let mut round = Round::new(tournament_id.clone(), index + 1);
                round.games = pairings
                    .iter()
                    .enumerate()
                    .map(|(board, p)| {
                        Game::new(round.id.clone(), board, Some(p.white), Some(p.black))
                    })
                    .collect();
                round
            })
            .collect()
    }
}

/// Single round-robin schedule.
///
/// For `n` players (even, at least two) returns `n - 1` rounds of `n / 2`
/// pairings in which every pair of players meets exactly once. Any other
/// count returns an empty schedule.
pub fn round_robin<T: Ord + Clone>(players: &[T]) -> Schedule<T> {
    let n = players.len();
    if n < 2 || n % 2 != 0 {
        warn!("Cannot build a round-robin for {} players, returning empty schedule", n);
        return Schedule::default();
    }

    let mut rotating = players.to_vec();
    rotating.sort();
    let Some(fixed) = rotating.pop() else {
        return Schedule::default();
    };

    // Constant per schedule; the rotation accumulates round over round.
    let rot_amt = (n / 2 - 1) % (n - 1);
    debug!("Building round-robin for {} players, rotation {}", n, rot_amt);

    let mut rounds = Vec::with_capacity(n - 1);
    for r in 0..n - 1 {
        let mut pairings = Vec::with_capacity(n / 2);

        // The fixed player alternates colours.
        let head = rotating[0].clone();
        if r % 2 == 0 {
            pairings.push(Pairing::new(head, fixed.clone()));
        } else {
            pairings.push(Pairing::new(fixed.clone(), head));
        }

        let rest = &rotating[1..];
        for i in 0..rest.len() / 2 {
            let mirror = rest.len() - 1 - i;
            pairings.push(Pairing::new(rest[i].clone(), rest[mirror].clone()));
        }

        rounds.push(pairings);
        rotating.rotate_right(rot_amt);
    }

    Schedule { rounds }
}

/// Double round-robin: the single schedule followed by its colour-swapped mirror.
pub fn double_round_robin<T: Ord + Clone>(players: &[T]) -> Schedule<T> {
    let single = round_robin(players);
    let mirror = single.mirrored();

    let mut rounds = single.into_rounds();
    rounds.extend(mirror.into_rounds());
    Schedule { rounds }
}

/// Schedule for a tournament according to its pairing format.
pub fn schedule_for(tournament: &Tournament) -> Schedule<PlayerId> {
    let players = tournament.player_ids();

    match tournament.tournament_type {
        TournamentType::RoundRobin => round_robin(&players),
        TournamentType::DoubleRoundRobin => double_round_robin(&players),
        TournamentType::Swiss => {
            warn!(
                "Swiss pairing is not supported, tournament {} gets no schedule",
                tournament.name
            );
            Schedule::default()
        }
    }
}
