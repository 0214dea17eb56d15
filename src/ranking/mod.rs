//! Ranking engine.
//!
//! Turns finished game results into a standing table:
//! - plain score per player from the tournament's point values
//! - players grouped by equal plain score, highest first
//! - tied groups ordered by the configured tie-break criteria
//! - ranks handed out 1..N without gaps or shared values

pub mod criteria;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Color, Game, GameResult, PlayerId, Round, ScoringRules, Standing, Tournament};

pub use criteria::{RankingContext, TieBreak, TieBreakRegistry};

/// Per-player aggregate over finished games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub score: f64,
    pub wins: u32,
    pub black_times: u32,
}

/// Aggregate a player's games.
///
/// Games the player is not in, unfinished games and games without a result
/// are skipped. Exactly one scoring branch applies to every other game.
pub fn tally<'a>(
    player: PlayerId,
    games: impl IntoIterator<Item = &'a Game>,
    scoring: &ScoringRules,
) -> PlayerTally {
    let mut t = PlayerTally::default();

    for game in games {
        let Some(color) = game.color_of(player) else {
            continue;
        };
        if !game.counts() {
            continue;
        }

        match game.result {
            GameResult::NotAvailable => {}
            GameResult::Draw => {
                t.score += scoring.draw_points;
                if color == Color::Black {
                    t.black_times += 1;
                }
            }
            GameResult::WhiteWins => match color {
                Color::White => {
                    t.score += scoring.win_points;
                    t.wins += 1;
                }
                Color::Black => {
                    t.score += scoring.lose_points;
                    t.black_times += 1;
                }
            },
            GameResult::BlackWins => match color {
                Color::Black => {
                    t.score += scoring.win_points;
                    t.wins += 1;
                    t.black_times += 1;
                }
                Color::White => t.score += scoring.lose_points,
            },
            GameResult::ByeHalf => t.score += scoring.draw_points,
            GameResult::ByeFull | GameResult::ByeUnplayed => t.score += scoring.win_points,
            GameResult::ByeZero => {}
            GameResult::ForfeitWin => {
                if color == Color::White {
                    t.score += scoring.win_points;
                }
            }
        }
    }

    t
}

/// Ranks tournaments using a tie-break registry.
#[derive(Default)]
pub struct RankingEngine {
    registry: TieBreakRegistry,
}

impl RankingEngine {
    pub fn new(registry: TieBreakRegistry) -> Self {
        Self { registry }
    }

    pub fn registry_mut(&mut self) -> &mut TieBreakRegistry {
        &mut self.registry
    }

    /// Standing table ordered by rank. Empty for a tournament without players.
    pub fn rank(&self, tournament: &Tournament, rounds: &[Round]) -> Vec<Standing> {
        let players = tournament.player_ids();
        if players.is_empty() {
            return Vec::new();
        }

        let games: Vec<&Game> = rounds
            .iter()
            .filter(|r| r.tournament_id == tournament.id)
            .flat_map(|r| r.games.iter())
            .collect();

        let tallies: HashMap<PlayerId, PlayerTally> = players
            .iter()
            .map(|&p| (p, tally(p, games.iter().copied(), &tournament.scoring)))
            .collect();

        let ctx = RankingContext {
            tournament,
            rounds,
            tallies: &tallies,
        };

        let criteria = &tournament.ranking_list;
        let tie_breaks: HashMap<PlayerId, BTreeMap<_, f64>> = players
            .iter()
            .map(|&p| {
                let values = criteria
                    .iter()
                    .map(|&c| (c, self.registry.value(c, p, &ctx)))
                    .collect();
                (p, values)
            })
            .collect();

        // Score groups, players in enrolment order within each group. Scores
        // are sums of configured point values, so exact equality is the tie.
        let mut groups: Vec<(f64, Vec<PlayerId>)> = Vec::new();
        for &player in &players {
            let score = tallies[&player].score;
            match groups.iter_mut().find(|(s, _)| *s == score) {
                Some((_, members)) => members.push(player),
                None => groups.push((score, vec![player])),
            }
        }
        groups.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut standings = Vec::with_capacity(players.len());
        let mut rank = 1u32;

        for (score, mut members) in groups {
            if members.len() > 1 {
                debug!(
                    "{} players tied on {}, applying {} criteria",
                    members.len(),
                    score,
                    criteria.len()
                );
                // Successive stable sorts: ties under a criterion keep the
                // order left by the previous one.
                for criterion in criteria {
                    members.sort_by(|a, b| {
                        let va = tie_breaks[a][criterion];
                        let vb = tie_breaks[b][criterion];
                        vb.total_cmp(&va)
                    });
                }
            }

            for player in members {
                let t = tallies[&player];
                standings.push(Standing {
                    player,
                    rank,
                    score: t.score,
                    wins: t.wins,
                    black_times: t.black_times,
                    tie_breaks: tie_breaks[&player].clone(),
                });
                rank += 1;
            }
        }

        debug!(
            "Ranked {} players in tournament {}",
            standings.len(),
            tournament.name
        );
        standings
    }
}

/// Rank a tournament with the standard criteria.
pub fn compute_ranking(tournament: &Tournament, rounds: &[Round]) -> Vec<Standing> {
    RankingEngine::default().rank(tournament, rounds)
}
