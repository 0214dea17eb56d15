//! Tie-break criteria.
//!
//! Each criterion is a scorer registered under a [`RankingSystem`] key.
//! Higher values rank first.

use std::collections::HashMap;

use crate::models::{Color, Game, GameResult, PlayerId, RankingSystem, Round, Tournament};

use super::PlayerTally;

/// Everything a scorer may look at: the tournament, its rounds, and the
/// already computed per-player tallies.
pub struct RankingContext<'a> {
    pub tournament: &'a Tournament,
    pub rounds: &'a [Round],
    pub tallies: &'a HashMap<PlayerId, PlayerTally>,
}

impl<'a> RankingContext<'a> {
    pub fn tally(&self, player: PlayerId) -> PlayerTally {
        self.tallies.get(&player).copied().unwrap_or_default()
    }

    /// Finished, result-available games of this tournament the player took part in.
    pub fn games_of(&self, player: PlayerId) -> impl Iterator<Item = &'a Game> + 'a {
        let tournament: &'a Tournament = self.tournament;
        let rounds: &'a [Round] = self.rounds;
        let tournament_id = &tournament.id;
        rounds
            .iter()
            .filter(move |r| &r.tournament_id == tournament_id)
            .flat_map(|r| r.games.iter())
            .filter(move |g| g.counts() && g.color_of(player).is_some())
    }
}

/// A tie-break scorer.
pub trait TieBreak: Send + Sync {
    fn value(&self, player: PlayerId, ctx: &RankingContext<'_>) -> f64;
}

impl<F> TieBreak for F
where
    F: Fn(PlayerId, &RankingContext<'_>) -> f64 + Send + Sync,
{
    fn value(&self, player: PlayerId, ctx: &RankingContext<'_>) -> f64 {
        self(player, ctx)
    }
}

/// Criterion to scorer lookup.
pub struct TieBreakRegistry {
    scorers: HashMap<RankingSystem, Box<dyn TieBreak>>,
}

impl TieBreakRegistry {
    /// A registry with no scorers. Every criterion scores 0.
    pub fn empty() -> Self {
        Self {
            scorers: HashMap::new(),
        }
    }

    /// Register a scorer, returning the one it replaces.
    pub fn register(
        &mut self,
        criterion: RankingSystem,
        scorer: impl TieBreak + 'static,
    ) -> Option<Box<dyn TieBreak>> {
        self.scorers.insert(criterion, Box::new(scorer))
    }

    /// Value of a criterion for a player; unregistered criteria score 0.
    pub fn value(&self, criterion: RankingSystem, player: PlayerId, ctx: &RankingContext<'_>) -> f64 {
        self.scorers
            .get(&criterion)
            .map_or(0.0, |scorer| scorer.value(player, ctx))
    }
}

impl Default for TieBreakRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(RankingSystem::PlainScore, plain_score);
        registry.register(RankingSystem::Wins, wins);
        registry.register(RankingSystem::BlackTimes, black_times);
        registry.register(RankingSystem::Buchholz, buchholz);
        registry.register(RankingSystem::SonnebornBerger, sonneborn_berger);
        registry
    }
}

pub fn plain_score(player: PlayerId, ctx: &RankingContext<'_>) -> f64 {
    ctx.tally(player).score
}

pub fn wins(player: PlayerId, ctx: &RankingContext<'_>) -> f64 {
    f64::from(ctx.tally(player).wins)
}

pub fn black_times(player: PlayerId, ctx: &RankingContext<'_>) -> f64 {
    f64::from(ctx.tally(player).black_times)
}

/// Sum of the plain scores of every opponent faced over the board.
pub fn buchholz(player: PlayerId, ctx: &RankingContext<'_>) -> f64 {
    ctx.games_of(player)
        .filter(|g| g.is_played())
        .filter_map(|g| g.opponent_of(player))
        .map(|opponent| ctx.tally(opponent).score)
        .sum()
}

/// Plain scores of beaten opponents plus half those of drawn opponents.
pub fn sonneborn_berger(player: PlayerId, ctx: &RankingContext<'_>) -> f64 {
    let mut total = 0.0;

    for game in ctx.games_of(player) {
        let (Some(color), Some(opponent)) = (game.color_of(player), game.opponent_of(player))
        else {
            continue;
        };
        let opponent_score = ctx.tally(opponent).score;

        match (game.result, color) {
            (GameResult::WhiteWins, Color::White) | (GameResult::BlackWins, Color::Black) => {
                total += opponent_score
            }
            (GameResult::Draw, _) => total += opponent_score / 2.0,
            _ => {}
        }
    }

    total
}
