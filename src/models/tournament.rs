//! Tournament model and its settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityId, Player, PlayerId, Referee, Round, TournamentId};

/// Pairing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    #[default]
    RoundRobin,
    DoubleRoundRobin,
    Swiss,
}

impl std::str::FromStr for TournamentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "round_robin" => Ok(TournamentType::RoundRobin),
            "double_round_robin" => Ok(TournamentType::DoubleRoundRobin),
            "swiss" => Ok(TournamentType::Swiss),
            other => Err(format!("unknown tournament type: {}", other)),
        }
    }
}

/// Time control family, selects which rating seeds the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentSpeed {
    Bullet,
    Blitz,
    #[default]
    Rapid,
    Classical,
}

/// Where the games are played, selects the rating pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardType {
    #[default]
    Lichess,
    Otb,
}

/// Tie-break criteria a tournament can rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingSystem {
    PlainScore,
    Wins,
    BlackTimes,
    Buchholz,
    SonnebornBerger,
}

impl RankingSystem {
    pub const ALL: [RankingSystem; 5] = [
        RankingSystem::PlainScore,
        RankingSystem::Wins,
        RankingSystem::BlackTimes,
        RankingSystem::Buchholz,
        RankingSystem::SonnebornBerger,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RankingSystem::PlainScore => "plain_score",
            RankingSystem::Wins => "wins",
            RankingSystem::BlackTimes => "black_times",
            RankingSystem::Buchholz => "buchholz",
            RankingSystem::SonnebornBerger => "sonneborn_berger",
        }
    }
}

impl std::fmt::Display for RankingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for RankingSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RankingSystem::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| format!("unknown ranking criterion: {}", s))
    }
}

/// Points awarded per game outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default = "default_win_points")]
    pub win_points: f64,

    #[serde(default = "default_draw_points")]
    pub draw_points: f64,

    #[serde(default = "default_lose_points")]
    pub lose_points: f64,
}

fn default_win_points() -> f64 {
    1.0
}

fn default_draw_points() -> f64 {
    0.5
}

fn default_lose_points() -> f64 {
    0.0
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            win_points: default_win_points(),
            draw_points: default_draw_points(),
            lose_points: default_lose_points(),
        }
    }
}

/// A tournament and its enrolled players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique identifier
    pub id: TournamentId,

    pub name: String,

    #[serde(default)]
    pub referee: Option<Referee>,

    /// Enrolled players, in enrolment order
    #[serde(default)]
    pub players: Vec<Player>,

    #[serde(default)]
    pub tournament_type: TournamentType,

    #[serde(default)]
    pub speed: TournamentSpeed,

    #[serde(default)]
    pub board_type: BoardType,

    #[serde(default)]
    pub scoring: ScoringRules,

    #[serde(default = "default_time_control")]
    pub time_control: String,

    /// Seconds allowed for fetching results from the rating provider
    #[serde(default = "default_max_update_time")]
    pub max_update_time: u64,

    /// Only administrators may edit games
    #[serde(default)]
    pub only_administrative: bool,

    #[serde(default)]
    pub number_of_rounds_for_swiss: u32,

    /// Tie-break criteria, applied in order
    #[serde(default)]
    pub ranking_list: Vec<RankingSystem>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_time_control() -> String {
    "15+0".to_string()
}

fn default_max_update_time() -> u64 {
    43200
}

impl Tournament {
    /// Create a tournament with default settings. The id is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = EntityId::generate(&["tournament", &name]);

        Self {
            id,
            name,
            referee: None,
            players: Vec::new(),
            tournament_type: TournamentType::default(),
            speed: TournamentSpeed::default(),
            board_type: BoardType::default(),
            scoring: ScoringRules::default(),
            time_control: default_time_control(),
            max_update_time: default_max_update_time(),
            only_administrative: false,
            number_of_rounds_for_swiss: 0,
            ranking_list: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players sorted by the rating matching the tournament's board type
    /// and speed, highest first. Equal ratings keep enrolment order.
    pub fn seeded_players(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by_key(|p| std::cmp::Reverse(p.rating(self.board_type, self.speed)));
        players
    }

    pub fn clear_ranking_list(&mut self) {
        self.ranking_list.clear();
    }

    /// Append a criterion. Returns false if it was already configured.
    pub fn add_to_ranking_list(&mut self, criterion: RankingSystem) -> bool {
        if self.ranking_list.contains(&criterion) {
            return false;
        }
        self.ranking_list.push(criterion);
        true
    }

    /// Number of rounds belonging to this tournament.
    pub fn round_count(&self, rounds: &[Round]) -> usize {
        self.own_rounds(rounds).count()
    }

    /// Number of rounds with at least one finished game.
    pub fn rounds_with_finished_games(&self, rounds: &[Round]) -> usize {
        self.own_rounds(rounds)
            .filter(|r| r.has_finished_games())
            .count()
    }

    /// The round holding the most recently updated game.
    pub fn latest_round_with_games<'a>(&self, rounds: &'a [Round]) -> Option<&'a Round> {
        let mut latest: Option<&Round> = None;
        let mut latest_update = None;

        for round in self.own_rounds(rounds) {
            if let Some(updated) = round.last_game_update() {
                if latest_update.map_or(true, |current| current < updated) {
                    latest_update = Some(updated);
                    latest = Some(round);
                }
            }
        }

        latest
    }

    fn own_rounds<'s, 'r: 's>(&'s self, rounds: &'r [Round]) -> impl Iterator<Item = &'r Round> + 's {
        rounds.iter().filter(move |r| r.tournament_id == self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Game, GameResult};
    use chrono::Duration;

    fn tournament_with_players(n: u64) -> Tournament {
        let mut tournament = Tournament::new("Test Tournament");
        for id in 1..=n {
            tournament.players.push(Player::new(PlayerId(id), format!("Player {}", id)));
        }
        tournament
    }

    #[test]
    fn test_tournament_defaults() {
        let tournament = Tournament::new("Open");
        assert_eq!(tournament.scoring, ScoringRules::default());
        assert_eq!(tournament.time_control, "15+0");
        assert_eq!(tournament.max_update_time, 43200);
        assert_eq!(tournament.tournament_type, TournamentType::RoundRobin);
        assert!(tournament.ranking_list.is_empty());
    }

    #[test]
    fn test_tournament_deserialize_minimal() {
        let json = r#"{"id": "t1", "name": "Minimal"}"#;
        let tournament: Tournament = serde_json::from_str(json).unwrap();
        assert_eq!(tournament.scoring.draw_points, 0.5);
        assert_eq!(tournament.board_type, BoardType::Lichess);
        assert!(tournament.players.is_empty());
    }

    #[test]
    fn test_ranking_system_names() {
        for criterion in RankingSystem::ALL {
            assert_eq!(criterion.name().parse::<RankingSystem>(), Ok(criterion));
        }
        assert!("median".parse::<RankingSystem>().is_err());
        let json = serde_json::to_string(&RankingSystem::BlackTimes).unwrap();
        assert_eq!(json, "\"black_times\"");
    }

    #[test]
    fn test_ranking_list_edits() {
        let mut tournament = Tournament::new("Open");
        assert!(tournament.add_to_ranking_list(RankingSystem::Wins));
        assert!(tournament.add_to_ranking_list(RankingSystem::Buchholz));
        assert!(!tournament.add_to_ranking_list(RankingSystem::Wins));
        assert_eq!(
            tournament.ranking_list,
            vec![RankingSystem::Wins, RankingSystem::Buchholz]
        );

        tournament.clear_ranking_list();
        assert!(tournament.ranking_list.is_empty());
    }

    #[test]
    fn test_seeded_players_by_board_and_speed() {
        let mut tournament = tournament_with_players(3);
        tournament.speed = TournamentSpeed::Classical;
        tournament.board_type = BoardType::Otb;
        tournament.players[0].fide_ratings.classical = Some(1800);
        tournament.players[1].fide_ratings.classical = Some(2100);
        tournament.players[2].lichess_ratings.classical = Some(2500);

        let seeded: Vec<PlayerId> = tournament.seeded_players().iter().map(|p| p.id).collect();
        assert_eq!(seeded, vec![PlayerId(2), PlayerId(1), PlayerId(3)]);

        tournament.board_type = BoardType::Lichess;
        let seeded: Vec<PlayerId> = tournament.seeded_players().iter().map(|p| p.id).collect();
        assert_eq!(seeded, vec![PlayerId(3), PlayerId(1), PlayerId(2)]);
    }

    #[test]
    fn test_round_progress_queries() {
        let tournament = tournament_with_players(4);
        let mut rounds: Vec<Round> = (1..=3).map(|n| Round::new(tournament.id.clone(), n)).collect();
        rounds.push(Round::new(EntityId::from("other"), 1));

        assert_eq!(tournament.round_count(&rounds), 3);
        assert_eq!(tournament.rounds_with_finished_games(&rounds), 0);
        assert!(tournament.latest_round_with_games(&rounds).is_none());

        let mut early = Game::new(rounds[0].id.clone(), 0, Some(PlayerId(1)), Some(PlayerId(2)));
        early.record_result(GameResult::Draw).unwrap();
        let mut late = Game::new(rounds[1].id.clone(), 0, Some(PlayerId(3)), Some(PlayerId(4)));
        late.updated_at = early.updated_at + Duration::seconds(60);
        rounds[0].games.push(early);
        rounds[1].games.push(late);

        assert_eq!(tournament.rounds_with_finished_games(&rounds), 1);
        let latest = tournament.latest_round_with_games(&rounds).unwrap();
        assert_eq!(latest.name, "Round 2");
    }
}
