//! Tournament snapshots.
//!
//! A snapshot is a consistent JSON document holding one tournament and its
//! rounds. The tournament service hands snapshots to the scheduler and the
//! ranking engine and takes the updated document back.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::find_duplicate_player;
use crate::models::{GameError, GameId, GameResult, PlayerId, Round, Standing, Tournament};
use crate::ranking::RankingEngine;
use crate::schedule::schedule_for;

/// Errors that can occur while loading or updating a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Game {game} refers to player {player}, who is not enrolled")]
    UnknownPlayer { game: GameId, player: PlayerId },

    #[error("Player {0} is enrolled more than once")]
    DuplicatePlayer(PlayerId),

    #[error("Tournament {0} already has rounds")]
    AlreadyScheduled(String),

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// One tournament and its rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub tournament: Tournament,

    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl TournamentSnapshot {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            rounds: Vec::new(),
        }
    }

    /// Read and validate a snapshot file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path)?;
        let snapshot: TournamentSnapshot = serde_json::from_reader(BufReader::new(file))?;
        snapshot.validate()?;

        debug!(
            "Loaded tournament {} with {} rounds from {:?}",
            snapshot.tournament.name,
            snapshot.rounds.len(),
            path
        );
        Ok(snapshot)
    }

    /// Write the snapshot, replacing the file.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;

        info!("Wrote tournament {} to {:?}", self.tournament.name, path);
        Ok(())
    }

    /// Players are enrolled at most once, and every game participant must be
    /// enrolled in the tournament.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if let Some(player) = find_duplicate_player(&self.tournament.player_ids()) {
            return Err(SnapshotError::DuplicatePlayer(player));
        }

        for game in self.rounds.iter().flat_map(|r| &r.games) {
            for player in [game.white, game.black].into_iter().flatten() {
                if self.tournament.player(player).is_none() {
                    return Err(SnapshotError::UnknownPlayer {
                        game: game.id.clone(),
                        player,
                    });
                }
            }
        }
        Ok(())
    }

    /// Generate and store the tournament's rounds. Scheduling happens at most
    /// once per tournament. Returns the number of rounds created, which is 0
    /// when the player count cannot be paired.
    pub fn schedule(&mut self) -> Result<usize, SnapshotError> {
        self.validate()?;
        if self.tournament.round_count(&self.rounds) > 0 {
            return Err(SnapshotError::AlreadyScheduled(self.tournament.name.clone()));
        }

        let rounds = schedule_for(&self.tournament).materialize(&self.tournament.id);
        let created = rounds.len();
        self.rounds.extend(rounds);

        info!(
            "Scheduled {} rounds for tournament {}",
            created, self.tournament.name
        );
        Ok(created)
    }

    /// Record a result on an unfinished game.
    pub fn record_result(&mut self, game_id: &GameId, result: GameResult) -> Result<(), SnapshotError> {
        let game = self
            .rounds
            .iter_mut()
            .flat_map(|r| r.games.iter_mut())
            .find(|g| &g.id == game_id)
            .ok_or_else(|| SnapshotError::GameNotFound(game_id.clone()))?;

        game.record_result(result)?;
        info!("Recorded {} for game {}", result, game_id);
        Ok(())
    }

    pub fn standings(&self, engine: &RankingEngine) -> Vec<Standing> {
        engine.rank(&self.tournament, &self.rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Game, Player, TournamentType};

    fn snapshot(n: u64) -> TournamentSnapshot {
        let mut tournament = Tournament::new("Snapshot Test");
        for id in 1..=n {
            tournament
                .players
                .push(Player::new(PlayerId(id), format!("Player {}", id)));
        }
        TournamentSnapshot::new(tournament)
    }

    #[test]
    fn test_schedule_once() {
        let mut snap = snapshot(4);
        assert_eq!(snap.schedule().unwrap(), 3);
        assert_eq!(snap.rounds.len(), 3);

        assert!(matches!(
            snap.schedule(),
            Err(SnapshotError::AlreadyScheduled(_))
        ));
        assert_eq!(snap.rounds.len(), 3);
    }

    #[test]
    fn test_schedule_odd_players_creates_nothing() {
        let mut snap = snapshot(5);
        assert_eq!(snap.schedule().unwrap(), 0);
        assert!(snap.rounds.is_empty());
    }

    #[test]
    fn test_schedule_double() {
        let mut snap = snapshot(4);
        snap.tournament.tournament_type = TournamentType::DoubleRoundRobin;
        assert_eq!(snap.schedule().unwrap(), 6);
    }

    #[test]
    fn test_record_result_then_rank() {
        let mut snap = snapshot(4);
        snap.schedule().unwrap();

        let first = snap.rounds[0].games[0].id.clone();
        snap.record_result(&first, GameResult::WhiteWins).unwrap();

        let err = snap.record_result(&first, GameResult::Draw).unwrap_err();
        assert!(matches!(err, SnapshotError::Game(GameError::AlreadyFinished(_))));

        let standings = snap.standings(&RankingEngine::default());
        assert_eq!(standings[0].player, PlayerId(1));
        assert_eq!(standings[0].score, 1.0);
    }

    #[test]
    fn test_record_result_unknown_game() {
        let mut snap = snapshot(4);
        let err = snap
            .record_result(&GameId::from("missing"), GameResult::Draw)
            .unwrap_err();
        assert!(matches!(err, SnapshotError::GameNotFound(_)));
    }

    #[test]
    fn test_validate_unknown_player() {
        let mut snap = snapshot(2);
        let mut round = Round::new(snap.tournament.id.clone(), 1);
        round
            .games
            .push(Game::new(round.id.clone(), 0, Some(PlayerId(1)), Some(PlayerId(9))));
        snap.rounds.push(round);

        match snap.validate() {
            Err(SnapshotError::UnknownPlayer { player, .. }) => assert_eq!(player, PlayerId(9)),
            other => panic!("expected UnknownPlayer, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_enrolment_rejected() {
        let mut snap = snapshot(3);
        snap.tournament
            .players
            .insert(1, Player::new(PlayerId(1), "Player 1 again"));

        assert!(matches!(
            snap.validate(),
            Err(SnapshotError::DuplicatePlayer(PlayerId(1)))
        ));
        assert!(matches!(
            snap.schedule(),
            Err(SnapshotError::DuplicatePlayer(PlayerId(1)))
        ));
        assert!(snap.rounds.is_empty());
    }

    #[test]
    fn test_load_rejects_duplicate_enrolment() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapshot.json");

        let mut snap = snapshot(2);
        snap.tournament.players.push(Player::new(PlayerId(2), "Twin"));
        snap.save(&path).unwrap();

        let err = TournamentSnapshot::load(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicatePlayer(PlayerId(2))));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("snapshot.json");

        let mut snap = snapshot(6);
        snap.schedule().unwrap();
        snap.save(&path).unwrap();

        let loaded = TournamentSnapshot::load(&path).unwrap();
        assert_eq!(loaded.tournament.id, snap.tournament.id);
        assert_eq!(loaded.rounds.len(), 5);
        assert_eq!(loaded.rounds[2].games[1].id, snap.rounds[2].games[1].id);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = TournamentSnapshot::load(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }

    #[test]
    fn test_load_hand_written_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"{
                "tournament": {
                    "id": "t1",
                    "name": "Club night",
                    "players": [
                        {"id": 1, "name": "Alyx", "created_at": "2024-01-01T00:00:00Z"},
                        {"id": 2, "name": "Bruno", "created_at": "2024-01-01T00:00:00Z"}
                    ],
                    "ranking_list": ["wins", "black_times"]
                },
                "rounds": [{
                    "id": "r1",
                    "name": "Round 1",
                    "tournament_id": "t1",
                    "started_at": null,
                    "ended_at": null,
                    "games": [{
                        "id": "g1",
                        "round_id": "r1",
                        "white": 1,
                        "black": 2,
                        "finished": true,
                        "result": "b",
                        "started_at": "2024-01-01T10:00:00Z",
                        "updated_at": "2024-01-01T11:00:00Z"
                    }]
                }]
            }"#,
        )
        .unwrap();

        let snap = TournamentSnapshot::load(&path).unwrap();
        let standings = snap.standings(&RankingEngine::default());
        assert_eq!(standings[0].player, PlayerId(2));
        assert_eq!(standings[0].wins, 1);
        assert_eq!(standings[0].black_times, 1);
    }
}
