//! Player and referee records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BoardType, PlayerId, TournamentSpeed};

/// Ratings for one rating pool, by time control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default)]
    pub bullet: Option<i32>,
    #[serde(default)]
    pub blitz: Option<i32>,
    #[serde(default)]
    pub rapid: Option<i32>,
    #[serde(default)]
    pub classical: Option<i32>,
}

impl Ratings {
    /// Rating for a speed. Missing ratings read as 0.
    pub fn for_speed(&self, speed: TournamentSpeed) -> i32 {
        let rating = match speed {
            TournamentSpeed::Bullet => self.bullet,
            TournamentSpeed::Blitz => self.blitz,
            TournamentSpeed::Rapid => self.rapid,
            TournamentSpeed::Classical => self.classical,
        };
        rating.unwrap_or(0)
    }
}

/// A registered player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// ISO 3166-1 alpha-2 country code
    #[serde(default)]
    pub country: Option<String>,

    /// Lichess account name
    #[serde(default)]
    pub lichess_username: Option<String>,

    /// Lichess ratings
    #[serde(default)]
    pub lichess_ratings: Ratings,

    /// FIDE identifier
    #[serde(default)]
    pub fide_id: Option<u64>,

    /// FIDE ratings (FIDE publishes no bullet rating)
    #[serde(default)]
    pub fide_ratings: Ratings,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            email: None,
            country: None,
            lichess_username: None,
            lichess_ratings: Ratings::default(),
            fide_id: None,
            fide_ratings: Ratings::default(),
            created_at: Utc::now(),
        }
    }

    /// Rating used for seeding in a tournament with the given board type and speed.
    pub fn rating(&self, board: BoardType, speed: TournamentSpeed) -> i32 {
        match board {
            BoardType::Lichess => self.lichess_ratings.for_speed(speed),
            BoardType::Otb => match speed {
                TournamentSpeed::Bullet => 0,
                _ => self.fide_ratings.for_speed(speed),
            },
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.lichess_username, &self.name) {
            (Some(username), _) => write!(f, "{}", username),
            (None, Some(name)) => write!(f, "{}", name),
            (None, None) => write!(f, "Player {}", self.id),
        }
    }
}

/// Tournament referee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Referee {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_referee_number")]
    pub referee_number: String,
}

fn default_referee_number() -> String {
    "-1".to_string()
}

impl Default for Referee {
    fn default() -> Self {
        Self {
            name: None,
            referee_number: default_referee_number(),
        }
    }
}

impl std::fmt::Display for Referee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.name.as_deref().unwrap_or(""),
            self.referee_number
        )
    }
}
