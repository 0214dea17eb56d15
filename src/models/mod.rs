//! Core data models for tournaments.

mod game;
mod ids;
mod player;
mod round;
mod standing;
mod tournament;

pub use game::*;
pub use ids::*;
pub use player::*;
pub use round::*;
pub use standing::*;
pub use tournament::*;
