//! # Chess Tournament
//!
//! Round-robin scheduling and tie-break rankings for chess tournaments.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, tournaments, rounds, games, standings)
//! - **schedule**: Round-robin pairing generation
//! - **ranking**: Score aggregation and tie-break ordering
//! - **snapshot**: JSON tournament snapshots exchanged with the tournament service
//! - **config**: Configuration loading and validation

pub mod config;
pub mod models;
pub mod ranking;
pub mod schedule;
pub mod snapshot;

pub use models::*;

/// Parse a comma-separated list of player ids (e.g., "1,2,3,4").
///
/// Returns `None` if any entry is not a non-negative integer.
pub fn parse_player_ids(s: &str) -> Option<Vec<PlayerId>> {
    let s = s.trim();
    if s.is_empty() {
        return Some(Vec::new());
    }

    s.split(',')
        .map(|part| part.trim().parse::<u64>().ok().map(PlayerId))
        .collect()
}

/// The first id that appears more than once, if any.
pub fn find_duplicate_player(ids: &[PlayerId]) -> Option<PlayerId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player_ids() {
        assert_eq!(
            parse_player_ids("1,2,3"),
            Some(vec![PlayerId(1), PlayerId(2), PlayerId(3)])
        );
    }

    #[test]
    fn test_parse_player_ids_whitespace() {
        assert_eq!(
            parse_player_ids(" 4 , 10 "),
            Some(vec![PlayerId(4), PlayerId(10)])
        );
    }

    #[test]
    fn test_parse_player_ids_empty() {
        assert_eq!(parse_player_ids(""), Some(Vec::new()));
    }

    #[test]
    fn test_parse_player_ids_invalid() {
        assert_eq!(parse_player_ids("1,two,3"), None);
        assert_eq!(parse_player_ids("1,,3"), None);
        assert_eq!(parse_player_ids("-1"), None);
    }

    #[test]
    fn test_find_duplicate_player() {
        let ids = parse_player_ids("1,2,3,4").unwrap();
        assert_eq!(find_duplicate_player(&ids), None);

        let ids = parse_player_ids("1,1,2,3").unwrap();
        assert_eq!(find_duplicate_player(&ids), Some(PlayerId(1)));

        let ids = parse_player_ids("5,2,7,2,5").unwrap();
        assert_eq!(find_duplicate_player(&ids), Some(PlayerId(2)));
    }
}
