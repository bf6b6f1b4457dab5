//! Round-robin schedule generation.
//!
//! Teams are placeholders named `Team 1`..`Team N`. Every unordered pair of
//! labels appears exactly once, emitted with the outer index ascending and the
//! inner index ascending, so `generate_schedule(4)` is always
//! `(1,2) (1,3) (1,4) (2,3) (2,4) (3,4)`.

use serde::{Deserialize, Serialize};

use super::errors::{TournamentError, TournamentResult};

/// Largest team count accepted from user input
pub const MAX_TEAM_COUNT: u32 = 256;

/// Unscored matchup between two team labels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub team_a: String,
    pub team_b: String,
}

/// Placeholder label for the team at 1-based `position`
pub fn team_label(position: u32) -> String {
    format!("Team {position}")
}

/// `Team 1`..`Team N`
pub fn team_labels(team_count: u32) -> Vec<String> {
    (1..=team_count).map(team_label).collect()
}

/// Number of fixtures a round robin of `team_count` teams produces: C(N, 2)
pub fn fixture_count(team_count: u32) -> usize {
    let n = team_count as usize;
    n * n.saturating_sub(1) / 2
}

/// Every pairing of `team_count` placeholder teams, in display order.
///
/// Zero or one team yields an empty schedule.
pub fn generate_schedule(team_count: u32) -> Vec<Pairing> {
    let labels = team_labels(team_count);
    let mut schedule = Vec::with_capacity(fixture_count(team_count));

    for (i, team_a) in labels.iter().enumerate() {
        for team_b in &labels[i + 1..] {
            schedule.push(Pairing {
                team_a: team_a.clone(),
                team_b: team_b.clone(),
            });
        }
    }

    log::debug!(
        "Generated round robin for {} teams: {} fixtures",
        team_count,
        schedule.len()
    );

    schedule
}

/// Parse a team count typed by a user.
///
/// # Errors
///
/// * `TournamentError::Validation` - not a whole number, negative, or above
///   [`MAX_TEAM_COUNT`]
pub fn parse_team_count(input: &str) -> TournamentResult<u32> {
    let value: i64 = input.trim().parse().map_err(|_| {
        TournamentError::Validation(format!("team count must be a whole number, got {input:?}"))
    })?;

    if value < 0 {
        return Err(TournamentError::Validation(
            "team count cannot be negative".to_string(),
        ));
    }

    if value > i64::from(MAX_TEAM_COUNT) {
        return Err(TournamentError::Validation(format!(
            "team count cannot exceed {MAX_TEAM_COUNT}"
        )));
    }

    Ok(value as u32)
}
