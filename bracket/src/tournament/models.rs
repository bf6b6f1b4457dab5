//! Tournament data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::team::TeamId;

/// Tournament ID type (opaque short token)
pub type TournamentId = String;

/// Fixture ID type
pub type FixtureId = i64;

/// Stored tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub sport: String,
    pub date: NaiveDate,
    /// Declared team capacity, fixed at creation
    pub capacity: i32,
    pub description: String,
    pub owner_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Raw tournament form as submitted by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub sport: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Unparsed team count
    pub team_count: String,
    pub description: String,
}

/// Validated tournament ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentDraft {
    pub id: TournamentId,
    pub name: String,
    pub sport: String,
    pub date: NaiveDate,
    pub capacity: i32,
    pub description: String,
    pub owner_user_id: UserId,
}

/// Row of the tournament index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub sport: String,
    pub date: NaiveDate,
    pub owner_display_name: String,
}

/// One scheduled match between two team labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub tournament_id: TournamentId,
    pub team_a: String,
    pub team_b: String,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
}

impl Fixture {
    /// Whether a result has been reported
    pub fn is_played(&self) -> bool {
        self.score_a.is_some() && self.score_b.is_some()
    }
}

/// Team enrolled in a tournament roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
    pub registered_at: DateTime<Utc>,
}

/// Roster entry joined with the team name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredTeam {
    pub team_id: TeamId,
    pub team_name: String,
    pub registered_at: DateTime<Utc>,
}

/// Tournament with its schedule and roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDetail {
    pub tournament: Tournament,
    pub fixtures: Vec<Fixture>,
    pub registrations: Vec<RegisteredTeam>,
}

impl TournamentDetail {
    /// Free roster places left
    pub fn open_slots(&self) -> usize {
        (self.tournament.capacity.max(0) as usize).saturating_sub(self.registrations.len())
    }
}
