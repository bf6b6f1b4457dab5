//! Team data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

/// Team ID type
pub type TeamId = i64;

/// Stored team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: String,
    pub captain_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Team creation form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
}

/// (team, user) membership record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub team_id: TeamId,
    pub user_id: UserId,
}

/// Member as shown on the team page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
}

/// Team with its captain and members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDetail {
    pub team: Team,
    pub captain_display_name: String,
    pub members: Vec<TeamMember>,
}
