//! Teams and team membership.
//!
//! A team is created by its captain, who becomes its first member. Only the
//! captain may invite further members, by the email they registered with.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{TeamError, TeamResult};
pub use manager::TeamManager;
pub use models::{Membership, NewTeam, Team, TeamDetail, TeamId, TeamMember};
