//! Tournament module: schedules, rosters and results.
//!
//! This module provides:
//! - Round-robin schedule generation between placeholder teams
//! - Tournament creation, persisted atomically with its full schedule
//! - Captain-only, capacity-limited team registration
//! - Match result recording
//!
//! ## Example
//!
//! ```no_run
//! use bracket::RequestContext;
//! use bracket::db::MemoryStore;
//! use bracket::tournament::{NewTournament, TournamentManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TournamentManager::new(Arc::new(MemoryStore::new()));
//!     let ctx = RequestContext::new(1);
//!
//!     let detail = manager
//!         .create_tournament(
//!             &ctx,
//!             NewTournament {
//!                 name: "Summer Cup".to_string(),
//!                 sport: "volleyball".to_string(),
//!                 date: "2026-07-04".to_string(),
//!                 team_count: "6".to_string(),
//!                 description: String::new(),
//!             },
//!         )
//!         .await?;
//!
//!     println!("{} fixtures", detail.fixtures.len());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod roster;
pub mod schedule;

pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    Fixture, FixtureId, NewTournament, RegisteredTeam, Registration, Tournament, TournamentDetail,
    TournamentDraft, TournamentId, TournamentSummary,
};
pub use roster::RosterManager;
pub use schedule::{MAX_TEAM_COUNT, Pairing, generate_schedule, parse_team_count};
