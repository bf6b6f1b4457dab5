//! # Bracket
//!
//! Tournament bracket management: round-robin schedule generation, capacity-limited
//! team rosters, team membership and match results, all backed by a relational
//! record store.
//!
//! ## Core Modules
//!
//! - [`tournament`]: Schedule generator, roster admission and result recording
//! - [`team`]: Persistent teams and captain-controlled membership
//! - [`auth`]: Registration, login and token sessions
//! - [`db`]: Record store traits with PostgreSQL and in-memory implementations
//!
//! ## Example
//!
//! ```
//! use bracket::generate_schedule;
//!
//! let schedule = generate_schedule(3);
//! assert_eq!(schedule.len(), 3);
//! assert_eq!(schedule[0].team_a, "Team 1");
//! assert_eq!(schedule[0].team_b, "Team 2");
//! ```

pub mod auth;
pub mod context;
pub mod db;
pub mod errors;
pub mod team;
pub mod tournament;

pub use context::RequestContext;
pub use errors::ErrorKind;
pub use tournament::schedule::{Pairing, generate_schedule};
