//! Record store trait definitions.
//!
//! The managers depend on these traits rather than on a concrete database so
//! that the same admission logic runs against PostgreSQL in production and
//! against [`MemoryStore`](super::MemoryStore) in tests.
//!
//! Multi-statement sequences that must be atomic (tournament + fixtures,
//! capacity check + registration, membership check + insert) go through a
//! [`StoreTransaction`] obtained from [`RecordStore::begin`]. Dropping a
//! transaction without calling [`StoreTransaction::commit`] discards every
//! write made through it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::StoreResult;
use crate::auth::{Session, User, UserCredentials, UserId};
use crate::team::{Membership, Team, TeamId, TeamMember};
use crate::tournament::{
    Fixture, FixtureId, Pairing, RegisteredTeam, Registration, Tournament, TournamentDraft,
    TournamentSummary,
};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; a taken email is a unique violation
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> StoreResult<User>;

    /// Find user and credential hash by email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserCredentials>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> StoreResult<Option<User>>;

    /// Update user's last login timestamp
    async fn update_last_login(&self, user_id: UserId) -> StoreResult<()>;
}

/// Trait for refresh-token session operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new refresh token
    async fn create_session(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<Session>;

    /// Find session by refresh token
    async fn find_session(&self, token: &str) -> StoreResult<Option<Session>>;

    /// Delete session, returns whether one existed
    async fn delete_session(&self, token: &str) -> StoreResult<bool>;
}

/// Tournament, fixture and team records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Start an atomic unit of work
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>>;

    /// Check that the store is reachable
    async fn health_check(&self) -> StoreResult<()>;

    /// All tournaments with their owner's display name, earliest date first
    async fn list_tournaments(&self) -> StoreResult<Vec<TournamentSummary>>;

    async fn find_tournament(&self, tournament_id: &str) -> StoreResult<Option<Tournament>>;

    /// Fixtures of a tournament in creation order
    async fn list_fixtures(&self, tournament_id: &str) -> StoreResult<Vec<Fixture>>;

    async fn find_fixture(&self, fixture_id: FixtureId) -> StoreResult<Option<Fixture>>;

    /// Overwrite both scores; `None` when the fixture does not exist
    async fn update_fixture_score(
        &self,
        fixture_id: FixtureId,
        score_a: i32,
        score_b: i32,
    ) -> StoreResult<Option<Fixture>>;

    /// Roster of a tournament in registration order
    async fn list_registrations(&self, tournament_id: &str) -> StoreResult<Vec<RegisteredTeam>>;

    async fn find_team(&self, team_id: TeamId) -> StoreResult<Option<Team>>;

    async fn list_team_members(&self, team_id: TeamId) -> StoreResult<Vec<TeamMember>>;

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>>;
}

/// Reads and writes that belong to one atomic unit of work
#[async_trait]
pub trait StoreTransaction: Send {
    async fn insert_tournament(&mut self, draft: &TournamentDraft) -> StoreResult<Tournament>;

    async fn insert_fixtures(
        &mut self,
        tournament_id: &str,
        pairings: &[Pairing],
    ) -> StoreResult<Vec<Fixture>>;

    /// Read a tournament and hold it exclusively until the transaction ends
    async fn lock_tournament(&mut self, tournament_id: &str) -> StoreResult<Option<Tournament>>;

    /// Read a team and hold it exclusively until the transaction ends
    async fn lock_team(&mut self, team_id: TeamId) -> StoreResult<Option<Team>>;

    async fn count_registrations(&mut self, tournament_id: &str) -> StoreResult<i64>;

    async fn registration_exists(&mut self, tournament_id: &str, team_id: TeamId)
    -> StoreResult<bool>;

    /// A duplicate pair is a unique violation
    async fn insert_registration(
        &mut self,
        tournament_id: &str,
        team_id: TeamId,
    ) -> StoreResult<Registration>;

    async fn insert_team(
        &mut self,
        captain_user_id: UserId,
        name: &str,
        description: &str,
    ) -> StoreResult<Team>;

    async fn find_user_by_email(&mut self, email: &str) -> StoreResult<Option<User>>;

    async fn membership_exists(&mut self, team_id: TeamId, user_id: UserId) -> StoreResult<bool>;

    /// A duplicate pair is a unique violation
    async fn insert_membership(&mut self, team_id: TeamId, user_id: UserId)
    -> StoreResult<Membership>;

    /// Make every write of this transaction durable
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
