//! In-process record store.
//!
//! Every table lives behind one async mutex. A transaction holds that mutex
//! for its whole lifetime and buffers its inserts, which are applied to the
//! state only on commit. This serializes units of work the same way the
//! row locks do in [`PgStore`](super::PgStore), so the admission invariants
//! can be exercised under concurrency without a database.
//!
//! Calling a [`RecordStore`] method while holding a [`MemoryTransaction`] from
//! the same store waits forever; the managers never do this.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    errors::{StoreError, StoreResult},
    repository::{RecordStore, SessionRepository, StoreTransaction, UserRepository},
};
use crate::auth::{Session, User, UserCredentials, UserId};
use crate::team::{Membership, Team, TeamId, TeamMember};
use crate::tournament::{
    Fixture, FixtureId, Pairing, RegisteredTeam, Registration, Tournament, TournamentDraft,
    TournamentSummary,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<UserId, UserCredentials>,
    sessions: HashMap<String, Session>,
    tournaments: BTreeMap<String, Tournament>,
    fixtures: BTreeMap<FixtureId, Fixture>,
    teams: BTreeMap<TeamId, Team>,
    memberships: Vec<Membership>,
    registrations: Vec<Registration>,
    last_user_id: i64,
    last_fixture_id: i64,
    last_team_id: i64,
    last_membership_id: i64,
    last_registration_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemoryState {
    fn user_by_email(&self, email: &str) -> Option<&UserCredentials> {
        self.users.values().find(|c| c.user.email == email)
    }

    fn registration_exists(&self, tournament_id: &str, team_id: TeamId) -> bool {
        self.registrations
            .iter()
            .any(|r| r.tournament_id == tournament_id && r.team_id == team_id)
    }

    fn membership_exists(&self, team_id: TeamId, user_id: UserId) -> bool {
        self.memberships
            .iter()
            .any(|m| m.team_id == team_id && m.user_id == user_id)
    }
}

/// Record store keeping every table in memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tournaments
    pub async fn tournament_count(&self) -> usize {
        self.state.lock().await.tournaments.len()
    }

    /// Number of stored fixtures across all tournaments
    pub async fn fixture_count(&self) -> usize {
        self.state.lock().await.fixtures.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        if state.user_by_email(email).is_some() {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let user = User {
            id: next_id(&mut state.last_user_id),
            display_name: display_name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
            last_login: None,
        };
        state.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        Ok(self.state.lock().await.user_by_email(email).cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> StoreResult<Option<User>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .get(&user_id)
            .map(|c| c.user.clone()))
    }

    async fn update_last_login(&self, user_id: UserId) -> StoreResult<()> {
        if let Some(credentials) = self.state.lock().await.users.get_mut(&user_id) {
            credentials.user.last_login = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        let mut state = self.state.lock().await;
        if state.sessions.contains_key(token) {
            return Err(StoreError::UniqueViolation("sessions_pkey".to_string()));
        }

        let session = Session {
            token: token.to_string(),
            user_id,
            created_at: Utc::now(),
            expires_at,
        };
        state.sessions.insert(token.to_string(), session.clone());
        Ok(session)
    }

    async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
        Ok(self.state.lock().await.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> StoreResult<bool> {
        Ok(self.state.lock().await.sessions.remove(token).is_some())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryTransaction::new(guard)))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_tournaments(&self) -> StoreResult<Vec<TournamentSummary>> {
        let state = self.state.lock().await;
        let mut summaries: Vec<(TournamentSummary, DateTime<Utc>)> = state
            .tournaments
            .values()
            .filter_map(|t| {
                let owner = state.users.get(&t.owner_user_id)?;
                Some((
                    TournamentSummary {
                        id: t.id.clone(),
                        name: t.name.clone(),
                        sport: t.sport.clone(),
                        date: t.date,
                        owner_display_name: owner.user.display_name.clone(),
                    },
                    t.created_at,
                ))
            })
            .collect();
        summaries.sort_by(|(a, a_created), (b, b_created)| {
            a.date.cmp(&b.date).then(a_created.cmp(b_created))
        });
        Ok(summaries.into_iter().map(|(s, _)| s).collect())
    }

    async fn find_tournament(&self, tournament_id: &str) -> StoreResult<Option<Tournament>> {
        Ok(self
            .state
            .lock()
            .await
            .tournaments
            .get(tournament_id)
            .cloned())
    }

    async fn list_fixtures(&self, tournament_id: &str) -> StoreResult<Vec<Fixture>> {
        Ok(self
            .state
            .lock()
            .await
            .fixtures
            .values()
            .filter(|f| f.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    async fn find_fixture(&self, fixture_id: FixtureId) -> StoreResult<Option<Fixture>> {
        Ok(self.state.lock().await.fixtures.get(&fixture_id).cloned())
    }

    async fn update_fixture_score(
        &self,
        fixture_id: FixtureId,
        score_a: i32,
        score_b: i32,
    ) -> StoreResult<Option<Fixture>> {
        let mut state = self.state.lock().await;
        Ok(state.fixtures.get_mut(&fixture_id).map(|fixture| {
            fixture.score_a = Some(score_a);
            fixture.score_b = Some(score_b);
            fixture.clone()
        }))
    }

    async fn list_registrations(&self, tournament_id: &str) -> StoreResult<Vec<RegisteredTeam>> {
        let state = self.state.lock().await;
        Ok(state
            .registrations
            .iter()
            .filter(|r| r.tournament_id == tournament_id)
            .filter_map(|r| {
                let team = state.teams.get(&r.team_id)?;
                Some(RegisteredTeam {
                    team_id: team.id,
                    team_name: team.name.clone(),
                    registered_at: r.registered_at,
                })
            })
            .collect())
    }

    async fn find_team(&self, team_id: TeamId) -> StoreResult<Option<Team>> {
        Ok(self.state.lock().await.teams.get(&team_id).cloned())
    }

    async fn list_team_members(&self, team_id: TeamId) -> StoreResult<Vec<TeamMember>> {
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .filter_map(|m| {
                let user = &state.users.get(&m.user_id)?.user;
                Some(TeamMember {
                    user_id: user.id,
                    display_name: user.display_name.clone(),
                    email: user.email.clone(),
                })
            })
            .collect())
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        self.find_by_id(user_id).await
    }
}

/// Rows written by an open transaction, applied to the state on commit
#[derive(Debug, Default)]
struct PendingWrites {
    tournaments: Vec<Tournament>,
    fixtures: Vec<Fixture>,
    teams: Vec<Team>,
    memberships: Vec<Membership>,
    registrations: Vec<Registration>,
    last_fixture_id: i64,
    last_team_id: i64,
    last_membership_id: i64,
    last_registration_id: i64,
}

/// Exclusive unit of work over a [`MemoryStore`]
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    pending: PendingWrites,
}

impl MemoryTransaction {
    fn new(guard: OwnedMutexGuard<MemoryState>) -> Self {
        let pending = PendingWrites {
            last_fixture_id: guard.last_fixture_id,
            last_team_id: guard.last_team_id,
            last_membership_id: guard.last_membership_id,
            last_registration_id: guard.last_registration_id,
            ..PendingWrites::default()
        };
        Self { guard, pending }
    }

    fn tournament(&self, tournament_id: &str) -> Option<&Tournament> {
        self.guard.tournaments.get(tournament_id).or_else(|| {
            self.pending
                .tournaments
                .iter()
                .find(|t| t.id == tournament_id)
        })
    }

    fn has_registration(&self, tournament_id: &str, team_id: TeamId) -> bool {
        self.guard.registration_exists(tournament_id, team_id)
            || self
                .pending
                .registrations
                .iter()
                .any(|r| r.tournament_id == tournament_id && r.team_id == team_id)
    }

    fn has_membership(&self, team_id: TeamId, user_id: UserId) -> bool {
        self.guard.membership_exists(team_id, user_id)
            || self
                .pending
                .memberships
                .iter()
                .any(|m| m.team_id == team_id && m.user_id == user_id)
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert_tournament(&mut self, draft: &TournamentDraft) -> StoreResult<Tournament> {
        if self.tournament(&draft.id).is_some() {
            return Err(StoreError::UniqueViolation("tournaments_pkey".to_string()));
        }

        let tournament = Tournament {
            id: draft.id.clone(),
            name: draft.name.clone(),
            sport: draft.sport.clone(),
            date: draft.date,
            capacity: draft.capacity,
            description: draft.description.clone(),
            owner_user_id: draft.owner_user_id,
            created_at: Utc::now(),
        };
        self.pending.tournaments.push(tournament.clone());
        Ok(tournament)
    }

    async fn insert_fixtures(
        &mut self,
        tournament_id: &str,
        pairings: &[Pairing],
    ) -> StoreResult<Vec<Fixture>> {
        let mut created = Vec::with_capacity(pairings.len());
        for pairing in pairings {
            created.push(Fixture {
                id: next_id(&mut self.pending.last_fixture_id),
                tournament_id: tournament_id.to_string(),
                team_a: pairing.team_a.clone(),
                team_b: pairing.team_b.clone(),
                score_a: None,
                score_b: None,
            });
        }
        self.pending.fixtures.extend(created.iter().cloned());
        Ok(created)
    }

    async fn lock_tournament(&mut self, tournament_id: &str) -> StoreResult<Option<Tournament>> {
        Ok(self.tournament(tournament_id).cloned())
    }

    async fn lock_team(&mut self, team_id: TeamId) -> StoreResult<Option<Team>> {
        Ok(self
            .guard
            .teams
            .get(&team_id)
            .or_else(|| self.pending.teams.iter().find(|t| t.id == team_id))
            .cloned())
    }

    async fn count_registrations(&mut self, tournament_id: &str) -> StoreResult<i64> {
        let count = self
            .guard
            .registrations
            .iter()
            .chain(self.pending.registrations.iter())
            .filter(|r| r.tournament_id == tournament_id)
            .count();
        Ok(count as i64)
    }

    async fn registration_exists(
        &mut self,
        tournament_id: &str,
        team_id: TeamId,
    ) -> StoreResult<bool> {
        Ok(self.has_registration(tournament_id, team_id))
    }

    async fn insert_registration(
        &mut self,
        tournament_id: &str,
        team_id: TeamId,
    ) -> StoreResult<Registration> {
        if self.has_registration(tournament_id, team_id) {
            return Err(StoreError::UniqueViolation(
                "tournament_registrations_tournament_team_key".to_string(),
            ));
        }

        let registration = Registration {
            id: next_id(&mut self.pending.last_registration_id),
            tournament_id: tournament_id.to_string(),
            team_id,
            registered_at: Utc::now(),
        };
        self.pending.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn insert_team(
        &mut self,
        captain_user_id: UserId,
        name: &str,
        description: &str,
    ) -> StoreResult<Team> {
        let team = Team {
            id: next_id(&mut self.pending.last_team_id),
            name: name.to_string(),
            description: description.to_string(),
            captain_user_id,
            created_at: Utc::now(),
        };
        self.pending.teams.push(team.clone());
        Ok(team)
    }

    async fn find_user_by_email(&mut self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.guard.user_by_email(email).map(|c| c.user.clone()))
    }

    async fn membership_exists(&mut self, team_id: TeamId, user_id: UserId) -> StoreResult<bool> {
        Ok(self.has_membership(team_id, user_id))
    }

    async fn insert_membership(
        &mut self,
        team_id: TeamId,
        user_id: UserId,
    ) -> StoreResult<Membership> {
        if self.has_membership(team_id, user_id) {
            return Err(StoreError::UniqueViolation(
                "team_members_team_user_key".to_string(),
            ));
        }

        let membership = Membership {
            id: next_id(&mut self.pending.last_membership_id),
            team_id,
            user_id,
        };
        self.pending.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            mut guard,
            pending,
        } = *self;
        let state = &mut *guard;

        state.tournaments.extend(
            pending
                .tournaments
                .into_iter()
                .map(|t| (t.id.clone(), t)),
        );
        state
            .fixtures
            .extend(pending.fixtures.into_iter().map(|f| (f.id, f)));
        state
            .teams
            .extend(pending.teams.into_iter().map(|t| (t.id, t)));
        state.memberships.extend(pending.memberships);
        state.registrations.extend(pending.registrations);
        state.last_fixture_id = pending.last_fixture_id;
        state.last_team_id = pending.last_team_id;
        state.last_membership_id = pending.last_membership_id;
        state.last_registration_id = pending.last_registration_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(id: &str, owner: UserId) -> TournamentDraft {
        TournamentDraft {
            id: id.to_string(),
            name: "Spring Cup".to_string(),
            sport: "football".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            capacity: 4,
            description: String::new(),
            owner_user_id: owner,
        }
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_is_discarded() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash", "A").await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_tournament(&draft("abcd1234", user.id)).await.unwrap();
            // dropped without commit
        }

        assert_eq!(store.tournament_count().await, 0);
        assert!(store.find_tournament("abcd1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash", "A").await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.insert_tournament(&draft("abcd1234", user.id)).await.unwrap();
        let pairings = crate::generate_schedule(3);
        let fixtures = tx.insert_fixtures("abcd1234", &pairings).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(fixtures.len(), 3);
        assert_eq!(store.fixture_count().await, 3);
        let listed = store.list_fixtures("abcd1234").await.unwrap();
        assert_eq!(listed, fixtures);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = MemoryStore::new();
        store.create_user("a@example.com", "hash", "A").await.unwrap();
        let err = store
            .create_user("a@example.com", "hash", "B")
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_unique_violation() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_registration("abcd1234", 1).await.unwrap();
        let err = tx.insert_registration("abcd1234", 1).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_list_tournaments_orders_by_date() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash", "Alice").await.unwrap();

        let mut later = draft("later000", user.id);
        later.date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let earlier = draft("early000", user.id);

        let mut tx = store.begin().await.unwrap();
        tx.insert_tournament(&later).await.unwrap();
        tx.insert_tournament(&earlier).await.unwrap();
        tx.commit().await.unwrap();

        let listed = store.list_tournaments().await.unwrap();
        let ids: Vec<_> = listed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["early000", "later000"]);
        assert!(listed.iter().all(|t| t.owner_display_name == "Alice"));
    }

    #[tokio::test]
    async fn test_transaction_reads_its_own_writes() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash", "A").await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_tournament(&draft("abcd1234", user.id)).await.unwrap();
            let team = tx.insert_team(user.id, "Alpha", "").await.unwrap();
            tx.insert_registration("abcd1234", team.id).await.unwrap();

            assert!(tx.lock_tournament("abcd1234").await.unwrap().is_some());
            assert!(tx.lock_team(team.id).await.unwrap().is_some());
            assert_eq!(tx.count_registrations("abcd1234").await.unwrap(), 1);
            assert!(tx.registration_exists("abcd1234", team.id).await.unwrap());
            let err = tx.insert_tournament(&draft("abcd1234", user.id)).await.unwrap_err();
            assert!(err.is_unique_violation());
        }

        assert!(store.find_tournament("abcd1234").await.unwrap().is_none());
        assert!(store.find_team(1).await.unwrap().is_none());
        assert!(store.list_registrations("abcd1234").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rolled_back_ids_are_reused() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash", "A").await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_team(user.id, "Discarded", "").await.unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        let team = tx.insert_team(user.id, "Kept", "").await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(team.id, 1);
        assert_eq!(store.find_team(1).await.unwrap().unwrap().name, "Kept");
    }

    #[tokio::test]
    async fn test_update_missing_fixture_returns_none() {
        let store = MemoryStore::new();
        assert!(store.update_fixture_score(42, 1, 0).await.unwrap().is_none());
    }
}
