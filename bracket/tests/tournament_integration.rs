//! Integration tests for tournament creation, queries and results
//!
//! These tests verify that a tournament and its schedule are persisted as one
//! unit and that result entry follows the ownership rules.

mod common;

use async_trait::async_trait;
use bracket::RequestContext;
use bracket::auth::{User, UserId};
use bracket::db::{MemoryStore, RecordStore, StoreError, StoreResult, StoreTransaction};
use bracket::team::{Membership, Team, TeamId, TeamMember};
use bracket::tournament::{
    Fixture, FixtureId, Pairing, RegisteredTeam, Registration, Tournament, TournamentDraft,
    TournamentError, TournamentManager, TournamentSummary,
};
use std::sync::Arc;
use std::time::Duration;

/// Store whose transactions fail while writing fixtures
struct FixtureFailingStore {
    inner: MemoryStore,
}

struct FixtureFailingTransaction {
    inner: Box<dyn StoreTransaction>,
}

#[async_trait]
impl RecordStore for FixtureFailingStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(FixtureFailingTransaction {
            inner: self.inner.begin().await?,
        }))
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }

    async fn list_tournaments(&self) -> StoreResult<Vec<TournamentSummary>> {
        self.inner.list_tournaments().await
    }

    async fn find_tournament(&self, tournament_id: &str) -> StoreResult<Option<Tournament>> {
        self.inner.find_tournament(tournament_id).await
    }

    async fn list_fixtures(&self, tournament_id: &str) -> StoreResult<Vec<Fixture>> {
        self.inner.list_fixtures(tournament_id).await
    }

    async fn find_fixture(&self, fixture_id: FixtureId) -> StoreResult<Option<Fixture>> {
        self.inner.find_fixture(fixture_id).await
    }

    async fn update_fixture_score(
        &self,
        fixture_id: FixtureId,
        score_a: i32,
        score_b: i32,
    ) -> StoreResult<Option<Fixture>> {
        self.inner
            .update_fixture_score(fixture_id, score_a, score_b)
            .await
    }

    async fn list_registrations(&self, tournament_id: &str) -> StoreResult<Vec<RegisteredTeam>> {
        self.inner.list_registrations(tournament_id).await
    }

    async fn find_team(&self, team_id: TeamId) -> StoreResult<Option<Team>> {
        self.inner.find_team(team_id).await
    }

    async fn list_team_members(&self, team_id: TeamId) -> StoreResult<Vec<TeamMember>> {
        self.inner.list_team_members(team_id).await
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        self.inner.find_user(user_id).await
    }
}

#[async_trait]
impl StoreTransaction for FixtureFailingTransaction {
    async fn insert_tournament(&mut self, draft: &TournamentDraft) -> StoreResult<Tournament> {
        self.inner.insert_tournament(draft).await
    }

    async fn insert_fixtures(&mut self, _: &str, _: &[Pairing]) -> StoreResult<Vec<Fixture>> {
        Err(StoreError::Timeout(Duration::from_secs(10)))
    }

    async fn lock_tournament(&mut self, tournament_id: &str) -> StoreResult<Option<Tournament>> {
        self.inner.lock_tournament(tournament_id).await
    }

    async fn lock_team(&mut self, team_id: TeamId) -> StoreResult<Option<Team>> {
        self.inner.lock_team(team_id).await
    }

    async fn count_registrations(&mut self, tournament_id: &str) -> StoreResult<i64> {
        self.inner.count_registrations(tournament_id).await
    }

    async fn registration_exists(
        &mut self,
        tournament_id: &str,
        team_id: TeamId,
    ) -> StoreResult<bool> {
        self.inner.registration_exists(tournament_id, team_id).await
    }

    async fn insert_registration(
        &mut self,
        tournament_id: &str,
        team_id: TeamId,
    ) -> StoreResult<Registration> {
        self.inner.insert_registration(tournament_id, team_id).await
    }

    async fn insert_team(
        &mut self,
        captain_user_id: UserId,
        name: &str,
        description: &str,
    ) -> StoreResult<Team> {
        self.inner
            .insert_team(captain_user_id, name, description)
            .await
    }

    async fn find_user_by_email(&mut self, email: &str) -> StoreResult<Option<User>> {
        self.inner.find_user_by_email(email).await
    }

    async fn membership_exists(&mut self, team_id: TeamId, user_id: UserId) -> StoreResult<bool> {
        self.inner.membership_exists(team_id, user_id).await
    }

    async fn insert_membership(
        &mut self,
        team_id: TeamId,
        user_id: UserId,
    ) -> StoreResult<Membership> {
        self.inner.insert_membership(team_id, user_id).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.inner.commit().await
    }
}

#[tokio::test]
async fn test_create_tournament_persists_full_schedule() {
    let store = common::store();
    let owner = common::user(&store, "Owner").await;
    let manager = TournamentManager::new(store.clone());

    let detail = manager
        .create_tournament(&RequestContext::new(owner.id), common::tournament_form(5))
        .await
        .unwrap();

    assert_eq!(detail.tournament.capacity, 5);
    assert_eq!(detail.tournament.owner_user_id, owner.id);
    assert_eq!(detail.fixtures.len(), 10);
    assert!(detail.fixtures.iter().all(|f| !f.is_played()));
    assert_eq!(store.fixture_count().await, 10);

    let loaded = manager.get_tournament(&detail.tournament.id).await.unwrap();
    assert_eq!(loaded.tournament, detail.tournament);
    assert_eq!(loaded.fixtures, detail.fixtures);
    assert_eq!(loaded.open_slots(), 5);
}

#[tokio::test]
async fn test_zero_teams_creates_empty_schedule() {
    let store = common::store();
    let owner = common::user(&store, "Owner").await;
    let detail = common::tournament(store.clone(), &owner, 0).await;

    assert!(detail.fixtures.is_empty());
    assert_eq!(store.tournament_count().await, 1);
}

#[tokio::test]
async fn test_failed_fixture_write_leaves_nothing() {
    let inner = MemoryStore::new();
    let store = Arc::new(FixtureFailingStore {
        inner: inner.clone(),
    });
    let manager = TournamentManager::new(store);

    let err = manager
        .create_tournament(&RequestContext::new(1), common::tournament_form(4))
        .await
        .unwrap_err();

    assert!(matches!(err, TournamentError::Store(_)));
    assert_eq!(err.client_message(), "Internal server error");
    assert_eq!(inner.tournament_count().await, 0);
    assert_eq!(inner.fixture_count().await, 0);
}

#[tokio::test]
async fn test_list_tournaments_shows_owner_and_orders_by_date() {
    let store = common::store();
    let owner = common::user(&store, "Olivia").await;
    let manager = TournamentManager::new(store.clone());
    let ctx = RequestContext::new(owner.id);

    let mut autumn = common::tournament_form(2);
    autumn.date = "2026-10-01".to_string();
    let mut spring = common::tournament_form(2);
    spring.date = "2026-03-01".to_string();

    let autumn = manager.create_tournament(&ctx, autumn).await.unwrap();
    let spring = manager.create_tournament(&ctx, spring).await.unwrap();

    let listed = manager.list_tournaments().await.unwrap();
    let ids: Vec<_> = listed.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![spring.tournament.id, autumn.tournament.id]);
    assert!(listed.iter().all(|t| t.owner_display_name == "Olivia"));
}

#[tokio::test]
async fn test_get_missing_tournament() {
    let manager = TournamentManager::new(common::store());
    assert!(matches!(
        manager.get_tournament("deadbeef").await,
        Err(TournamentError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_report_result_overwrites_previous_score() {
    let store = common::store();
    let owner = common::user(&store, "Owner").await;
    let detail = common::tournament(store.clone(), &owner, 3).await;
    let manager = TournamentManager::new(store.clone());
    let ctx = RequestContext::new(owner.id);
    let fixture_id = detail.fixtures[0].id;

    let first = manager.report_result(&ctx, fixture_id, 5, 3).await.unwrap();
    assert_eq!((first.score_a, first.score_b), (Some(5), Some(3)));

    manager.report_result(&ctx, fixture_id, 2, 2).await.unwrap();

    let loaded = manager.get_tournament(&detail.tournament.id).await.unwrap();
    let fixture = loaded.fixtures.iter().find(|f| f.id == fixture_id).unwrap();
    assert_eq!((fixture.score_a, fixture.score_b), (Some(2), Some(2)));
    assert!(loaded.fixtures.iter().filter(|f| f.is_played()).count() == 1);
}

#[tokio::test]
async fn test_report_result_rejections() {
    let store = common::store();
    let owner = common::user(&store, "Owner").await;
    let stranger = common::user(&store, "Stranger").await;
    let detail = common::tournament(store.clone(), &owner, 2).await;
    let manager = TournamentManager::new(store.clone());
    let fixture_id = detail.fixtures[0].id;

    let err = manager
        .report_result(&RequestContext::new(owner.id), fixture_id, -1, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, TournamentError::Validation(_)));

    let err = manager
        .report_result(&RequestContext::new(owner.id), 9_999, 1, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, TournamentError::FixtureNotFound(9_999)));

    let err = manager
        .report_result(&RequestContext::new(stranger.id), fixture_id, 1, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, TournamentError::Forbidden(_)));

    let fixture = store.find_fixture(fixture_id).await.unwrap().unwrap();
    assert!(!fixture.is_played());
}
