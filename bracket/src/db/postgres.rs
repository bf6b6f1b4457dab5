//! PostgreSQL implementation of the record store.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use super::{
    errors::StoreResult,
    repository::{RecordStore, SessionRepository, StoreTransaction, UserRepository},
    timeouts::{DEFAULT_TRANSACTION_TIMEOUT, with_default_timeout, with_timeout},
};
use crate::auth::{Session, User, UserCredentials, UserId};
use crate::team::{Membership, Team, TeamId, TeamMember};
use crate::tournament::{
    Fixture, FixtureId, Pairing, RegisteredTeam, Registration, Tournament, TournamentDraft,
    TournamentSummary,
};

/// Record store backed by a sqlx PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        display_name: row.get("display_name"),
        email: row.get("email"),
        created_at: row.get::<NaiveDateTime, _>("created_at").and_utc(),
        last_login: row
            .get::<Option<NaiveDateTime>, _>("last_login")
            .map(|dt| dt.and_utc()),
    }
}

fn tournament_from_row(row: &PgRow) -> Tournament {
    Tournament {
        id: row.get("id"),
        name: row.get("name"),
        sport: row.get("sport"),
        date: row.get("date"),
        capacity: row.get("capacity"),
        description: row.get("description"),
        owner_user_id: row.get("owner_user_id"),
        created_at: row.get::<NaiveDateTime, _>("created_at").and_utc(),
    }
}

fn fixture_from_row(row: &PgRow) -> Fixture {
    Fixture {
        id: row.get("id"),
        tournament_id: row.get("tournament_id"),
        team_a: row.get("team_a_label"),
        team_b: row.get("team_b_label"),
        score_a: row.get("score_a"),
        score_b: row.get("score_b"),
    }
}

fn team_from_row(row: &PgRow) -> Team {
    Team {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        captain_user_id: row.get("captain_user_id"),
        created_at: row.get::<NaiveDateTime, _>("created_at").and_utc(),
    }
}

fn session_from_row(row: &PgRow) -> Session {
    Session {
        token: row.get("token"),
        user_id: row.get("user_id"),
        created_at: row.get::<NaiveDateTime, _>("created_at").and_utc(),
        expires_at: row.get::<NaiveDateTime, _>("expires_at").and_utc(),
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> StoreResult<User> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO users (email, password_hash, display_name)
                VALUES ($1, $2, $3)
                RETURNING id, display_name, email, created_at, last_login
                "#,
            )
            .bind(email)
            .bind(password_hash)
            .bind(display_name)
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(user_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, display_name, email, password_hash, created_at, last_login
                 FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.map(|r| UserCredentials {
            user: user_from_row(&r),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn find_by_id(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, display_name, email, created_at, last_login FROM users WHERE id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn update_last_login(&self, user_id: UserId) -> StoreResult<()> {
        with_default_timeout(
            sqlx::query("UPDATE users SET last_login = (NOW() AT TIME ZONE 'utc') WHERE id = $1")
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn create_session(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO sessions (token, user_id, expires_at)
                VALUES ($1, $2, $3)
                RETURNING token, user_id, created_at, expires_at
                "#,
            )
            .bind(token)
            .bind(user_id)
            .bind(expires_at.naive_utc())
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(session_from_row(&row))
    }

    async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
            )
            .bind(token)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(session_from_row))
    }

    async fn delete_session(&self, token: &str) -> StoreResult<bool> {
        let result = with_default_timeout(
            sqlx::query("DELETE FROM sessions WHERE token = $1")
                .bind(token)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let tx = with_timeout(DEFAULT_TRANSACTION_TIMEOUT, self.pool.begin()).await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn health_check(&self) -> StoreResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }

    async fn list_tournaments(&self) -> StoreResult<Vec<TournamentSummary>> {
        let rows = with_default_timeout(
            sqlx::query(
                r#"
                SELECT t.id, t.name, t.sport, t.date, u.display_name
                FROM tournaments t
                JOIN users u ON t.owner_user_id = u.id
                ORDER BY t.date ASC, t.created_at ASC
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TournamentSummary {
                id: row.get("id"),
                name: row.get("name"),
                sport: row.get("sport"),
                date: row.get("date"),
                owner_display_name: row.get("display_name"),
            })
            .collect())
    }

    async fn find_tournament(&self, tournament_id: &str) -> StoreResult<Option<Tournament>> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT id, name, sport, date, capacity, description, owner_user_id, created_at
                FROM tournaments
                WHERE id = $1
                "#,
            )
            .bind(tournament_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(tournament_from_row))
    }

    async fn list_fixtures(&self, tournament_id: &str) -> StoreResult<Vec<Fixture>> {
        let rows = with_default_timeout(
            sqlx::query(
                r#"
                SELECT id, tournament_id, team_a_label, team_b_label, score_a, score_b
                FROM fixtures
                WHERE tournament_id = $1
                ORDER BY id
                "#,
            )
            .bind(tournament_id)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.iter().map(fixture_from_row).collect())
    }

    async fn find_fixture(&self, fixture_id: FixtureId) -> StoreResult<Option<Fixture>> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT id, tournament_id, team_a_label, team_b_label, score_a, score_b
                FROM fixtures
                WHERE id = $1
                "#,
            )
            .bind(fixture_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(fixture_from_row))
    }

    async fn update_fixture_score(
        &self,
        fixture_id: FixtureId,
        score_a: i32,
        score_b: i32,
    ) -> StoreResult<Option<Fixture>> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                UPDATE fixtures
                SET score_a = $1, score_b = $2
                WHERE id = $3
                RETURNING id, tournament_id, team_a_label, team_b_label, score_a, score_b
                "#,
            )
            .bind(score_a)
            .bind(score_b)
            .bind(fixture_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(fixture_from_row))
    }

    async fn list_registrations(&self, tournament_id: &str) -> StoreResult<Vec<RegisteredTeam>> {
        let rows = with_default_timeout(
            sqlx::query(
                r#"
                SELECT r.team_id, t.name, r.registered_at
                FROM tournament_registrations r
                JOIN teams t ON r.team_id = t.id
                WHERE r.tournament_id = $1
                ORDER BY r.id
                "#,
            )
            .bind(tournament_id)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RegisteredTeam {
                team_id: row.get("team_id"),
                team_name: row.get("name"),
                registered_at: row.get::<NaiveDateTime, _>("registered_at").and_utc(),
            })
            .collect())
    }

    async fn find_team(&self, team_id: TeamId) -> StoreResult<Option<Team>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, name, description, captain_user_id, created_at FROM teams WHERE id = $1",
            )
            .bind(team_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(team_from_row))
    }

    async fn list_team_members(&self, team_id: TeamId) -> StoreResult<Vec<TeamMember>> {
        let rows = with_default_timeout(
            sqlx::query(
                r#"
                SELECT u.id, u.display_name, u.email
                FROM team_members tm
                JOIN users u ON tm.user_id = u.id
                WHERE tm.team_id = $1
                ORDER BY tm.id
                "#,
            )
            .bind(team_id)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TeamMember {
                user_id: row.get("id"),
                display_name: row.get("display_name"),
                email: row.get("email"),
            })
            .collect())
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        self.find_by_id(user_id).await
    }
}

/// Open PostgreSQL transaction; rolled back by sqlx if dropped uncommitted
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn insert_tournament(&mut self, draft: &TournamentDraft) -> StoreResult<Tournament> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO tournaments (id, name, sport, date, capacity, description, owner_user_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, name, sport, date, capacity, description, owner_user_id, created_at
                "#,
            )
            .bind(&draft.id)
            .bind(&draft.name)
            .bind(&draft.sport)
            .bind(draft.date)
            .bind(draft.capacity)
            .bind(&draft.description)
            .bind(draft.owner_user_id)
            .fetch_one(&mut *self.tx),
        )
        .await?;

        Ok(tournament_from_row(&row))
    }

    async fn insert_fixtures(
        &mut self,
        tournament_id: &str,
        pairings: &[Pairing],
    ) -> StoreResult<Vec<Fixture>> {
        if pairings.is_empty() {
            return Ok(Vec::new());
        }

        let (labels_a, labels_b): (Vec<String>, Vec<String>) = pairings
            .iter()
            .map(|p| (p.team_a.clone(), p.team_b.clone()))
            .unzip();

        let rows = with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO fixtures (tournament_id, team_a_label, team_b_label)
                SELECT $1, a, b
                FROM UNNEST($2::text[], $3::text[]) WITH ORDINALITY AS p(a, b, n)
                ORDER BY n
                RETURNING id, tournament_id, team_a_label, team_b_label, score_a, score_b
                "#,
            )
            .bind(tournament_id)
            .bind(&labels_a)
            .bind(&labels_b)
            .fetch_all(&mut *self.tx),
        )
        .await?;

        let mut fixtures: Vec<Fixture> = rows.iter().map(fixture_from_row).collect();
        fixtures.sort_by_key(|f| f.id);
        Ok(fixtures)
    }

    async fn lock_tournament(&mut self, tournament_id: &str) -> StoreResult<Option<Tournament>> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT id, name, sport, date, capacity, description, owner_user_id, created_at
                FROM tournaments
                WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(tournament_id)
            .fetch_optional(&mut *self.tx),
        )
        .await?;

        Ok(row.as_ref().map(tournament_from_row))
    }

    async fn lock_team(&mut self, team_id: TeamId) -> StoreResult<Option<Team>> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT id, name, description, captain_user_id, created_at
                FROM teams
                WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(team_id)
            .fetch_optional(&mut *self.tx),
        )
        .await?;

        Ok(row.as_ref().map(team_from_row))
    }

    async fn count_registrations(&mut self, tournament_id: &str) -> StoreResult<i64> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT COUNT(*) AS count FROM tournament_registrations WHERE tournament_id = $1",
            )
            .bind(tournament_id)
            .fetch_one(&mut *self.tx),
        )
        .await?;

        Ok(row.get("count"))
    }

    async fn registration_exists(
        &mut self,
        tournament_id: &str,
        team_id: TeamId,
    ) -> StoreResult<bool> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM tournament_registrations
                    WHERE tournament_id = $1 AND team_id = $2
                ) AS registered
                "#,
            )
            .bind(tournament_id)
            .bind(team_id)
            .fetch_one(&mut *self.tx),
        )
        .await?;

        Ok(row.get("registered"))
    }

    async fn insert_registration(
        &mut self,
        tournament_id: &str,
        team_id: TeamId,
    ) -> StoreResult<Registration> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO tournament_registrations (tournament_id, team_id)
                VALUES ($1, $2)
                RETURNING id, tournament_id, team_id, registered_at
                "#,
            )
            .bind(tournament_id)
            .bind(team_id)
            .fetch_one(&mut *self.tx),
        )
        .await?;

        Ok(Registration {
            id: row.get("id"),
            tournament_id: row.get("tournament_id"),
            team_id: row.get("team_id"),
            registered_at: row.get::<NaiveDateTime, _>("registered_at").and_utc(),
        })
    }

    async fn insert_team(
        &mut self,
        captain_user_id: UserId,
        name: &str,
        description: &str,
    ) -> StoreResult<Team> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO teams (name, description, captain_user_id)
                VALUES ($1, $2, $3)
                RETURNING id, name, description, captain_user_id, created_at
                "#,
            )
            .bind(name)
            .bind(description)
            .bind(captain_user_id)
            .fetch_one(&mut *self.tx),
        )
        .await?;

        Ok(team_from_row(&row))
    }

    async fn find_user_by_email(&mut self, email: &str) -> StoreResult<Option<User>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, display_name, email, created_at, last_login FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&mut *self.tx),
        )
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn membership_exists(&mut self, team_id: TeamId, user_id: UserId) -> StoreResult<bool> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM team_members WHERE team_id = $1 AND user_id = $2
                ) AS member
                "#,
            )
            .bind(team_id)
            .bind(user_id)
            .fetch_one(&mut *self.tx),
        )
        .await?;

        Ok(row.get("member"))
    }

    async fn insert_membership(
        &mut self,
        team_id: TeamId,
        user_id: UserId,
    ) -> StoreResult<Membership> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO team_members (team_id, user_id)
                VALUES ($1, $2)
                RETURNING id, team_id, user_id
                "#,
            )
            .bind(team_id)
            .bind(user_id)
            .fetch_one(&mut *self.tx),
        )
        .await?;

        Ok(Membership {
            id: row.get("id"),
            team_id: row.get("team_id"),
            user_id: row.get("user_id"),
        })
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let PgStoreTransaction { tx } = *self;
        with_timeout(DEFAULT_TRANSACTION_TIMEOUT, tx.commit()).await
    }
}
