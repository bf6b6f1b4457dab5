//! Tournament manager: creation, queries and result recording.

use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    errors::{TournamentError, TournamentResult},
    models::{
        Fixture, FixtureId, NewTournament, TournamentDetail, TournamentDraft, TournamentSummary,
    },
    schedule::{generate_schedule, parse_team_count},
};
use crate::context::RequestContext;
use crate::db::RecordStore;

/// Length of the opaque tournament token
const TOURNAMENT_ID_LEN: usize = 8;

/// Fresh ids drawn when a generated token collides with an existing one
const MAX_ID_ATTEMPTS: usize = 3;

const MAX_NAME_LEN: usize = 200;

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    store: Arc<dyn RecordStore>,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a tournament owned by the caller together with its round-robin schedule.
    ///
    /// The tournament row and every fixture are written in one transaction;
    /// on any failure nothing is persisted.
    ///
    /// # Errors
    ///
    /// * `TournamentError::Validation` - empty name, bad date or team count
    /// * `TournamentError::Store` - store failure, nothing was written
    pub async fn create_tournament(
        &self,
        ctx: &RequestContext,
        request: NewTournament,
    ) -> TournamentResult<TournamentDetail> {
        let mut draft = prepare_draft(ctx, &request)?;
        let pairings = generate_schedule(draft.capacity as u32);

        let mut attempt = 1;
        loop {
            let mut tx = self.store.begin().await?;

            let tournament = match tx.insert_tournament(&draft).await {
                Ok(tournament) => tournament,
                Err(e) if e.is_unique_violation() && attempt < MAX_ID_ATTEMPTS => {
                    log::warn!("Tournament id {} already taken, drawing another", draft.id);
                    draft.id = new_tournament_id();
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let fixtures = tx.insert_fixtures(&tournament.id, &pairings).await?;
            tx.commit().await?;

            log::info!(
                "User {} created tournament {} '{}' with {} teams and {} fixtures",
                ctx.user_id,
                tournament.id,
                tournament.name,
                tournament.capacity,
                fixtures.len()
            );

            return Ok(TournamentDetail {
                tournament,
                fixtures,
                registrations: Vec::new(),
            });
        }
    }

    /// List all tournaments, earliest date first
    pub async fn list_tournaments(&self) -> TournamentResult<Vec<TournamentSummary>> {
        Ok(self.store.list_tournaments().await?)
    }

    /// Get a tournament with its fixtures and registered teams
    pub async fn get_tournament(&self, tournament_id: &str) -> TournamentResult<TournamentDetail> {
        let tournament = self
            .store
            .find_tournament(tournament_id)
            .await?
            .ok_or_else(|| TournamentError::NotFound(tournament_id.to_string()))?;

        let fixtures = self.store.list_fixtures(tournament_id).await?;
        let registrations = self.store.list_registrations(tournament_id).await?;

        Ok(TournamentDetail {
            tournament,
            fixtures,
            registrations,
        })
    }

    /// Record the result of a fixture.
    ///
    /// Both scores are overwritten unconditionally; reporting again replaces
    /// the previous result.
    ///
    /// # Errors
    ///
    /// * `TournamentError::Validation` - a score is negative
    /// * `TournamentError::FixtureNotFound` - no such fixture
    /// * `TournamentError::Forbidden` - caller does not own the tournament
    pub async fn report_result(
        &self,
        ctx: &RequestContext,
        fixture_id: FixtureId,
        score_a: i32,
        score_b: i32,
    ) -> TournamentResult<Fixture> {
        if score_a < 0 || score_b < 0 {
            return Err(TournamentError::Validation(
                "scores cannot be negative".to_string(),
            ));
        }

        let fixture = self
            .store
            .find_fixture(fixture_id)
            .await?
            .ok_or(TournamentError::FixtureNotFound(fixture_id))?;

        let tournament = self
            .store
            .find_tournament(&fixture.tournament_id)
            .await?
            .ok_or_else(|| TournamentError::NotFound(fixture.tournament_id.clone()))?;

        if tournament.owner_user_id != ctx.user_id {
            log::debug!(
                "User {} refused result entry on fixture {} of tournament {}",
                ctx.user_id,
                fixture_id,
                tournament.id
            );
            return Err(TournamentError::Forbidden(
                "only the tournament owner can report results".to_string(),
            ));
        }

        if fixture.is_played() {
            log::debug!(
                "Overwriting result of fixture {} ({:?} - {:?})",
                fixture_id,
                fixture.score_a,
                fixture.score_b
            );
        }

        let updated = self
            .store
            .update_fixture_score(fixture_id, score_a, score_b)
            .await?
            .ok_or(TournamentError::FixtureNotFound(fixture_id))?;

        log::info!(
            "Fixture {} of tournament {}: {} {} - {} {}",
            fixture_id,
            tournament.id,
            updated.team_a,
            score_a,
            score_b,
            updated.team_b
        );

        Ok(updated)
    }
}

/// Draw a new opaque tournament token
pub fn new_tournament_id() -> String {
    Uuid::new_v4().simple().to_string()[..TOURNAMENT_ID_LEN].to_string()
}

/// Validate a raw tournament form into an insertable draft owned by the caller
fn prepare_draft(ctx: &RequestContext, request: &NewTournament) -> TournamentResult<TournamentDraft> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(TournamentError::Validation(
            "tournament name is required".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TournamentError::Validation(format!(
            "tournament name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }

    let date = NaiveDate::parse_from_str(request.date.trim(), "%Y-%m-%d").map_err(|_| {
        TournamentError::Validation(format!("date must be YYYY-MM-DD, got {:?}", request.date))
    })?;

    let team_count = parse_team_count(&request.team_count)?;

    Ok(TournamentDraft {
        id: new_tournament_id(),
        name: name.to_string(),
        sport: request.sport.trim().to_string(),
        date,
        capacity: team_count as i32,
        description: request.description.trim().to_string(),
        owner_user_id: ctx.user_id,
    })
}
