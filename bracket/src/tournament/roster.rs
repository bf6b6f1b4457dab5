//! Tournament roster admission.
//!
//! A registration is admitted only when every check passes inside one
//! transaction that holds the tournament row exclusively:
//!
//! 1. the tournament exists
//! 2. the caller captains the team
//! 3. the roster is below capacity
//! 4. the team is not registered yet
//!
//! Concurrent registrations for the same tournament are serialized by that
//! lock, so the roster never grows past capacity.

use std::sync::Arc;

use super::{
    errors::{TournamentError, TournamentResult},
    models::{RegisteredTeam, Registration},
};
use crate::context::RequestContext;
use crate::db::RecordStore;
use crate::team::TeamId;

/// Roster manager
#[derive(Clone)]
pub struct RosterManager {
    store: Arc<dyn RecordStore>,
}

impl RosterManager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Register a team into a tournament on behalf of its captain.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// * `TournamentError::NotFound` - no such tournament
    /// * `TournamentError::Forbidden` - team missing or caller is not its captain
    /// * `TournamentError::CapacityExceeded` - roster already full
    /// * `TournamentError::AlreadyRegistered` - team already on the roster
    pub async fn register_team(
        &self,
        ctx: &RequestContext,
        tournament_id: &str,
        team_id: TeamId,
    ) -> TournamentResult<Registration> {
        let mut tx = self.store.begin().await?;

        let tournament = tx
            .lock_tournament(tournament_id)
            .await?
            .ok_or_else(|| TournamentError::NotFound(tournament_id.to_string()))?;

        let team = tx.lock_team(team_id).await?;
        if team.is_none_or(|t| t.captain_user_id != ctx.user_id) {
            log::debug!(
                "User {} may not register team {} into {}",
                ctx.user_id,
                team_id,
                tournament_id
            );
            return Err(TournamentError::Forbidden(
                "not authorized to register this team".to_string(),
            ));
        }

        let registered = tx.count_registrations(tournament_id).await?;
        if registered >= i64::from(tournament.capacity) {
            return Err(TournamentError::CapacityExceeded {
                capacity: tournament.capacity,
            });
        }

        if tx.registration_exists(tournament_id, team_id).await? {
            return Err(TournamentError::AlreadyRegistered);
        }

        let registration = match tx.insert_registration(tournament_id, team_id).await {
            Ok(registration) => registration,
            Err(e) if e.is_unique_violation() => return Err(TournamentError::AlreadyRegistered),
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;

        log::info!(
            "Team {} registered into tournament {} ({}/{})",
            team_id,
            tournament_id,
            registered + 1,
            tournament.capacity
        );

        Ok(registration)
    }

    /// Teams registered into a tournament, in registration order
    pub async fn registrations(&self, tournament_id: &str) -> TournamentResult<Vec<RegisteredTeam>> {
        if self.store.find_tournament(tournament_id).await?.is_none() {
            return Err(TournamentError::NotFound(tournament_id.to_string()));
        }
        Ok(self.store.list_registrations(tournament_id).await?)
    }
}
