//! Team manager: creation, lookup and membership admission.

use std::sync::Arc;

use super::{
    errors::{TeamError, TeamResult},
    models::{Membership, NewTeam, TeamDetail, TeamId},
};
use crate::auth::normalize_email;
use crate::context::RequestContext;
use crate::db::RecordStore;

const MAX_TEAM_NAME_LEN: usize = 100;

/// Team manager
#[derive(Clone)]
pub struct TeamManager {
    store: Arc<dyn RecordStore>,
}

impl TeamManager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a team captained by the caller.
    ///
    /// The captain's own membership is written in the same transaction.
    pub async fn create_team(&self, ctx: &RequestContext, request: NewTeam) -> TeamResult<TeamDetail> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(TeamError::Validation("team name is required".to_string()));
        }
        if name.chars().count() > MAX_TEAM_NAME_LEN {
            return Err(TeamError::Validation(format!(
                "team name cannot exceed {MAX_TEAM_NAME_LEN} characters"
            )));
        }

        let mut tx = self.store.begin().await?;
        let team = tx
            .insert_team(ctx.user_id, name, request.description.trim())
            .await?;
        tx.insert_membership(team.id, ctx.user_id).await?;
        tx.commit().await?;

        log::info!("User {} created team {} '{}'", ctx.user_id, team.id, team.name);

        self.get_team(team.id).await
    }

    /// Get a team with its captain and members
    pub async fn get_team(&self, team_id: TeamId) -> TeamResult<TeamDetail> {
        let team = self
            .store
            .find_team(team_id)
            .await?
            .ok_or(TeamError::NotFound(team_id))?;

        let captain_display_name = self
            .store
            .find_user(team.captain_user_id)
            .await?
            .map(|u| u.display_name)
            .unwrap_or_default();

        let members = self.store.list_team_members(team_id).await?;

        Ok(TeamDetail {
            team,
            captain_display_name,
            members,
        })
    }

    /// Add the user registered under `invitee_email` to a team.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// * `TeamError::NotFound` - no such team
    /// * `TeamError::Forbidden` - caller is not the captain
    /// * `TeamError::UserNotFound` - no account with that email
    /// * `TeamError::AlreadyMember` - invitee already on the team
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        invitee_email: &str,
    ) -> TeamResult<Membership> {
        let email = normalize_email(invitee_email);
        let mut tx = self.store.begin().await?;

        let team = tx
            .lock_team(team_id)
            .await?
            .ok_or(TeamError::NotFound(team_id))?;

        if team.captain_user_id != ctx.user_id {
            log::debug!(
                "User {} is not captain of team {}, refusing invite",
                ctx.user_id,
                team_id
            );
            return Err(TeamError::Forbidden(
                "only the captain can add members".to_string(),
            ));
        }

        let invitee = tx
            .find_user_by_email(&email)
            .await?
            .ok_or(TeamError::UserNotFound)?;

        if tx.membership_exists(team_id, invitee.id).await? {
            return Err(TeamError::AlreadyMember);
        }

        let membership = match tx.insert_membership(team_id, invitee.id).await {
            Ok(membership) => membership,
            Err(e) if e.is_unique_violation() => return Err(TeamError::AlreadyMember),
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;

        log::info!("User {} joined team {}", invitee.id, team_id);

        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, UserRepository};

    #[tokio::test]
    async fn test_blank_team_name_rejected() {
        let store = Arc::new(MemoryStore::new());
        let manager = TeamManager::new(store);

        let result = manager
            .create_team(
                &RequestContext::new(1),
                NewTeam {
                    name: "  ".to_string(),
                    description: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(TeamError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invite_matches_email_case_insensitively() {
        let store = Arc::new(MemoryStore::new());
        let captain = store.create_user("cap@example.com", "h", "Cap").await.unwrap();
        let invitee = store.create_user("bob@example.com", "h", "Bob").await.unwrap();
        let manager = TeamManager::new(store);
        let ctx = RequestContext::new(captain.id);

        let team = manager
            .create_team(
                &ctx,
                NewTeam {
                    name: "Falcons".to_string(),
                    description: String::new(),
                },
            )
            .await
            .unwrap();

        let membership = manager
            .add_member(&ctx, team.team.id, "  Bob@Example.COM ")
            .await
            .unwrap();
        assert_eq!(membership.user_id, invitee.id);
    }
}
