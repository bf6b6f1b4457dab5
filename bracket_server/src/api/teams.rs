//! Team handlers.

use axum::{
    Json,
    extract::{
        Extension, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use bracket::{
    RequestContext,
    team::{Membership, NewTeam, TeamDetail, TeamId},
};
use serde::Deserialize;

use super::{AppState, errors::ApiError};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct CreateTeamPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberPayload {
    pub email: String,
}

/// Create a team captained by the caller
pub async fn create_team(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<CreateTeamPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamDetail>), ApiError> {
    let Json(payload) = payload?;

    let detail = state
        .team_manager
        .create_team(
            &ctx,
            NewTeam {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    metrics::team_created();
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Team with captain and members
pub async fn get_team(
    State(state): State<AppState>,
    team_id: Result<Path<TeamId>, PathRejection>,
) -> Result<Json<TeamDetail>, ApiError> {
    let Path(team_id) = team_id?;
    Ok(Json(state.team_manager.get_team(team_id).await?))
}

/// Add a registered user to the caller's team
pub async fn add_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    team_id: Result<Path<TeamId>, PathRejection>,
    payload: Result<Json<AddMemberPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    let Path(team_id) = team_id?;
    let Json(payload) = payload?;

    let membership = state
        .team_manager
        .add_member(&ctx, team_id, &payload.email)
        .await?;

    metrics::member_added();
    Ok((StatusCode::CREATED, Json(membership)))
}
