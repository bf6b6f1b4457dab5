//! Tournament, roster and result handlers.

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
    team::TeamId,
    tournament::{
        Fixture, FixtureId, NewTournament, Registration, TournamentDetail, TournamentSummary,
    },
};
use serde::{Deserialize, Serialize};

use super::{
    AppState,
    errors::{ApiError, NumericInput},
    request_id::RequestId,
};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct CreateTournamentPayload {
    pub name: String,
    #[serde(default)]
    pub sport: String,
    pub date: String,
    pub team_count: NumericInput,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterTeamPayload {
    pub team_id: TeamId,
}

#[derive(Debug, Deserialize)]
pub struct ReportResultPayload {
    pub score_a: NumericInput,
    pub score_b: NumericInput,
}

/// Tournament detail plus roster and result progress
#[derive(Debug, Serialize)]
pub struct TournamentView {
    #[serde(flatten)]
    pub detail: TournamentDetail,
    pub open_slots: usize,
    pub fixtures_played: usize,
}

impl From<TournamentDetail> for TournamentView {
    fn from(detail: TournamentDetail) -> Self {
        Self {
            open_slots: detail.open_slots(),
            fixtures_played: detail.fixtures.iter().filter(|f| f.is_played()).count(),
            detail,
        }
    }
}

/// List all tournaments, earliest first
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<TournamentSummary>>, ApiError> {
    Ok(Json(state.tournament_manager.list_tournaments().await?))
}

/// Create a tournament and its round-robin schedule
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    request_id: RequestId,
    payload: Result<Json<CreateTournamentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TournamentView>), ApiError> {
    let Json(payload) = payload?;

    let detail = state
        .tournament_manager
        .create_tournament(
            &ctx,
            NewTournament {
                name: payload.name,
                sport: payload.sport,
                date: payload.date,
                team_count: payload.team_count.as_text(),
                description: payload.description,
            },
        )
        .await?;

    metrics::tournament_created(detail.fixtures.len());
    tracing::info!(
        request_id = request_id.as_str(),
        tournament_id = %detail.tournament.id,
        fixtures = detail.fixtures.len(),
        "Tournament created"
    );

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// Tournament with fixtures and roster
pub async fn get_tournament(
    State(state): State<AppState>,
    tournament_id: Result<Path<String>, PathRejection>,
) -> Result<Json<TournamentView>, ApiError> {
    let Path(tournament_id) = tournament_id?;
    let detail = state.tournament_manager.get_tournament(&tournament_id).await?;
    Ok(Json(detail.into()))
}

/// Register a team captained by the caller
pub async fn register_team(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    tournament_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<RegisterTeamPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let Path(tournament_id) = tournament_id?;
    let Json(payload) = payload?;

    match state
        .roster_manager
        .register_team(&ctx, &tournament_id, payload.team_id)
        .await
    {
        Ok(registration) => {
            metrics::registration_attempt("accepted");
            Ok((StatusCode::CREATED, Json(registration)))
        }
        Err(e) => {
            metrics::registration_attempt(e.kind().as_str());
            Err(e.into())
        }
    }
}

/// Record a fixture result
pub async fn report_result(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    fixture_id: Result<Path<FixtureId>, PathRejection>,
    payload: Result<Json<ReportResultPayload>, JsonRejection>,
) -> Result<Json<Fixture>, ApiError> {
    let Path(fixture_id) = fixture_id?;
    let Json(payload) = payload?;
    let score_a = payload.score_a.to_i32("score_a")?;
    let score_b = payload.score_b.to_i32("score_b")?;

    let fixture = state
        .tournament_manager
        .report_result(&ctx, fixture_id, score_a, score_b)
        .await?;

    metrics::result_reported();
    Ok(Json(fixture))
}
