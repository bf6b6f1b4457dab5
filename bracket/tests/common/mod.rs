//! Shared fixtures for the integration tests

#![allow(dead_code)]

use bracket::RequestContext;
use bracket::auth::User;
use bracket::db::{MemoryStore, UserRepository};
use bracket::team::{NewTeam, TeamDetail, TeamManager};
use bracket::tournament::{NewTournament, TournamentDetail, TournamentManager};
use std::sync::Arc;

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub async fn user(store: &MemoryStore, name: &str) -> User {
    store
        .create_user(
            &format!("{}@example.com", name.to_lowercase()),
            "not-a-real-hash",
            name,
        )
        .await
        .expect("create user")
}

pub fn tournament_form(team_count: u32) -> NewTournament {
    NewTournament {
        name: "City League".to_string(),
        sport: "basketball".to_string(),
        date: "2026-06-20".to_string(),
        team_count: team_count.to_string(),
        description: String::new(),
    }
}

pub async fn tournament(store: Arc<MemoryStore>, owner: &User, team_count: u32) -> TournamentDetail {
    TournamentManager::new(store)
        .create_tournament(&RequestContext::new(owner.id), tournament_form(team_count))
        .await
        .expect("create tournament")
}

pub async fn team(store: Arc<MemoryStore>, captain: &User, name: &str) -> TeamDetail {
    TeamManager::new(store)
        .create_team(
            &RequestContext::new(captain.id),
            NewTeam {
                name: name.to_string(),
                description: String::new(),
            },
        )
        .await
        .expect("create team")
}
