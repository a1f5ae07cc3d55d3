use anyhow::Context;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use super::{error::AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/setup-db", post(setup_database))
}

#[derive(Serialize)]
pub struct SetupResponseBody {
    success: bool,
    message: &'static str,
}

#[tracing::instrument(name = "Set up the subscriber table", skip(state))]
pub async fn setup_database(State(state): State<AppState>) -> AppResult<Json<SetupResponseBody>> {
    state
        .store
        .setup()
        .await
        .context("Failed to set up the database.")?;

    Ok(Json(SetupResponseBody {
        success: true,
        message: "Database tables created successfully",
    }))
}
