use anyhow::Context;
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

use super::schema::{DeleteParams, DeleteResponseBody, ListParams, ListResponseBody};
use crate::{
    app::{
        error::{AppError, AppResult},
        AppState,
    },
    domain::subscriber::email::Email,
};

/// Backs the dashboard. Storage failures degrade to an empty answer flagged as `fallback`
/// so the dashboard keeps rendering.
#[instrument(name = "List subscribers", skip(state))]
pub async fn get_subscribers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListResponseBody> {
    if params.count_only() {
        let body = match state.store.count().await {
            Ok(count) => ListResponseBody::Count {
                count,
                fallback: None,
            },
            Err(e) => {
                tracing::error!(detail = %e, "failed to count subscribers");
                ListResponseBody::Count {
                    count: 0,
                    fallback: Some(true),
                }
            }
        };
        return Json(body);
    }

    let body = match state.store.list().await {
        Ok(subscribers) => ListResponseBody::Subscribers {
            subscribers,
            fallback: None,
        },
        Err(e) => {
            tracing::error!(detail = %e, "failed to list subscribers");
            ListResponseBody::Subscribers {
                subscribers: Vec::new(),
                fallback: Some(true),
            }
        }
    };
    Json(body)
}

#[instrument(name = "Delete subscriber", skip(state, params), fields(email = %params.email))]
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> AppResult<Json<DeleteResponseBody>> {
    let email = Email::try_from(params.email).map_err(AppError::ValidationError)?;

    let deleted = state
        .store
        .delete(&email)
        .await
        .context("Failed to delete the subscriber.")?;

    if !deleted {
        tracing::info!("no subscriber with this email");
    }

    Ok(Json(DeleteResponseBody { deleted }))
}
