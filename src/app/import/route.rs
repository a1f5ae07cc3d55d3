use axum::{extract::State, Json};
use serde_json::Value;
use tracing::instrument;

use super::{
    csv,
    schema::{ImportRequestBody, ImportResponseBody, ImportResults},
};
use crate::{
    app::{
        error::{AppError, AppResult},
        AppState,
    },
    domain::subscriber::{email::Email, opt_in},
    store::SubscriberStore,
};

/// One entry of an import batch, before validation.
#[derive(Debug, PartialEq)]
pub struct ImportRow {
    pub email: Option<String>,
    pub opt_in: bool,
    /// The row as submitted, quoted back in diagnostics.
    pub source: String,
}

impl From<Value> for ImportRow {
    fn from(value: Value) -> Self {
        Self {
            email: value.get("email").and_then(Value::as_str).map(str::to_owned),
            opt_in: opt_in::from_json(value.get("optIn")),
            source: value.to_string(),
        }
    }
}

#[instrument(name = "Import subscribers", skip(state, body))]
pub async fn import_subscribers(
    State(state): State<AppState>,
    Json(body): Json<ImportRequestBody>,
) -> AppResult<Json<ImportResponseBody>> {
    let Value::Array(rows) = body.subscribers else {
        return Err(AppError::ValidationError(
            "Invalid data format. Expected array of subscribers.".to_owned(),
        ));
    };

    let rows = rows.into_iter().map(ImportRow::from).collect();
    let results = import_rows(state.store.as_ref(), rows).await;

    Ok(Json(results.into()))
}

#[instrument(name = "Import subscribers from csv", skip(state, body))]
pub async fn import_subscribers_csv(
    State(state): State<AppState>,
    body: String,
) -> AppResult<Json<ImportResponseBody>> {
    let rows = csv::parse(&body);
    let results = import_rows(state.store.as_ref(), rows).await;

    Ok(Json(results.into()))
}

/// Upserts every row independently. A failing row is counted and described, never fatal.
async fn import_rows(store: &dyn SubscriberStore, rows: Vec<ImportRow>) -> ImportResults {
    let mut results = ImportResults {
        total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let email = match row.email.as_deref().and_then(Email::from_import) {
            Some(email) => email,
            _ => {
                tracing::warn!(row = %row.source, "skipping subscriber without an email");
                results
                    .errors
                    .push(format!("Invalid email for subscriber: {}", row.source));
                results.skipped += 1;
                continue;
            }
        };

        match store.upsert(&email, row.opt_in).await {
            Ok(_) => {
                tracing::info!(email = %email, "imported subscriber");
                results.imported += 1;
            }
            Err(e) => {
                tracing::error!(email = %email, detail = %e, "failed to import subscriber");
                results
                    .errors
                    .push(format!("Failed to import {}: {}", email, e));
                results.skipped += 1;
            }
        }
    }

    results
}
