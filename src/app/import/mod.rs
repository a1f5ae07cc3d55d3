use axum::{routing::post, Router};

use super::AppState;

pub mod csv;
pub mod route;
pub mod schema;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/import-subscribers", post(route::import_subscribers))
        .route("/api/import-subscribers/csv", post(route::import_subscribers_csv))
}
