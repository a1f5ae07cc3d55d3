use axum::{routing::post, Router};

use super::AppState;

pub mod route;
pub mod schema;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/register", post(route::register))
}
