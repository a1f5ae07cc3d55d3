use axum::{routing::get, Router};

use super::AppState;

pub mod route;
pub mod schema;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/subscribers",
        get(route::get_subscribers).delete(route::delete_subscriber),
    )
}
