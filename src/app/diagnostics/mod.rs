use axum::{
    routing::{get, post},
    Router,
};

use super::AppState;

pub mod route;
pub mod schema;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/test", get(route::ping).post(route::ping))
        .route(
            "/api/test-email",
            get(route::email_config).post(route::test_email),
        )
        .route("/api/debug-email", post(route::debug_email))
}
