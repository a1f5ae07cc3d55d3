use std::time::Duration;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// CORS for the admin API, which is called from the admin console's origin.
pub fn admin_cors(admin_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = admin_origin
        .parse()
        .context("The admin origin should be a valid header value.")?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86400)))
}
