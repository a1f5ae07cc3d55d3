use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AppState;

mod policy;

pub use self::policy::{Access, AccessPolicy, HostOriginPolicy, RequestInfo};

fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Answers 404 for requests the access policy denies, before they reach the router.
pub async fn guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let info = RequestInfo {
        host: header_str(headers, header::HOST),
        origin: header_str(headers, header::ORIGIN),
        path: request.uri().path(),
    };

    if state.access_policy.decide(&info) == Access::Deny {
        tracing::info!(
            host = info.host,
            origin = info.origin,
            path = info.path,
            "request denied by access policy"
        );
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    next.run(request).await
}
