use crate::helper::{spawn_app, TestApp, ADMIN_ORIGIN, PUBLIC_HOST};

async fn request(
    app: &TestApp,
    method: reqwest::Method,
    path: &str,
    host: &str,
    origin: Option<&str>,
) -> reqwest::Response {
    let mut builder = reqwest::Client::new()
        .request(method, format!("{}{}", app.addr, path))
        .header("Host", host);
    if let Some(origin) = origin {
        builder = builder.header("Origin", origin);
    }
    builder.send().await.expect("The request should succeed.")
}

#[tokio::test]
async fn dashboard_is_hidden_on_the_public_host() {
    let app = spawn_app().await;

    let response = request(&app, reqwest::Method::GET, "/dashboard", PUBLIC_HOST, None).await;

    assert_eq!(404, response.status().as_u16());
    assert_eq!(response.text().await.unwrap(), "Not Found");
}

#[tokio::test]
async fn setup_db_is_hidden_on_the_public_host_even_for_the_admin_origin() {
    let app = spawn_app().await;

    let response = request(
        &app,
        reqwest::Method::POST,
        "/api/setup-db",
        PUBLIC_HOST,
        Some(ADMIN_ORIGIN),
    )
    .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn subscriber_api_is_hidden_on_the_public_host_without_the_admin_origin() {
    let app = spawn_app().await;

    for origin in [None, Some("https://elsewhere.example")] {
        let response = request(
            &app,
            reqwest::Method::GET,
            "/api/subscribers?count=true",
            PUBLIC_HOST,
            origin,
        )
        .await;

        assert_eq!(
            404,
            response.status().as_u16(),
            "origin {:?} was let through",
            origin
        );
    }
}

#[tokio::test]
async fn subscriber_api_is_served_on_the_public_host_for_the_admin_origin() {
    let app = spawn_app().await;

    let response = request(
        &app,
        reqwest::Method::GET,
        "/api/subscribers?count=true",
        PUBLIC_HOST,
        Some(ADMIN_ORIGIN),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn admin_routes_are_served_on_other_hosts() {
    let app = spawn_app().await;

    let response = request(
        &app,
        reqwest::Method::POST,
        "/api/setup-db",
        "www.matetees.com.au",
        None,
    )
    .await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn registration_is_served_on_the_public_host() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/register", app.addr))
        .header("Host", PUBLIC_HOST)
        .json(&serde_json::json!({"email": "ash@mail.com"}))
        .send()
        .await
        .expect("The request should succeed.");

    assert_eq!(200, response.status().as_u16());
}
