use std::time::{Duration, Instant};

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::helper::{spawn_app, spawn_app_with_unreachable_database};

#[tokio::test]
async fn register_returns_200_for_valid_data() {
    let app = spawn_app().await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&app.email_server)
        .await;

    let body = r#"{"email": "bulbasaur@mail.com", "optIn": true, "timestamp": "2025-01-01T00:00:00Z"}"#;
    let response = app.post_register(body).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"success": true}));
}

#[tokio::test]
async fn register_persists_the_normalized_email() {
    let app = spawn_app().await;

    app.post_register(r#"{"email": "  Bulbasaur@Mail.com ", "optIn": false}"#)
        .await;

    let saved = app.stored_subscribers().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].email, "bulbasaur@mail.com");
    assert!(!saved[0].opt_in);
}

#[tokio::test]
async fn register_defaults_to_opting_in() {
    let app = spawn_app().await;

    let response = app.post_register(r#"{"email": "bulbasaur@mail.com"}"#).await;

    assert_eq!(200, response.status().as_u16());
    let saved = app.stored_subscribers().await;
    assert!(saved[0].opt_in);
}

#[tokio::test]
async fn registering_the_same_email_twice_updates_the_existing_record() {
    let app = spawn_app().await;

    app.post_register(r#"{"email": "Foo@Bar.com", "optIn": true}"#)
        .await;
    let first = app.stored_subscribers().await.remove(0);
    app.post_register(r#"{"email": "foo@bar.com", "optIn": false}"#)
        .await;

    let saved = app.stored_subscribers().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].email, "foo@bar.com");
    assert!(!saved[0].opt_in);
    assert_eq!(saved[0].id, first.id);
    assert_eq!(saved[0].created_at, first.created_at);
    assert!(saved[0].timestamp >= first.timestamp);
}

#[tokio::test]
async fn register_returns_a_400_for_an_invalid_email() {
    let app = spawn_app().await;
    let test_cases = [
        (r#"{"optIn": true}"#, "missing the email"),
        (r#"{"email": "", "optIn": true}"#, "empty email"),
        (
            r#"{"email": "definitely-not-an-email", "optIn": true}"#,
            "email without an @",
        ),
    ];

    for (body, description) in test_cases {
        let response = app.post_register(body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request when the payload had {}.",
            description
        );
    }

    assert!(app.stored_subscribers().await.is_empty());
}

#[tokio::test]
async fn register_sends_a_notification_and_a_confirmation_email() {
    let app = spawn_app().await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(2)
        .mount(&app.email_server)
        .await;

    app.post_register(r#"{"email": "bulbasaur@mail.com", "optIn": true}"#)
        .await;

    let requests = app.received_emails(2).await;
    let recipients: Vec<Vec<String>> = requests
        .iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            body["personalizations"][0]["to"]
                .as_array()
                .unwrap()
                .iter()
                .map(|to| to["email"].as_str().unwrap().to_owned())
                .collect()
        })
        .collect();

    assert!(recipients.contains(&vec!["bulbasaur@mail.com".to_owned()]));
    assert!(recipients.iter().any(|to| to.len() == 2));
}

#[tokio::test]
async fn register_succeeds_even_if_the_email_relay_fails() {
    let app = spawn_app().await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_register(r#"{"email": "bulbasaur@mail.com", "optIn": true}"#)
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(app.stored_subscribers().await.len(), 1);
    app.received_emails(2).await;
}

#[tokio::test]
async fn register_does_not_wait_for_a_slow_email_relay() {
    let app = spawn_app().await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202).set_delay(Duration::from_secs(5)))
        .mount(&app.email_server)
        .await;

    let started = Instant::now();
    let response = app
        .post_register(r#"{"email": "bulbasaur@mail.com", "optIn": true}"#)
        .await;

    assert_eq!(200, response.status().as_u16());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn register_accepts_non_boolean_opt_in_values() {
    let app = spawn_app().await;

    let response = app
        .post_register(r#"{"email": "bulbasaur@mail.com", "optIn": "no"}"#)
        .await;

    assert_eq!(200, response.status().as_u16());
    assert!(!app.stored_subscribers().await[0].opt_in);
}

#[tokio::test]
async fn register_returns_a_500_when_the_database_is_unreachable() {
    let app = spawn_app_with_unreachable_database().await;

    Mock::given(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_register(r#"{"email": "bulbasaur@mail.com", "optIn": true}"#)
        .await;

    assert_eq!(500, response.status().as_u16());
}
