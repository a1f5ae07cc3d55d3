use serde_json::Value;
use wiremock::{matchers::any, Mock, ResponseTemplate};

use crate::helper::spawn_app;

#[tokio::test]
async fn import_reports_invalid_rows_and_imports_the_rest() {
    let app = spawn_app().await;

    let body = r#"{"subscribers": [
        {"email": "ash@mail.com", "optIn": true},
        {"email": 42, "optIn": true},
        {"email": "Misty@Mail.com", "optIn": false}
    ]}"#;
    let response = app.post_import(body).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Import completed. 2 imported, 1 skipped.");
    assert_eq!(body["results"]["total"], 3);
    assert_eq!(body["results"]["imported"], 2);
    assert_eq!(body["results"]["skipped"], 1);
    assert_eq!(body["results"]["errors"].as_array().unwrap().len(), 1);

    let emails: Vec<_> = app
        .stored_subscribers()
        .await
        .into_iter()
        .map(|s| s.email)
        .collect();
    assert!(emails.contains(&"ash@mail.com".to_owned()));
    assert!(emails.contains(&"misty@mail.com".to_owned()));
}

#[tokio::test]
async fn import_updates_subscribers_that_already_exist() {
    let app = spawn_app().await;
    app.post_register(r#"{"email": "ash@mail.com", "optIn": true}"#)
        .await;

    let response = app
        .post_import(r#"{"subscribers": [{"email": "ASH@mail.com", "optIn": false}]}"#)
        .await;

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["results"]["imported"], 1);
    let saved = app.stored_subscribers().await;
    assert_eq!(saved.len(), 1);
    assert!(!saved[0].opt_in);
}

#[tokio::test]
async fn import_keeps_string_emails_without_an_at() {
    let app = spawn_app().await;

    let response = app.post_import(r#"{"subscribers": [{"email": "ash"}]}"#).await;

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["results"]["imported"], 1);
    assert_eq!(body["results"]["skipped"], 0);
    assert_eq!(app.stored_subscribers().await[0].email, "ash");
}

#[tokio::test]
async fn import_returns_a_400_when_subscribers_is_not_an_array() {
    let app = spawn_app().await;

    let response = app
        .post_import(r#"{"subscribers": {"email": "ash@mail.com"}}"#)
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Invalid data format. Expected array of subscribers."
    );
}

#[tokio::test]
async fn import_does_not_send_any_email() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    app.post_import(r#"{"subscribers": [{"email": "ash@mail.com"}]}"#)
        .await;
}

#[tokio::test]
async fn csv_import_accepts_the_dashboard_export_format() {
    let app = spawn_app().await;

    let document = "email,optIn\nash@mail.com,yes\nmisty@mail.com,false\n,true\n";
    let response = app.post_import_csv(document).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["results"]["total"], 3);
    assert_eq!(body["results"]["imported"], 2);
    assert_eq!(body["results"]["skipped"], 1);

    let saved = app.stored_subscribers().await;
    let ash = saved.iter().find(|s| s.email == "ash@mail.com").unwrap();
    let misty = saved.iter().find(|s| s.email == "misty@mail.com").unwrap();
    assert!(ash.opt_in);
    assert!(!misty.opt_in);
}
