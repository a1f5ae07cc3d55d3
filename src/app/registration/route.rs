use anyhow::Context;
use axum::{extract::State, Json};
use tracing::{instrument, Instrument};

use super::schema::{RegisterRequestBody, RegisterResponseBody};
use crate::{
    app::{
        error::{AppError, AppResult},
        AppState,
    },
    domain::subscriber::{email::Email, NewSubscriber},
    email::{EmailClient, EmailError, OutgoingEmail},
};

#[instrument(
    name = "Registering a new subscriber",
    skip(state, body),
    fields(email = tracing::field::Empty, client_timestamp = ?body.timestamp)
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> AppResult<Json<RegisterResponseBody>> {
    let new_subscriber = NewSubscriber::try_from(body).map_err(|e| {
        tracing::error!(detail = e, "failed to parse subscriber from body");
        AppError::ValidationError("Invalid email address".to_owned())
    })?;
    tracing::Span::current().record("email", tracing::field::display(&new_subscriber.email));

    state
        .store
        .upsert(&new_subscriber.email, new_subscriber.opt_in)
        .await
        .context("Failed to store the subscriber.")?;

    // Registration is complete once stored. Emails go out in the background.
    let email_client = state.email_client.clone();
    let inboxes = state.inboxes.clone();
    tokio::spawn(
        async move {
            let (notification, confirmation) = tokio::join!(
                send_notification_email(&email_client, &inboxes.signups, &new_subscriber),
                send_confirmation_email(&email_client, &new_subscriber),
            );
            if let Err(e) = notification {
                tracing::error!(detail = %e, "failed to notify the team about a new subscriber");
            }
            if let Err(e) = confirmation {
                tracing::error!(
                    detail = %e,
                    "failed to send a confirmation email to the new subscriber"
                );
            }
        }
        .in_current_span(),
    );

    Ok(Json(RegisterResponseBody { success: true }))
}

fn opt_in_label(opt_in: bool) -> &'static str {
    if opt_in {
        "Yes"
    } else {
        "No"
    }
}

#[instrument(
    name = "Send a signup notification to the team",
    skip(email_client, recipients, new_subscriber)
)]
async fn send_notification_email(
    email_client: &EmailClient,
    recipients: &[Email],
    new_subscriber: &NewSubscriber,
) -> Result<(), EmailError> {
    let registered_at = chrono::Utc::now().to_rfc2822();

    let plain_body = format!(
        "New early access member\n\nEmail: {}\nOpt-in to communications: {}\nRegistration time: {}",
        new_subscriber.email,
        opt_in_label(new_subscriber.opt_in),
        registered_at,
    );

    let html_body = format!(
        "<h2>New early access member</h2>\
        <p><strong>Email:</strong> {}</p>\
        <p><strong>Opt-in to communications:</strong> {}</p>\
        <p><strong>Registration time:</strong> {}</p>",
        new_subscriber.email,
        opt_in_label(new_subscriber.opt_in),
        registered_at,
    );

    email_client
        .send(OutgoingEmail {
            recipients,
            reply_to: None,
            subject: "New Early Access Member",
            html_content: &html_body,
            text_content: &plain_body,
        })
        .await
}

#[instrument(
    name = "Send a confirmation email to a new subscriber",
    skip(email_client, new_subscriber)
)]
async fn send_confirmation_email(
    email_client: &EmailClient,
    new_subscriber: &NewSubscriber,
) -> Result<(), EmailError> {
    let preference = if new_subscriber.opt_in {
        "You've opted in to receive updates and communications from us."
    } else {
        "You've chosen not to receive marketing communications. \
        You'll only receive essential updates about the launch."
    };

    let plain_body = format!(
        "Thank you for joining the early access list!\n\
        We'll let you know as soon as we launch.\n\n{}",
        preference
    );

    let html_body = format!(
        "<h2>Welcome aboard!</h2>\
        <p>Thank you for joining the early access list! \
        We'll let you know as soon as we launch.</p>\
        <p>{}</p>",
        preference
    );

    email_client
        .send_email(
            &new_subscriber.email,
            "Welcome - Early Access Confirmed!",
            &html_body,
            &plain_body,
        )
        .await
}
