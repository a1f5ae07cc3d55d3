use anyhow::Context;
use axum::{extract::State, Json};

use super::schema::{SupportRequest, SupportRequestBody, SupportResponseBody};
use crate::{
    app::{
        error::{AppError, AppResult},
        AppState,
    },
    email::OutgoingEmail,
};

/// Forwards a contact-form message to the support inbox. Unlike registration, the email is
/// the whole point of the request, so a failed send fails the request.
#[tracing::instrument(name = "Contact support", skip(state, body))]
pub async fn contact_support(
    State(state): State<AppState>,
    Json(body): Json<SupportRequestBody>,
) -> AppResult<Json<SupportResponseBody>> {
    let request = SupportRequest::try_from(body).map_err(AppError::ValidationError)?;

    let submitted_at = chrono::Utc::now().to_rfc2822();
    let plain_body = format!(
        "Support message from the website\n\nFrom: {}\nEmail: {}\nSubject: {}\nSubmitted: {}\n\n{}",
        request.name, request.email, request.subject, submitted_at, request.message,
    );
    let html_body = format!(
        "<h2>Support message from the website</h2>\
        <p><strong>From:</strong> {}</p>\
        <p><strong>Email:</strong> <a href=\"mailto:{}\">{}</a></p>\
        <p><strong>Subject:</strong> {}</p>\
        <p><strong>Submitted:</strong> {}</p>\
        <p style=\"white-space: pre-wrap\">{}</p>",
        request.name,
        request.email,
        request.email,
        request.subject,
        submitted_at,
        request.message,
    );

    state
        .email_client
        .send(OutgoingEmail {
            recipients: std::slice::from_ref(&state.inboxes.support),
            reply_to: Some(&request.email),
            subject: &format!("Support Request: {}", request.subject),
            html_content: &html_body,
            text_content: &plain_body,
        })
        .await
        .with_context(|| format!("Failed to forward the support request from {}.", request.email))?;

    Ok(Json(SupportResponseBody { success: true }))
}
