use axum::{extract::State, http::StatusCode, Json};

use super::schema::{EmailCheckResponseBody, PingResponseBody, TestEmailRequestBody};
use crate::{
    app::{
        error::{AppError, AppResult},
        AppState,
    },
    domain::subscriber::email::Email,
    email::EmailError,
};

pub async fn ping() -> Json<PingResponseBody> {
    Json(PingResponseBody {
        success: true,
        message: "Test endpoint is working",
        timestamp: chrono::Utc::now(),
    })
}

/// Reports the email configuration without sending anything.
#[tracing::instrument(name = "Check email configuration", skip(state))]
pub async fn email_config(State(state): State<AppState>) -> Json<EmailCheckResponseBody> {
    let configured = state.email_client.is_configured();

    Json(EmailCheckResponseBody {
        success: configured,
        message: if configured {
            "Email configuration ready"
        } else {
            "Email configuration incomplete"
        },
        env_check: state.email_client.report(),
        test_email: None,
        error: None,
    })
}

#[tracing::instrument(name = "Send a test email", skip(state, body))]
pub async fn test_email(
    State(state): State<AppState>,
    Json(body): Json<TestEmailRequestBody>,
) -> AppResult<(StatusCode, Json<EmailCheckResponseBody>)> {
    send_test_email(&state, body, false).await
}

#[tracing::instrument(name = "Send a debug email", skip(state, body))]
pub async fn debug_email(
    State(state): State<AppState>,
    Json(body): Json<TestEmailRequestBody>,
) -> AppResult<(StatusCode, Json<EmailCheckResponseBody>)> {
    send_test_email(&state, body, true).await
}

async fn send_test_email(
    state: &AppState,
    body: TestEmailRequestBody,
    verbose: bool,
) -> AppResult<(StatusCode, Json<EmailCheckResponseBody>)> {
    let recipient = body
        .test_email
        .ok_or_else(|| "email is missing".to_owned())
        .and_then(Email::try_from)
        .map_err(|_| AppError::ValidationError("Invalid email address".to_owned()))?;

    let env_check = state.email_client.report();
    if verbose {
        tracing::debug!(recipient = %recipient, env_check = ?env_check, "checked email configuration");
    }

    let subject = if verbose {
        "Email Debug Test"
    } else {
        "Email Configuration Test"
    };
    let plain_body = format!(
        "This is a test email to verify the email configuration.\n\n\
        Relay: {}\nFrom: {}\nSent: {}",
        env_check.base_url,
        env_check.sender_email,
        chrono::Utc::now().to_rfc2822(),
    );
    let html_body = format!(
        "<h2>{}</h2>\
        <p>This is a test email to verify the email configuration.</p>\
        <ul><li><strong>Relay:</strong> {}</li><li><strong>From:</strong> {}</li></ul>",
        subject, env_check.base_url, env_check.sender_email,
    );

    if verbose {
        tracing::debug!(recipient = %recipient, subject, "sending test email");
    }
    let outcome = state
        .email_client
        .send_email(&recipient, subject, &html_body, &plain_body)
        .await;

    let response = match outcome {
        Ok(()) => {
            tracing::info!(recipient = %recipient, "test email sent");
            (
                StatusCode::OK,
                EmailCheckResponseBody {
                    success: true,
                    message: "Test email sent successfully",
                    env_check,
                    test_email: Some(recipient.to_string()),
                    error: None,
                },
            )
        }
        Err(EmailError::MissingCredentials) => (
            StatusCode::OK,
            EmailCheckResponseBody {
                success: false,
                message: "Email configuration incomplete",
                env_check,
                test_email: None,
                error: Some(EmailError::MissingCredentials.to_string()),
            },
        ),
        Err(e) => {
            tracing::error!(recipient = %recipient, detail = ?e, "failed to send test email");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                EmailCheckResponseBody {
                    success: false,
                    message: "Failed to send test email",
                    env_check,
                    test_email: None,
                    error: Some(e.to_string()),
                },
            )
        }
    };

    Ok((response.0, Json(response.1)))
}
