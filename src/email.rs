use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::domain::subscriber::email::Email;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("the email client has no api key configured")]
    MissingCredentials,

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// A message ready to be handed to the relay.
pub struct OutgoingEmail<'a> {
    pub recipients: &'a [Email],
    pub reply_to: Option<&'a Email>,
    pub subject: &'a str,
    pub html_content: &'a str,
    pub text_content: &'a str,
}

/// Client for a SendGrid-compatible mail relay.
#[derive(Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
    timeout: Duration,
}

/// What the client is configured with, minus the secret itself.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailClientReport {
    pub base_url: String,
    pub sender_email: String,
    pub api_key: &'static str,
    pub timeout_milliseconds: u64,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, EmailError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            sender,
            authorization_token,
            timeout,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.authorization_token.expose_secret().is_empty()
    }

    pub fn report(&self) -> EmailClientReport {
        EmailClientReport {
            base_url: self.base_url.clone(),
            sender_email: self.sender.to_string(),
            api_key: if self.is_configured() { "set" } else { "missing" },
            timeout_milliseconds: self.timeout.as_millis() as u64,
        }
    }

    pub async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), EmailError> {
        self.send(OutgoingEmail {
            recipients: std::slice::from_ref(recipient),
            reply_to: None,
            subject,
            html_content,
            text_content,
        })
        .await
    }

    pub async fn send(&self, email: OutgoingEmail<'_>) -> Result<(), EmailError> {
        if !self.is_configured() {
            return Err(EmailError::MissingCredentials);
        }

        let url = format!("{}/v3/mail/send", self.base_url);
        let body = SendEmailRequest {
            personalizations: [Personalization {
                to: email.recipients.iter().map(Address::from).collect(),
            }],
            from: Address::from(&self.sender),
            reply_to: email.reply_to.map(Address::from),
            subject: email.subject,
            content: [
                Content {
                    kind: "text/plain",
                    value: email.text_content,
                },
                Content {
                    kind: "text/html",
                    value: email.html_content,
                },
            ],
        };

        self.http_client
            .post(&url)
            .bearer_auth(self.authorization_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address<'a>>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

impl<'a> From<&'a Email> for Address<'a> {
    fn from(email: &'a Email) -> Self {
        Self {
            email: email.as_ref(),
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}
