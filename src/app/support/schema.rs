use serde::{Deserialize, Serialize};

use crate::domain::subscriber::email::Email;

#[derive(Deserialize)]
pub struct SupportRequestBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A contact-form submission with every field present.
#[derive(Debug)]
pub struct SupportRequest {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

fn required(field: Option<String>) -> Result<String, String> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| "All fields are required".to_owned())
}

impl TryFrom<SupportRequestBody> for SupportRequest {
    type Error = String;
    fn try_from(value: SupportRequestBody) -> Result<Self, Self::Error> {
        let name = required(value.name)?;
        let email = required(value.email)?;
        let subject = required(value.subject)?;
        let message = required(value.message)?;

        Ok(Self {
            name: name.trim().to_owned(),
            email: Email::try_from(email).map_err(|_| "Invalid email address".to_owned())?,
            subject: subject.trim().to_owned(),
            message,
        })
    }
}

#[derive(Serialize)]
pub struct SupportResponseBody {
    pub success: bool,
}
