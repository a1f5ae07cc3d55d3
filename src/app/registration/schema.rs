use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::subscriber::{email::Email, opt_in, NewSubscriber};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    pub email: Option<String>,
    /// Any JSON value; `None` only when the field is absent, so `null` stays distinguishable.
    #[serde(default, deserialize_with = "present")]
    pub opt_in: Option<Value>,
    /// Client-side submission time. Only logged; the store stamps its own time.
    pub timestamp: Option<String>,
}

impl TryFrom<RegisterRequestBody> for NewSubscriber {
    type Error = String;
    fn try_from(value: RegisterRequestBody) -> Result<Self, Self::Error> {
        let email = value.email.ok_or("email is missing")?;
        let email = Email::try_from(email)?;
        Ok(Self {
            email,
            opt_in: opt_in::from_json(value.opt_in.as_ref()),
        })
    }
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Serialize)]
pub struct RegisterResponseBody {
    pub success: bool,
}
