use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::email::EmailClientReport;

#[derive(Serialize)]
pub struct PingResponseBody {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailRequestBody {
    pub test_email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailCheckResponseBody {
    pub success: bool,
    pub message: &'static str,
    pub env_check: EmailClientReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
