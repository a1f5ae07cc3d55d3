use serde::{Deserialize, Serialize};

use crate::store::Subscriber;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub count: Option<String>,
}

impl ListParams {
    pub fn count_only(&self) -> bool {
        self.count.as_deref() == Some("true")
    }
}

/// Present only when the store failed and an empty default was returned instead.
type Fallback = Option<bool>;

#[derive(Serialize)]
#[serde(untagged)]
pub enum ListResponseBody {
    Count {
        count: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback: Fallback,
    },
    Subscribers {
        subscribers: Vec<Subscriber>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback: Fallback,
    },
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub email: String,
}

#[derive(Serialize)]
pub struct DeleteResponseBody {
    pub deleted: bool,
}
