use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows are kept loosely typed so one malformed entry cannot reject the whole batch.
#[derive(Deserialize)]
pub struct ImportRequestBody {
    pub subscribers: Value,
}

#[derive(Serialize)]
pub struct ImportResponseBody {
    pub success: bool,
    pub message: String,
    pub results: ImportResults,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportResults {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl From<ImportResults> for ImportResponseBody {
    fn from(results: ImportResults) -> Self {
        Self {
            success: true,
            message: format!(
                "Import completed. {} imported, {} skipped.",
                results.imported, results.skipped
            ),
            results,
        }
    }
}
