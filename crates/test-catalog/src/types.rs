//! Request/record types for the catalog and persistence interfaces (§6).

use serde::{Deserialize, Serialize};
use soulbrowser_core_types::StepStatus;

/// Filter for `TestCatalog::fetch_by_module_ids`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleQuery {
    pub module_ids: Vec<String>,
    pub user_id: Option<String>,
    pub project_id: Option<String>,
}

/// Body of `saveTestResults` (§6): one upserted latest-status row plus an
/// append-only run-history entry, both keyed by `test_case`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResultRecord {
    pub user_id: Option<String>,
    pub test_case: String,
    pub name: String,
    pub project_id: Option<String>,
    pub module_id: Option<String>,
    pub status: StepStatus,
    pub result: TestResultPayload,
    #[serde(rename = "fail_screenShot")]
    pub fail_screen_shot: Option<String>,
}

/// `result` field of [`TestResultRecord`]. `status` here is the
/// human-readable summary string the persistence collaborator expects,
/// distinct from the structured [`StepStatus`] at the record's top level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResultPayload {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub results: serde_json::Value,
    pub status: String,
    pub run_by: String,
}
