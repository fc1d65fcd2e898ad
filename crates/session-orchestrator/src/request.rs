//! Request validation (spec §4.7 point 1).

use soulbrowser_core_types::{BrowserName, LoginMode, OtpSpec, OtpStorageType, RunRequest, SocialAuthSpec};

use crate::errors::OrchestratorError;

/// A `RunRequest` after validation and default-filling. Unlike `RunRequest`
/// itself, the fields that drive control flow are no longer optional.
#[derive(Clone, Debug)]
pub struct RunPlan {
    pub test_case_id: Option<String>,
    pub module_ids: Option<Vec<String>>,
    pub login_required: bool,
    pub login_mode: Option<LoginMode>,
    pub social_auth: Option<SocialAuthSpec>,
    pub otp: Option<OtpSpec>,
    pub browser_name: BrowserName,
    pub headless: bool,
    pub user_id: Option<String>,
    pub project_id: Option<String>,
}

/// cdp-adapter only drives Chromium (§9 Open Question, resolved): any other
/// `browserName` is rejected up front rather than silently falling back.
fn require_chromium(browser_name: BrowserName) -> Result<(), OrchestratorError> {
    match browser_name {
        BrowserName::Chromium => Ok(()),
        other => Err(OrchestratorError::UnsupportedEngine(other)),
    }
}

pub fn validate(req: RunRequest, default_browser: BrowserName) -> Result<RunPlan, OrchestratorError> {
    if !req.is_valid() {
        return Err(OrchestratorError::Validation(
            "request must set a non-empty testCaseId or a non-empty moduleIds".to_string(),
        ));
    }

    let login_required = req.login_required.unwrap_or(false);
    let browser_name = req.browser_name.unwrap_or(default_browser);
    require_chromium(browser_name)?;

    if matches!(req.login_mode, Some(LoginMode::Social)) && req.social_auth.is_none() {
        return Err(OrchestratorError::Validation(
            "socialAuth.authTestCaseId is required when loginMode is social".to_string(),
        ));
    }

    let otp = match (login_required, req.login_mode, req.otp) {
        (true, Some(LoginMode::Otp), None) => Some(OtpSpec {
            storage_type: OtpStorageType::LocalStorage,
            object: serde_json::Value::Object(Default::default()),
        }),
        (_, _, otp) => otp,
    };

    Ok(RunPlan {
        test_case_id: req.test_case_id,
        module_ids: req.module_ids,
        login_required,
        login_mode: req.login_mode,
        social_auth: req.social_auth,
        otp,
        browser_name,
        headless: req.headless.unwrap_or(true),
        user_id: req.user_id,
        project_id: req.project_id,
    })
}
