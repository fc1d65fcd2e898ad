//! Session Orchestrator (spec §4.7): resolves a `RunRequest` into a session,
//! seeds login state, runs the test case (or batch) against it, and
//! guarantees the browser is closed exactly once.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cdp_adapter::{Cdp, CdpAdapter, PageId};
use soulbrowser_core_types::{
    BrowserName, LoginMode, OverallReport, RunRequest, StepStatus, TestCase, TestReport,
};
use test_catalog::{ModuleQuery, ResultStore, TestCatalog, TestResultPayload, TestResultRecord};
use tracing::{error, warn};

use crate::errors::OrchestratorError;
use crate::request::{validate, RunPlan};
use crate::seeding::seed_otp_storage;
use action_flow::StepRunner;

const SCREENSHOT_DEADLINE: Duration = Duration::from_secs(5);

/// §6: a single `testCaseId` request answers with a bare `TestReport`; a
/// `moduleIds` batch answers with an `OverallReport`.
#[derive(Debug)]
pub enum RunOutcome {
    Single(TestReport),
    Batch(OverallReport),
}

enum RunTarget {
    Single(TestCase),
    Batch(Vec<TestCase>),
}

pub struct SessionOrchestrator {
    adapter: Arc<CdpAdapter>,
    step_runner: Arc<dyn StepRunner>,
    catalog: Arc<dyn TestCatalog>,
    store: Arc<dyn ResultStore>,
    default_browser: BrowserName,
}

impl SessionOrchestrator {
    pub fn new(
        adapter: Arc<CdpAdapter>,
        step_runner: Arc<dyn StepRunner>,
        catalog: Arc<dyn TestCatalog>,
        store: Arc<dyn ResultStore>,
        default_browser: BrowserName,
    ) -> Self {
        Self {
            adapter,
            step_runner,
            catalog,
            store,
            default_browser,
        }
    }

    /// Runs the request to completion and closes the browser exactly once,
    /// on every exit path including an early validation failure after the
    /// page was already opened.
    pub async fn run(&self, req: RunRequest) -> Result<RunOutcome, OrchestratorError> {
        let plan = validate(req, self.default_browser)?;
        let result = self.run_plan(&plan).await;
        self.adapter.shutdown().await;
        result
    }

    /// Catalog lookups happen before a browser session is opened, so a
    /// missing test case (or missing auth test case) surfaces as a 404-class
    /// `NotFound` without depending on driver/launch success at all.
    async fn run_plan(&self, plan: &RunPlan) -> Result<RunOutcome, OrchestratorError> {
        let auth_case = match &plan.social_auth {
            Some(social) => Some(
                self.catalog
                    .fetch_test_case(&social.auth_test_case_id)
                    .await?
                    .ok_or_else(|| OrchestratorError::NotFound(social.auth_test_case_id.clone()))?,
            ),
            None => None,
        };
        let target = if plan.module_ids.is_some() {
            RunTarget::Batch(self.collect_batch(plan).await?)
        } else {
            let test_case_id = plan
                .test_case_id
                .as_deref()
                .expect("validated request carries testCaseId when moduleIds is absent");
            let test_case = self
                .catalog
                .fetch_test_case(test_case_id)
                .await?
                .ok_or_else(|| OrchestratorError::NotFound(test_case_id.to_string()))?;
            RunTarget::Single(test_case)
        };

        let page = self.adapter.create_page("about:blank").await?;

        if let Some(auth_case) = &auth_case {
            self.run_auth_test_case(page, auth_case).await?;
        }
        if matches!(plan.login_mode, Some(LoginMode::Otp)) {
            if let Some(otp) = &plan.otp {
                seed_otp_storage(&self.adapter, page, otp).await?;
            }
        }

        match target {
            RunTarget::Batch(test_cases) => {
                let mut reports = Vec::with_capacity(test_cases.len());
                for test_case in &test_cases {
                    reports.push(self.run_and_persist(page, plan, test_case).await);
                }
                Ok(RunOutcome::Batch(OverallReport::from_reports(reports)))
            }
            RunTarget::Single(test_case) => Ok(RunOutcome::Single(
                self.run_and_persist(page, plan, &test_case).await,
            )),
        }
    }

    /// Runs the already-fetched social-auth test case to seed the shared
    /// session. Its results are intentionally discarded (§4.7 point 2).
    async fn run_auth_test_case(
        &self,
        page: PageId,
        test_case: &TestCase,
    ) -> Result<(), OrchestratorError> {
        if let Some(url) = &test_case.url {
            self.adapter
                .navigate(page, url, Duration::from_secs(10))
                .await?;
        }
        self.step_runner
            .run_stop_on_failure(page, &test_case.actions)
            .await;
        Ok(())
    }

    async fn collect_batch(&self, plan: &RunPlan) -> Result<Vec<TestCase>, OrchestratorError> {
        let module_ids = plan
            .module_ids
            .as_ref()
            .expect("collect_batch only called when moduleIds is present");
        let query = ModuleQuery {
            module_ids: module_ids.clone(),
            user_id: plan.user_id.clone(),
            project_id: plan.project_id.clone(),
        };
        let mut cases = self.catalog.fetch_by_module_ids(&query).await?;
        if let Some(social) = &plan.social_auth {
            cases.retain(|case| case.id != social.auth_test_case_id);
        }
        Ok(cases)
    }

    /// Runs one test case, catching any failure so the batch continues
    /// (§4.7 point 5), and persists the result (§4.7 point 4), swallowing
    /// persistence errors.
    async fn run_and_persist(&self, page: PageId, plan: &RunPlan, test_case: &TestCase) -> TestReport {
        let report = self.run_one(page, test_case).await;

        let fail_screen_shot = if !report.status.is_pass() {
            self.capture_screenshot(page).await
        } else {
            None
        };

        let record = TestResultRecord {
            user_id: plan.user_id.clone(),
            test_case: test_case.id.clone(),
            name: test_case.name.clone(),
            project_id: plan.project_id.clone(),
            module_id: plan.module_ids.as_ref().and_then(|ids| ids.first().cloned()),
            status: report.status,
            result: TestResultPayload {
                passed: report.passed,
                failed: report.failed,
                skipped: report.skipped,
                total: report.total,
                results: serde_json::to_value(&report.results).unwrap_or(serde_json::Value::Null),
                status: if report.status.is_pass() { "pass" } else { "fail" }.to_string(),
                run_by: "cloud".to_string(),
            },
            fail_screen_shot,
        };

        if let Err(err) = self.store.save_test_results(record).await {
            error!(test_case_id = %test_case.id, %err, "failed to persist test result");
        }

        report
    }

    async fn run_one(&self, page: PageId, test_case: &TestCase) -> TestReport {
        match self.run_one_fallible(page, test_case).await {
            Ok(report) => report,
            Err(err) => {
                error!(test_case_id = %test_case.id, %err, "test case run failed");
                TestReport::summarize(
                    test_case.id.clone(),
                    test_case.name.clone(),
                    vec![soulbrowser_core_types::StepResult {
                        sequence: 1,
                        description: "run test case".to_string(),
                        status: StepStatus::Fail,
                        message: err,
                        assertions: Vec::new(),
                    }],
                )
            }
        }
    }

    async fn run_one_fallible(&self, page: PageId, test_case: &TestCase) -> Result<TestReport, String> {
        if let Some(url) = &test_case.url {
            self.adapter
                .navigate(page, url, Duration::from_secs(30))
                .await
                .map_err(|err| err.to_string())?;
        }
        let results = self
            .step_runner
            .run_stop_on_failure(page, &test_case.actions)
            .await;
        Ok(TestReport::summarize(
            test_case.id.clone(),
            test_case.name.clone(),
            results,
        ))
    }

    async fn capture_screenshot(&self, page: PageId) -> Option<String> {
        match self.adapter.screenshot(page, SCREENSHOT_DEADLINE).await {
            Ok(bytes) => Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes))),
            Err(err) => {
                warn!(%err, "failed to capture failure screenshot");
                None
            }
        }
    }
}
