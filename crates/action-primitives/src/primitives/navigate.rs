//! `System_Navigate` and the assertive `navigate` action (spec §4.4).

use std::time::{Duration, Instant};

use cdp_adapter::{Cdp, PageId};
use soulbrowser_core_types::Action;
use tokio::time::sleep;
use url::Url;

use crate::{
    errors::ActionError,
    primitives::DefaultActionInterpreter,
    types::{ActionReport, WaitTier},
};

const NAVIGATE_TIMEOUT: Duration = Duration::from_secs(30);
const ASSERT_TIMEOUT: Duration = Duration::from_secs(10);
const ASSERT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Navigates to `url` with a "networkidle" load condition.
pub(crate) async fn execute_system_navigate(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    let url = action
        .url
        .as_deref()
        .ok_or_else(|| ActionError::ActionRuntime("System_Navigate requires url".to_string()))?;

    interpreter.ensure_adapter_ready().await?;
    interpreter
        .adapter()
        .navigate(page, url, NAVIGATE_TIMEOUT)
        .await
        .map_err(|err| ActionError::NavTimeout(err.to_string()))?;
    interpreter
        .wait_strategy()
        .wait(interpreter.adapter().clone(), page, WaitTier::Idle)
        .await?;
    Ok(ActionReport::success(format!("Navigated to {url}")))
}

/// Observational only (§9 Open Question (b)): never fails. Polls
/// `window.location.href` every second up to 10s and reports the comparison
/// as the step message regardless of outcome.
pub(crate) async fn execute_navigate_assert(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    interpreter.ensure_adapter_ready().await?;
    let expected = normalize_url(action.url.as_deref().unwrap_or_default());
    let deadline = Instant::now() + ASSERT_TIMEOUT;

    loop {
        let current = interpreter
            .adapter()
            .evaluate_script(page, "window.location.href")
            .await
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        let current_norm = normalize_url(&current);

        if current_norm == expected {
            return Ok(ActionReport::success(format!(
                "URL {current_norm} matches expected {expected}"
            )));
        }
        if Instant::now() >= deadline {
            return Ok(ActionReport::success(format!(
                "URL {current_norm} does not match expected {expected}"
            )));
        }
        sleep(ASSERT_POLL_INTERVAL).await;
    }
}

/// Strips a single trailing slash from a non-root path (P7); idempotent.
/// Falls back to a plain string trim when `u` does not parse as an
/// absolute URL (e.g. a bare path recorded before an origin was known).
pub fn normalize_url(u: &str) -> String {
    match Url::parse(u) {
        Ok(mut parsed) => {
            let path = parsed.path().to_string();
            if path != "/" && path.ends_with('/') {
                let trimmed = path.trim_end_matches('/');
                parsed.set_path(trimmed);
            }
            parsed.to_string()
        }
        Err(_) => {
            if u.len() > 1 && u.ends_with('/') {
                u.trim_end_matches('/').to_string()
            } else {
                u.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash_from_non_root_path() {
        assert_eq!(
            normalize_url("https://example.org/checkout/"),
            "https://example.org/checkout"
        );
    }

    #[test]
    fn keeps_root_path_unchanged() {
        assert_eq!(normalize_url("https://example.org/"), "https://example.org/");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize_url("https://example.org/checkout/");
        let twice = normalize_url(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn falls_back_to_string_trim_for_bare_paths() {
        assert_eq!(normalize_url("/checkout/"), "/checkout");
    }
}
