//! Per-assertion-kind evaluation logic (spec §4.5). Each function reports
//! `Ok(())` on success or `Err(reason)`, where `reason` becomes the tail of
//! the evaluator's "Assertion failed: {reason}" message.

use std::time::Duration;

use action_locator::{lookup_expression, FrameLocator};
use cdp_adapter::{Cdp, PageId};
use regex::Regex;
use soulbrowser_core_types::{Action, ElementDescriptor};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const DOWNLOAD_WAIT: Duration = Duration::from_secs(5);

pub(crate) async fn valid_email(descriptor: Option<&ElementDescriptor>) -> Result<(), String> {
    let value = descriptor.and_then(|d| d.value.as_deref()).unwrap_or("");
    let re = Regex::new(EMAIL_PATTERN).expect("static email pattern is valid");
    if re.is_match(value) {
        Ok(())
    } else {
        Err(format!("{value:?} is not a valid email"))
    }
}

pub(crate) async fn form_has_value(
    descriptor: Option<&ElementDescriptor>,
    expected: &str,
) -> Result<(), String> {
    let actual = descriptor.and_then(|d| d.value.as_deref()).unwrap_or("");
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected form value {expected:?}, got {actual:?}"))
    }
}

pub(crate) async fn element_has_text(
    descriptor: Option<&ElementDescriptor>,
    expected: &str,
) -> Result<(), String> {
    let actual = descriptor
        .and_then(|d| d.text_content.as_deref())
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let expected_norm = expected.trim().to_lowercase();
    if actual.contains(&expected_norm) {
        Ok(())
    } else {
        Err(format!(
            "element text {actual:?} does not contain {expected:?}"
        ))
    }
}

pub(crate) async fn page_has_title<C: Cdp>(
    adapter: &C,
    page: PageId,
    expected: &str,
) -> Result<(), String> {
    let title = adapter
        .evaluate_script(page, "document.title")
        .await
        .map_err(|err| err.to_string())?;
    let title = title.as_str().unwrap_or("").to_lowercase();
    if title.contains(&expected.to_lowercase()) {
        Ok(())
    } else {
        Err(format!(
            "page title {title:?} does not contain {expected:?}"
        ))
    }
}

pub(crate) async fn page_has_text<C: Cdp>(
    adapter: &C,
    page: PageId,
    expected: &str,
) -> Result<(), String> {
    let text = adapter
        .evaluate_script(page, "document.body.innerText")
        .await
        .map_err(|err| err.to_string())?;
    let text = text.as_str().unwrap_or("").to_lowercase();
    if text.contains(&expected.to_lowercase()) {
        Ok(())
    } else {
        Err(format!("page text does not contain {expected:?}"))
    }
}

/// Walks `descriptor.xpath` in declared order; succeeds as soon as one
/// candidate's first DOM match is visible (`offsetParent !== null`).
pub(crate) async fn element_is_visible<C: Cdp>(
    adapter: &C,
    frame_locator: &FrameLocator<C>,
    page: PageId,
    action: &Action,
    descriptor: Option<&ElementDescriptor>,
) -> Result<(), String> {
    let candidates = descriptor.map(ElementDescriptor::xpath_list).unwrap_or_default();
    if candidates.is_empty() {
        return Err("element descriptor has no xpath candidates".to_string());
    }

    let ctx = frame_locator
        .locate(page, action)
        .await
        .map_err(|err| err.to_string())?;

    for xpath in &candidates {
        let expression = format!(
            "(() => {{ const el = {lookup}; return !!(el && el.offsetParent !== null); }})()",
            lookup = lookup_expression(xpath, true),
        );
        let visible = adapter
            .evaluate_script_in_context(&ctx, &expression)
            .await
            .map_err(|err| err.to_string())?
            .as_bool()
            .unwrap_or(false);
        if visible {
            return Ok(());
        }
    }

    Err("no xpath candidate is visible".to_string())
}

pub(crate) async fn download_started<C: Cdp>(adapter: &C, page: PageId) -> Result<(), String> {
    let started = adapter
        .wait_for_download(page, DOWNLOAD_WAIT)
        .await
        .map_err(|err| err.to_string())?;
    if started {
        Ok(())
    } else {
        Err("no download started within 5s".to_string())
    }
}
