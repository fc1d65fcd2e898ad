//! `change` (spec §4.4): fills text inputs, toggles checkboxes/radios, and
//! selects dropdown options, dispatching `input`/`change` DOM events so
//! framework-bound listeners observe the update.

use cdp_adapter::Cdp;
use cdp_adapter::PageId;
use soulbrowser_core_types::Action;

use crate::{errors::ActionError, primitives::DefaultActionInterpreter, types::ActionReport, variable};

pub(crate) async fn execute_change(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    let descriptor = action
        .element
        .as_ref()
        .ok_or_else(|| ActionError::ActionRuntime("change requires an element".to_string()))?;

    if descriptor.is_alert() {
        return Ok(ActionReport::success("ignored"));
    }

    let ctx = interpreter.locate_frame(page, action).await?;
    let resolved = interpreter.resolver().resolve(&ctx, descriptor, None).await?;
    let is_xpath = resolved.strategy.is_xpath();
    interpreter
        .resolver()
        .scroll_into_view(&ctx, &resolved.selector, is_xpath)
        .await;

    let lookup = action_locator::lookup_expression(&resolved.selector, is_xpath);
    let kind = detect_kind(interpreter, &ctx, &lookup).await?;

    match kind.as_str() {
        "text" => {
            let fallback = action.value.clone().unwrap_or_default();
            let value = match &action.variable {
                Some(var) => variable::resolve(var, &fallback),
                None => fallback,
            };
            fill_text(interpreter, &ctx, &lookup, &value).await?;
            Ok(ActionReport::success("Text entered"))
        }
        "checkbox" => {
            check_checkbox(interpreter, &ctx, &lookup).await?;
            Ok(ActionReport::success("Checkbox checked"))
        }
        "radio" => {
            check_radio(interpreter, &ctx, &lookup).await?;
            Ok(ActionReport::success("Radio selected"))
        }
        "select" => {
            let value = action.value.clone().unwrap_or_default();
            select_option(interpreter, &ctx, &lookup, &value).await?;
            Ok(ActionReport::success("Option selected"))
        }
        _ => Err(ActionError::UnsupportedElementKind),
    }
}

async fn detect_kind(
    interpreter: &DefaultActionInterpreter,
    ctx: &cdp_adapter::ResolvedExecutionContext,
    lookup: &str,
) -> Result<String, ActionError> {
    let expression = format!(
        "(() => {{ const el = {lookup}; if (!el) return 'missing'; \
         const tag = (el.tagName || '').toUpperCase(); \
         const type = (el.type || '').toLowerCase(); \
         if (tag === 'SELECT') return 'select'; \
         if (tag === 'INPUT' && type === 'checkbox') return 'checkbox'; \
         if (tag === 'INPUT' && type === 'radio') return 'radio'; \
         if (tag === 'INPUT' || tag === 'TEXTAREA') return 'text'; \
         return 'unknown'; }})()"
    );
    let value = interpreter
        .adapter()
        .evaluate_script_in_context(ctx, &expression)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    Ok(value.as_str().unwrap_or("unknown").to_string())
}

async fn fill_text(
    interpreter: &DefaultActionInterpreter,
    ctx: &cdp_adapter::ResolvedExecutionContext,
    lookup: &str,
    value: &str,
) -> Result<(), ActionError> {
    let value_literal = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string());
    let expression = format!(
        "(() => {{ const el = {lookup}; if (!el) return false; \
         el.value = {value_literal}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return true; }})()"
    );
    let result = interpreter
        .adapter()
        .evaluate_script_in_context(ctx, &expression)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    if result.as_bool().unwrap_or(false) {
        Ok(())
    } else {
        Err(ActionError::ActionRuntime(
            "failed to fill text input".to_string(),
        ))
    }
}

async fn check_checkbox(
    interpreter: &DefaultActionInterpreter,
    ctx: &cdp_adapter::ResolvedExecutionContext,
    lookup: &str,
) -> Result<(), ActionError> {
    let expression = format!(
        "(() => {{ const el = {lookup}; if (!el) return 'missing'; \
         el.checked = true; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         if (el.checked) return 'ok'; \
         let label = el.id ? document.querySelector(`label[for=\"${{el.id}}\"]`) : null; \
         if (!label) label = el.closest('label'); \
         if (label) {{ label.click(); return el.checked ? 'ok' : 'failed'; }} \
         return 'failed'; }})()"
    );
    let result = interpreter
        .adapter()
        .evaluate_script_in_context(ctx, &expression)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    match result.as_str() {
        Some("ok") => Ok(()),
        _ => Err(ActionError::ActionRuntime(
            "failed to check checkbox".to_string(),
        )),
    }
}

async fn check_radio(
    interpreter: &DefaultActionInterpreter,
    ctx: &cdp_adapter::ResolvedExecutionContext,
    lookup: &str,
) -> Result<(), ActionError> {
    let expression = format!(
        "(() => {{ const el = {lookup}; if (!el) return false; \
         el.checked = true; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return el.checked; }})()"
    );
    let result = interpreter
        .adapter()
        .evaluate_script_in_context(ctx, &expression)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    if result.as_bool().unwrap_or(false) {
        Ok(())
    } else {
        Err(ActionError::ActionRuntime(
            "failed to select radio".to_string(),
        ))
    }
}

async fn select_option(
    interpreter: &DefaultActionInterpreter,
    ctx: &cdp_adapter::ResolvedExecutionContext,
    lookup: &str,
    value: &str,
) -> Result<(), ActionError> {
    let value_literal = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string());
    let expression = format!(
        "(() => {{ const el = {lookup}; if (!el) return false; \
         let matched = false; \
         for (const opt of el.options) {{ if (opt.value === {value_literal}) {{ opt.selected = true; matched = true; break; }} }} \
         if (!matched) return false; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return true; }})()"
    );
    let result = interpreter
        .adapter()
        .evaluate_script_in_context(ctx, &expression)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    if result.as_bool().unwrap_or(false) {
        Ok(())
    } else {
        Err(ActionError::OptionNotFound(value.to_string()))
    }
}
