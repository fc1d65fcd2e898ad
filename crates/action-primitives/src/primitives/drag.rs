//! `dragstart` / `dragend` (spec §4.4): a drag gesture built from the raw
//! mouse primitives, since drag needs trusted input events rather than a
//! synthetic DOM `drag` event.

use cdp_adapter::{Cdp, MouseButton, PageId, ResolvedExecutionContext};
use soulbrowser_core_types::Action;

use crate::{
    errors::ActionError,
    primitives::{bounding_box_center, DefaultActionInterpreter},
    types::ActionReport,
};

const NO_SCROLL_STYLE_ID: &str = "__drag_no_scroll__";

pub(crate) async fn execute_dragstart(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    let descriptor = action
        .element
        .as_ref()
        .ok_or_else(|| ActionError::ActionRuntime("dragstart requires an element".to_string()))?;

    let ctx = interpreter.locate_frame(page, action).await?;
    let resolved = interpreter.resolver().resolve(&ctx, descriptor, None).await?;
    let is_xpath = resolved.strategy.is_xpath();
    interpreter
        .resolver()
        .scroll_into_view(&ctx, &resolved.selector, is_xpath)
        .await;

    let (x, y) =
        bounding_box_center(interpreter.adapter(), &ctx, &resolved.selector, is_xpath).await?;

    disable_page_scroll(interpreter, &ctx).await;

    let adapter = interpreter.adapter();
    adapter
        .mouse_move(page, x, y)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    adapter
        .mouse_down(page, x, y, MouseButton::Left)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;

    Ok(ActionReport::success("Drag started"))
}

pub(crate) async fn execute_dragend(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    let ctx = interpreter.locate_frame(page, action).await?;
    let (x, y) = match resolve_drop_target(interpreter, &ctx, action).await {
        Some(point) => point,
        None => viewport_center(interpreter, &ctx).await?,
    };

    let adapter = interpreter.adapter();
    adapter
        .mouse_move(page, x, y)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    adapter
        .mouse_up(page, x, y, MouseButton::Left)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;

    restore_page_scroll(interpreter, &ctx).await;

    Ok(ActionReport::success("Drag ended"))
}

async fn resolve_drop_target(
    interpreter: &DefaultActionInterpreter,
    ctx: &ResolvedExecutionContext,
    action: &Action,
) -> Option<(f64, f64)> {
    let descriptor = action.drop_target.as_ref()?;
    let resolved = interpreter.resolver().resolve(ctx, descriptor, None).await.ok()?;
    bounding_box_center(
        interpreter.adapter(),
        ctx,
        &resolved.selector,
        resolved.strategy.is_xpath(),
    )
    .await
    .ok()
}

async fn viewport_center(
    interpreter: &DefaultActionInterpreter,
    ctx: &ResolvedExecutionContext,
) -> Result<(f64, f64), ActionError> {
    let value = interpreter
        .adapter()
        .evaluate_script_in_context(
            ctx,
            "(() => ({ x: window.innerWidth / 2, y: window.innerHeight / 2 }))()",
        )
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    let x = value.get("x").and_then(|v| v.as_f64()).unwrap_or(0.0);
    let y = value.get("y").and_then(|v| v.as_f64()).unwrap_or(0.0);
    Ok((x, y))
}

async fn disable_page_scroll(interpreter: &DefaultActionInterpreter, ctx: &ResolvedExecutionContext) {
    let css = "html, body { overflow: hidden !important; height: 100% !important; touch-action: none !important; }";
    let expression = format!(
        "(() => {{ if (document.getElementById('{id}')) return; \
         const style = document.createElement('style'); \
         style.id = '{id}'; \
         style.textContent = {css_literal}; \
         document.head.appendChild(style); }})()",
        id = NO_SCROLL_STYLE_ID,
        css_literal = serde_json::to_string(css).unwrap_or_else(|_| "\"\"".to_string()),
    );
    let _ = interpreter
        .adapter()
        .evaluate_script_in_context(ctx, &expression)
        .await;
}

async fn restore_page_scroll(interpreter: &DefaultActionInterpreter, ctx: &ResolvedExecutionContext) {
    let expression = format!(
        "(() => {{ const style = document.getElementById('{id}'); if (style) style.remove(); }})()",
        id = NO_SCROLL_STYLE_ID,
    );
    let _ = interpreter
        .adapter()
        .evaluate_script_in_context(ctx, &expression)
        .await;
}
