//! `hover` (spec §4.4): always resolves against the top page, not the
//! action's located frame.

use cdp_adapter::{Cdp, PageId, ResolvedExecutionContext};

use soulbrowser_core_types::Action;

use crate::{
    errors::ActionError,
    primitives::{bounding_box_center, DefaultActionInterpreter},
    types::ActionReport,
};

pub(crate) async fn execute_hover(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    interpreter.ensure_adapter_ready().await?;
    let descriptor = action
        .element
        .as_ref()
        .ok_or_else(|| ActionError::ActionRuntime("hover requires an element".to_string()))?;

    let ctx = ResolvedExecutionContext::for_page(page);
    let resolved = interpreter.resolver().resolve(&ctx, descriptor, None).await?;
    let is_xpath = resolved.strategy.is_xpath();
    interpreter
        .resolver()
        .scroll_into_view(&ctx, &resolved.selector, is_xpath)
        .await;

    let (x, y) =
        bounding_box_center(interpreter.adapter(), &ctx, &resolved.selector, is_xpath).await?;
    interpreter
        .adapter()
        .mouse_move(page, x, y)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;

    Ok(ActionReport::success("Hovered"))
}
