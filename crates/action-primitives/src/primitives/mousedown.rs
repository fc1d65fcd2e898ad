//! `mousedown` (spec §4.4): raw click via bounding-box center, skipped when
//! the next action is a file picker or the target is a native alert.

use cdp_adapter::{Cdp, MouseButton, PageId};
use soulbrowser_core_types::{Action, ActionType};

use crate::{
    errors::ActionError,
    primitives::{bounding_box_center, DefaultActionInterpreter},
    types::ActionReport,
};

pub(crate) async fn execute_mousedown(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
    next_action: Option<&Action>,
) -> Result<ActionReport, ActionError> {
    let is_alert = action
        .element
        .as_ref()
        .map(|e| e.is_alert())
        .unwrap_or(false);
    let next_is_file_select = next_action
        .map(|next| matches!(next.action_type.0, ActionType::FileSelect))
        .unwrap_or(false);
    if is_alert || next_is_file_select {
        return Ok(ActionReport::success("Click avoided"));
    }

    let descriptor = action
        .element
        .as_ref()
        .ok_or_else(|| ActionError::ActionRuntime("mousedown requires an element".to_string()))?;
    let xpath_candidates = descriptor.xpath_list();
    if xpath_candidates.is_empty() {
        return Err(ActionError::ActionRuntime(
            "mousedown requires xpath".to_string(),
        ));
    }

    let ctx = interpreter.locate_frame(page, action).await?;
    let selector = interpreter
        .resolver()
        .ensure_clickable(&ctx, &xpath_candidates)
        .await?;
    interpreter
        .resolver()
        .scroll_into_view(&ctx, &selector, true)
        .await;

    let (x, y) = bounding_box_center(interpreter.adapter(), &ctx, &selector, true).await?;
    let adapter = interpreter.adapter();
    adapter
        .mouse_move(page, x, y)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    adapter
        .mouse_down(page, x, y, MouseButton::Left)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    adapter
        .mouse_up(page, x, y, MouseButton::Left)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;

    Ok(ActionReport::success("Clicked"))
}
