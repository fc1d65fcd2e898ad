//! `scroll` (spec §4.4): scrolls a named container, or the window, smoothly
//! to `(scrollX, scrollY)`.

use cdp_adapter::{Cdp, PageId};
use soulbrowser_core_types::Action;
use tokio::time::sleep;

use crate::{errors::ActionError, primitives::DefaultActionInterpreter, types::ActionReport};

const SETTLE: std::time::Duration = std::time::Duration::from_secs(1);

pub(crate) async fn execute_scroll(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    let ctx = interpreter.locate_frame(page, action).await?;
    let x = action.scroll_x.unwrap_or(0.0);
    let y = action.scroll_y.unwrap_or(0.0);

    let expression = match action.container_x_path.as_deref() {
        Some(xpath) if !xpath.is_empty() => {
            let lookup = action_locator::lookup_expression(xpath, true);
            format!(
                "(() => {{ const el = {lookup}; if (el) {{ el.scrollTo({{ left: {x}, top: {y}, behavior: 'smooth' }}); }} }})()"
            )
        }
        _ => format!("window.scrollTo({{ left: {x}, top: {y}, behavior: 'smooth' }})"),
    };

    interpreter
        .adapter()
        .evaluate_script_in_context(&ctx, &expression)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    sleep(SETTLE).await;

    Ok(ActionReport::success("Scrolled"))
}
