//! Key-name actions (spec §4.4): presses a named key on the top-page
//! keyboard. Key actions carry no element target, so there is nothing for
//! the Frame Locator to resolve.

use cdp_adapter::{Cdp, PageId};
use soulbrowser_core_types::KeyName;

use crate::{errors::ActionError, primitives::DefaultActionInterpreter, types::ActionReport};

pub(crate) async fn execute_key_press(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    key: KeyName,
) -> Result<ActionReport, ActionError> {
    interpreter.ensure_adapter_ready().await?;
    interpreter
        .adapter()
        .key_press(page, key.as_str())
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    Ok(ActionReport::success(format!("Pressed {}", key.as_str())))
}
