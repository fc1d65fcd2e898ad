//! `fileSelect` (spec §4.4): decodes `storageData`'s base64 payload and
//! hands it to the resolved `<input type="file">`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cdp_adapter::{Cdp, FileUpload, PageId};
use soulbrowser_core_types::Action;

use crate::{errors::ActionError, primitives::DefaultActionInterpreter, types::ActionReport};

pub(crate) async fn execute_file_select(
    interpreter: &DefaultActionInterpreter,
    page: PageId,
    action: &Action,
) -> Result<ActionReport, ActionError> {
    let storage = action
        .storage_data
        .as_ref()
        .ok_or_else(|| ActionError::ActionRuntime("fileSelect requires storageData".to_string()))?;
    let descriptor = action
        .element
        .as_ref()
        .ok_or_else(|| ActionError::ActionRuntime("fileSelect requires an element".to_string()))?;

    let ctx = interpreter.locate_frame(page, action).await?;
    let resolved = interpreter.resolver().resolve(&ctx, descriptor, None).await?;
    interpreter
        .resolver()
        .scroll_into_view(&ctx, &resolved.selector, resolved.strategy.is_xpath())
        .await;

    let bytes = STANDARD
        .decode(storage.base64_payload())
        .map_err(|err| ActionError::ActionRuntime(format!("invalid storageData payload: {err}")))?;

    let file = FileUpload {
        name: storage.name.clone(),
        mime_type: storage.mime_type.clone(),
        bytes,
    };

    interpreter
        .adapter()
        .set_input_files(&ctx, &resolved.selector, vec![file])
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;

    Ok(ActionReport::success("File selected"))
}
