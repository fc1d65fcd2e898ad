//! Action Interpreter (spec §4.4): dispatches a declarative `Action` to
//! concrete CDP operations, invoking the Frame Locator and Element Resolver
//! as needed.

mod change;
mod drag;
mod file_select;
mod hover;
mod key_press;
mod mousedown;
mod navigate;
mod scroll;

use std::sync::Arc;

use action_locator::{ElementResolver, FrameLocator};
use async_trait::async_trait;
use cdp_adapter::{Cdp, CdpAdapter, PageId, ResolvedExecutionContext};
use soulbrowser_core_types::{Action, ActionType};
use tokio::sync::OnceCell;

use crate::{
    errors::ActionError,
    types::{ActionReport, ExecCtx},
    waiting::WaitStrategy,
};

/// Executes one action and reports the outcome. Assertion evaluation is a
/// separate concern (Assertion Evaluator, §4.5), run by the Step Runner
/// after this returns.
#[async_trait]
pub trait ActionInterpreter: Send + Sync {
    /// `next_action` is the action immediately following this one in the
    /// test case, if any — `mousedown`'s fileSelect lookahead (§4.4) needs
    /// it.
    async fn execute(
        &self,
        ctx: &ExecCtx,
        page: PageId,
        action: &Action,
        next_action: Option<&Action>,
    ) -> ActionReport;
}

/// Default interpreter implementation, built on the CDP adapter and the
/// Element Resolver / Frame Locator crate.
pub struct DefaultActionInterpreter {
    adapter: Arc<CdpAdapter>,
    resolver: ElementResolver<CdpAdapter>,
    frame_locator: FrameLocator<CdpAdapter>,
    wait_strategy: Arc<dyn WaitStrategy>,
    adapter_ready: OnceCell<()>,
}

impl DefaultActionInterpreter {
    pub fn new(adapter: Arc<CdpAdapter>, wait_strategy: Arc<dyn WaitStrategy>) -> Self {
        Self {
            resolver: ElementResolver::new(adapter.clone()),
            frame_locator: FrameLocator::new(adapter.clone()),
            adapter,
            wait_strategy,
            adapter_ready: OnceCell::new(),
        }
    }

    pub fn adapter(&self) -> &Arc<CdpAdapter> {
        &self.adapter
    }

    pub fn resolver(&self) -> &ElementResolver<CdpAdapter> {
        &self.resolver
    }

    pub fn wait_strategy(&self) -> &Arc<dyn WaitStrategy> {
        &self.wait_strategy
    }

    pub async fn ensure_adapter_ready(&self) -> Result<(), ActionError> {
        self.adapter_ready
            .get_or_try_init(|| async {
                Arc::clone(&self.adapter).start().await.map_err(|err| {
                    ActionError::Internal(format!("Failed to start CDP adapter: {}", err))
                })
            })
            .await
            .map(|_| ())
    }

    /// Common preamble (§4.4): obtain the action's frame via the Frame
    /// Locator. `hover` and key-name actions bypass this and always act on
    /// the top page, per their own semantics.
    pub(crate) async fn locate_frame(
        &self,
        page: PageId,
        action: &Action,
    ) -> Result<ResolvedExecutionContext, ActionError> {
        self.ensure_adapter_ready().await?;
        Ok(self.frame_locator.locate(page, action).await?)
    }
}

#[async_trait]
impl ActionInterpreter for DefaultActionInterpreter {
    async fn execute(
        &self,
        ctx: &ExecCtx,
        page: PageId,
        action: &Action,
        next_action: Option<&Action>,
    ) -> ActionReport {
        match self.dispatch(ctx, page, action, next_action).await {
            Ok(report) => report,
            Err(err) => ActionReport::failure(err),
        }
    }
}

/// Center point of an element's bounding box, via `getBoundingClientRect`.
/// Used by `mousedown` and the drag handlers, which both need raw pixel
/// coordinates rather than a selector `click`.
pub(crate) async fn bounding_box_center(
    adapter: &CdpAdapter,
    ctx: &ResolvedExecutionContext,
    selector: &str,
    is_xpath: bool,
) -> Result<(f64, f64), ActionError> {
    let expression = format!(
        "(() => {{ const el = {lookup}; if (!el) return null; const r = el.getBoundingClientRect(); return {{ x: r.left + r.width / 2, y: r.top + r.height / 2 }}; }})()",
        lookup = action_locator::lookup_expression(selector, is_xpath),
    );
    let value = adapter
        .evaluate_script_in_context(ctx, &expression)
        .await
        .map_err(|err| ActionError::CdpIo(err.to_string()))?;
    let x = value.get("x").and_then(|v| v.as_f64());
    let y = value.get("y").and_then(|v| v.as_f64());
    match (x, y) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(ActionError::ActionRuntime(
            "element bounding box unavailable".to_string(),
        )),
    }
}

impl DefaultActionInterpreter {
    async fn dispatch(
        &self,
        ctx: &ExecCtx,
        page: PageId,
        action: &Action,
        next_action: Option<&Action>,
    ) -> Result<ActionReport, ActionError> {
        if ctx.is_cancelled() {
            return Err(ActionError::Internal("context cancelled".to_string()));
        }

        match &action.action_type.0 {
            ActionType::SystemNavigate => navigate::execute_system_navigate(self, page, action).await,
            ActionType::Navigate => navigate::execute_navigate_assert(self, page, action).await,
            ActionType::MouseDown => {
                mousedown::execute_mousedown(self, page, action, next_action).await
            }
            ActionType::Change => change::execute_change(self, page, action).await,
            ActionType::Hover => hover::execute_hover(self, page, action).await,
            ActionType::Scroll => scroll::execute_scroll(self, page, action).await,
            ActionType::FileSelect => file_select::execute_file_select(self, page, action).await,
            ActionType::DragStart => drag::execute_dragstart(self, page, action).await,
            ActionType::DragEnd => drag::execute_dragend(self, page, action).await,
            ActionType::Key(key) => key_press::execute_key_press(self, page, *key).await,
            ActionType::Unknown(raw) => Err(ActionError::UnsupportedActionType(raw.clone())),
        }
    }
}
