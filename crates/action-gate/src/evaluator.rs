//! Assertion Evaluator (spec §4.5): runs an action's declared assertions in
//! declared order, stopping at the first failure.

use std::sync::Arc;

use action_locator::FrameLocator;
use async_trait::async_trait;
use cdp_adapter::{Cdp, PageId};
use soulbrowser_core_types::{Action, AssertionResult, AssertionSpec};

use crate::kinds;

#[async_trait]
pub trait AssertionEvaluator: Send + Sync {
    /// Evaluates `action.assertions` in declared order, stopping as soon as
    /// one fails. An action with no assertions yields an empty vec.
    async fn evaluate(&self, page: PageId, action: &Action) -> Vec<AssertionResult>;
}

pub struct DefaultAssertionEvaluator<C: Cdp> {
    adapter: Arc<C>,
    frame_locator: FrameLocator<C>,
}

impl<C: Cdp> DefaultAssertionEvaluator<C> {
    pub fn new(adapter: Arc<C>) -> Self {
        let frame_locator = FrameLocator::new(adapter.clone());
        Self {
            adapter,
            frame_locator,
        }
    }

    async fn evaluate_one(
        &self,
        page: PageId,
        action: &Action,
        kind: &str,
        spec: &AssertionSpec,
    ) -> AssertionResult {
        let descriptor = action.element.as_ref();
        let outcome = match kind {
            "ValidEmail" => kinds::valid_email(descriptor).await,
            "formHasValue" => kinds::form_has_value(descriptor, &spec.value).await,
            "pageHasTitle" => kinds::page_has_title(self.adapter.as_ref(), page, &spec.value).await,
            "pageHasText" => kinds::page_has_text(self.adapter.as_ref(), page, &spec.value).await,
            "elementHasText" => kinds::element_has_text(descriptor, &spec.value).await,
            "elementIsVisible" => {
                kinds::element_is_visible(
                    self.adapter.as_ref(),
                    &self.frame_locator,
                    page,
                    action,
                    descriptor,
                )
                .await
            }
            "downloadStarted" => kinds::download_started(self.adapter.as_ref(), page).await,
            other => Err(format!("Unsupported assertion: {other}")),
        };

        match outcome {
            Ok(()) => AssertionResult {
                kind: kind.to_string(),
                message: format!("{kind} passed"),
                success: true,
            },
            Err(reason) => AssertionResult {
                kind: kind.to_string(),
                message: format!("Assertion failed: {reason}"),
                success: false,
            },
        }
    }
}

#[async_trait]
impl<C: Cdp> AssertionEvaluator for DefaultAssertionEvaluator<C> {
    async fn evaluate(&self, page: PageId, action: &Action) -> Vec<AssertionResult> {
        let mut results = Vec::with_capacity(action.assertions.len());
        for (kind, spec) in &action.assertions {
            let result = self.evaluate_one(page, action, kind, spec).await;
            let failed = !result.success;
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdp_adapter::adapter::CookieParam;
    use cdp_adapter::{AdapterError, Anchor, FileUpload, FrameInfo, MouseButton, ResolvedExecutionContext, SelectSpec};
    use serde_json::Value;
    use soulbrowser_core_types::{AssertionSpec, ElementDescriptor};
    use std::time::Duration;

    struct StubAdapter {
        title: &'static str,
        body_text: &'static str,
        download_started: bool,
    }

    #[async_trait]
    impl Cdp for StubAdapter {
        async fn navigate(&self, _page: PageId, _url: &str, _deadline: Duration) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn query(&self, _page: PageId, _spec: cdp_adapter::QuerySpec) -> Result<Vec<Anchor>, AdapterError> {
            Ok(vec![])
        }
        async fn click(&self, _page: PageId, _selector: &str, _deadline: Duration) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn click_in_context(
            &self,
            _ctx: &ResolvedExecutionContext,
            _selector: &str,
            _deadline: Duration,
        ) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn type_text(&self, _page: PageId, _selector: &str, _text: &str, _deadline: Duration) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn type_text_in_context(
            &self,
            _ctx: &ResolvedExecutionContext,
            _selector: &str,
            _text: &str,
            _deadline: Duration,
        ) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn select_option(&self, _page: PageId, _spec: SelectSpec, _deadline: Duration) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn evaluate_script(&self, _page: PageId, expression: &str) -> Result<Value, AdapterError> {
            if expression.contains("title") {
                Ok(Value::String(self.title.to_string()))
            } else {
                Ok(Value::String(self.body_text.to_string()))
            }
        }
        async fn evaluate_script_in_context(
            &self,
            _ctx: &ResolvedExecutionContext,
            _expression: &str,
        ) -> Result<Value, AdapterError> {
            Ok(Value::Bool(false))
        }
        async fn wait_basic(&self, _page: PageId, _gate: String, _timeout: Duration) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn screenshot(&self, _page: PageId, _deadline: Duration) -> Result<Vec<u8>, AdapterError> {
            Ok(vec![])
        }
        async fn grant_permissions(&self, _origin: &str, _permissions: &[String]) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn reset_permissions(&self, _origin: &str, _permissions: &[String]) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn set_cookies(&self, _page: PageId, _cookies: &[CookieParam]) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn set_user_agent(
            &self,
            _page: PageId,
            _user_agent: &str,
            _accept_language: Option<&str>,
            _platform: Option<&str>,
            _locale: Option<&str>,
        ) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn set_timezone(&self, _page: PageId, _timezone: &str) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn set_device_metrics(
            &self,
            _page: PageId,
            _width: u32,
            _height: u32,
            _device_scale_factor: f64,
            _mobile: bool,
        ) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn set_touch_emulation(&self, _page: PageId, _enabled: bool) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn set_network_tap(&self, _page: PageId, _enabled: bool) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn frames(&self, _page: PageId) -> Result<Vec<FrameInfo>, AdapterError> {
            Ok(vec![])
        }
        async fn set_input_files(
            &self,
            _ctx: &ResolvedExecutionContext,
            _selector: &str,
            _files: Vec<FileUpload>,
        ) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn mouse_move(&self, _page: PageId, _x: f64, _y: f64) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn mouse_down(
            &self,
            _page: PageId,
            _x: f64,
            _y: f64,
            _button: MouseButton,
        ) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn mouse_up(
            &self,
            _page: PageId,
            _x: f64,
            _y: f64,
            _button: MouseButton,
        ) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn key_press(&self, _page: PageId, _key: &str) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn wait_for_download(&self, _page: PageId, _timeout: Duration) -> Result<bool, AdapterError> {
            Ok(self.download_started)
        }
    }

    fn action_with(assertions: Vec<(&str, &str)>, element: Option<ElementDescriptor>) -> Action {
        Action {
            element,
            assertions: assertions
                .into_iter()
                .map(|(kind, value)| {
                    (
                        kind.to_string(),
                        AssertionSpec {
                            value: value.to_string(),
                        },
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let adapter = Arc::new(StubAdapter {
            title: "Yes",
            body_text: "irrelevant",
            download_started: false,
        });
        let evaluator = DefaultAssertionEvaluator::new(adapter);
        let action = action_with(
            vec![("pageHasTitle", "Nope"), ("pageHasText", "irrelevant")],
            None,
        );
        let results = evaluator.evaluate(PageId::new(), &action).await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(results[0].message.starts_with("Assertion failed: "));
    }

    #[tokio::test]
    async fn all_conditions_pass_in_declared_order() {
        let adapter = Arc::new(StubAdapter {
            title: "Yes",
            body_text: "Welcome to Example",
            download_started: false,
        });
        let evaluator = DefaultAssertionEvaluator::new(adapter);
        let action = action_with(
            vec![("pageHasTitle", "yes"), ("pageHasText", "Example")],
            None,
        );
        let results = evaluator.evaluate(PageId::new(), &action).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
    }

    #[tokio::test]
    async fn unknown_kind_fails_with_unsupported_message() {
        let adapter = Arc::new(StubAdapter {
            title: "Yes",
            body_text: "",
            download_started: false,
        });
        let evaluator = DefaultAssertionEvaluator::new(adapter);
        let action = action_with(vec![("somethingMadeUp", "x")], None);
        let results = evaluator.evaluate(PageId::new(), &action).await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert_eq!(
            results[0].message,
            "Assertion failed: Unsupported assertion: somethingMadeUp"
        );
    }

    #[tokio::test]
    async fn download_started_observes_stub_flag() {
        let adapter = Arc::new(StubAdapter {
            title: "",
            body_text: "",
            download_started: true,
        });
        let evaluator = DefaultAssertionEvaluator::new(adapter);
        let action = action_with(vec![("downloadStarted", "")], None);
        let results = evaluator.evaluate(PageId::new(), &action).await;
        assert!(results[0].success);
    }
}
