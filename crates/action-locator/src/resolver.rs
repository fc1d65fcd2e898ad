//! Element Resolver: resolves an `ElementDescriptor` to a working selector by
//! trying `uniqueSelector` first, then each `xpath` candidate in declared
//! order, within a bounded wait.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cdp_adapter::{Cdp, ResolvedExecutionContext};
use soulbrowser_core_types::ElementDescriptor;
use tokio::time::sleep;

use crate::errors::LocatorError;
use crate::types::{ResolutionStrategy, ResolvedElement};

/// Default wait for a single selector/xpath candidate.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(3);
/// Overall budget for `ensure_clickable`.
pub const ENSURE_CLICKABLE_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-candidate presence wait inside `ensure_clickable`.
const ENSURE_CLICKABLE_PRESENCE_TIMEOUT: Duration = Duration::from_secs(3);
/// Settle delay after `scroll_into_view`.
const SCROLL_SETTLE: Duration = Duration::from_millis(300);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resolves element descriptors against a running page via the CDP adapter.
pub struct ElementResolver<C: Cdp> {
    adapter: Arc<C>,
}

impl<C: Cdp> ElementResolver<C> {
    pub fn new(adapter: Arc<C>) -> Self {
        Self { adapter }
    }

    /// Tries `uniqueSelector` first; if found, returns it. Otherwise walks
    /// `xpath` in declared order and returns the first that resolves.
    /// Visibility is not required here — see [`Self::ensure_clickable`].
    pub async fn resolve(
        &self,
        ctx: &ResolvedExecutionContext,
        descriptor: &ElementDescriptor,
        timeout: Option<Duration>,
    ) -> Result<ResolvedElement, LocatorError> {
        let timeout = timeout.unwrap_or(DEFAULT_RESOLVE_TIMEOUT);

        if let Some(selector) = descriptor
            .unique_selector
            .as_deref()
            .filter(|s| !s.is_empty())
        {
            if self.wait_for_css(ctx, selector, timeout).await? {
                return Ok(ResolvedElement {
                    selector: selector.to_string(),
                    strategy: ResolutionStrategy::UniqueSelector,
                });
            }
        }

        let candidates = descriptor.xpath_list();
        if descriptor.unique_selector.is_none() && candidates.is_empty() {
            return Err(LocatorError::InvalidAnchor(
                "element descriptor has neither uniqueSelector nor xpath".to_string(),
            ));
        }

        for (index, xpath) in candidates.iter().enumerate() {
            if self.wait_for_xpath(ctx, xpath, timeout).await? {
                return Ok(ResolvedElement {
                    selector: xpath.clone(),
                    strategy: ResolutionStrategy::XPath(index),
                });
            }
        }

        Err(LocatorError::ElementNotFound(format!(
            "no uniqueSelector or xpath candidate resolved within {timeout:?}"
        )))
    }

    /// Iterates `xpath` candidates; for each, waits up to 3s for presence,
    /// then requires `offsetParent !== null`. Returns the first visible
    /// candidate's selector.
    pub async fn ensure_clickable(
        &self,
        ctx: &ResolvedExecutionContext,
        xpath_candidates: &[String],
    ) -> Result<String, LocatorError> {
        let deadline = Instant::now() + ENSURE_CLICKABLE_TIMEOUT;

        for xpath in xpath_candidates {
            if Instant::now() >= deadline {
                break;
            }
            if !self
                .wait_for_xpath(ctx, xpath, ENSURE_CLICKABLE_PRESENCE_TIMEOUT)
                .await?
            {
                continue;
            }
            if self.xpath_is_visible(ctx, xpath).await? {
                return Ok(xpath.clone());
            }
        }

        Err(LocatorError::ElementNotFound(format!(
            "no xpath candidate became visible within {ENSURE_CLICKABLE_TIMEOUT:?}"
        )))
    }

    /// Center-aligns the element (block and inline) via `scrollIntoView`;
    /// swallows evaluation errors, then waits out a brief settle delay.
    /// `is_xpath` must match how `selector` was produced (`resolve`'s
    /// `ResolutionStrategy` or `ensure_clickable`, which is always xpath)
    /// so the lookup uses the right DOM API.
    pub async fn scroll_into_view(
        &self,
        ctx: &ResolvedExecutionContext,
        selector: &str,
        is_xpath: bool,
    ) {
        let expression = format!(
            "(() => {{ try {{ const el = {lookup}; if (el) {{ el.scrollIntoView({{ block: 'center', inline: 'center' }}); }} }} catch (err) {{}} return null; }})()",
            lookup = lookup_expression(selector, is_xpath),
        );
        let _ = self
            .adapter
            .evaluate_script_in_context(ctx, &expression)
            .await;
        sleep(SCROLL_SETTLE).await;
    }

    async fn wait_for_css(
        &self,
        ctx: &ResolvedExecutionContext,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, LocatorError> {
        let deadline = Instant::now() + timeout;
        loop {
            let anchors = self
                .adapter
                .query(
                    ctx.page,
                    cdp_adapter::QuerySpec {
                        selector: selector.to_string(),
                        scope: ctx.query_scope(),
                    },
                )
                .await
                .map_err(|err| LocatorError::CdpError(err.to_string()))?;
            if !anchors.is_empty() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_xpath(
        &self,
        ctx: &ResolvedExecutionContext,
        xpath: &str,
        timeout: Duration,
    ) -> Result<bool, LocatorError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.xpath_exists(ctx, xpath).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn xpath_exists(
        &self,
        ctx: &ResolvedExecutionContext,
        xpath: &str,
    ) -> Result<bool, LocatorError> {
        let expression = format!(
            "(() => {{ const el = {lookup}; return el !== null && el !== undefined; }})()",
            lookup = xpath_lookup_expression(xpath),
        );
        let value = self
            .adapter
            .evaluate_script_in_context(ctx, &expression)
            .await
            .map_err(|err| LocatorError::CdpError(err.to_string()))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn xpath_is_visible(
        &self,
        ctx: &ResolvedExecutionContext,
        xpath: &str,
    ) -> Result<bool, LocatorError> {
        let expression = format!(
            "(() => {{ const el = {lookup}; return !!(el && el.offsetParent !== null); }})()",
            lookup = xpath_lookup_expression(xpath),
        );
        let value = self
            .adapter
            .evaluate_script_in_context(ctx, &expression)
            .await
            .map_err(|err| LocatorError::CdpError(err.to_string()))?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

fn xpath_lookup_expression(xpath: &str) -> String {
    let literal = serde_json::to_string(xpath).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "document.evaluate({literal}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
    )
}

fn element_lookup_expression(selector: &str) -> String {
    let literal = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    format!("document.querySelector({literal})")
}

/// Builds the DOM lookup expression for a previously-resolved selector,
/// shared with callers (the Action Interpreter) that need to re-locate the
/// same element for a follow-up operation.
pub fn lookup_expression(selector: &str, is_xpath: bool) -> String {
    if is_xpath {
        xpath_lookup_expression(selector)
    } else {
        element_lookup_expression(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cdp_adapter::adapter::CookieParam;
    use cdp_adapter::{AdapterError, Anchor, FileUpload, FrameInfo, MouseButton, PageId, SelectSpec};
    use serde_json::Value;

    struct StubAdapter {
        css_found: bool,
        xpath_found_for: Option<&'static str>,
        visible: bool,
    }

    #[async_trait]
    impl Cdp for StubAdapter {
        async fn navigate(&self, _page: PageId, _url: &str, _deadline: Duration) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn query(&self, _page: PageId, _spec: cdp_adapter::QuerySpec) -> Result<Vec<Anchor>, AdapterError> {
            if self.css_found {
                Ok(vec![Anchor { backend_node_id: None, x: 1.0, y: 1.0 }])
            } else {
                Ok(vec![])
            }
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
        async fn evaluate_script(&self, _page: PageId, _expression: &str) -> Result<Value, AdapterError> {
            Ok(Value::Null)
        }
        async fn evaluate_script_in_context(
            &self,
            _ctx: &ResolvedExecutionContext,
            expression: &str,
        ) -> Result<Value, AdapterError> {
            if expression.contains("offsetParent") {
                return Ok(Value::Bool(self.visible));
            }
            if let Some(target) = self.xpath_found_for {
                Ok(Value::Bool(expression.contains(target)))
            } else {
                Ok(Value::Bool(false))
            }
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
            Ok(false)
        }
    }

    fn ctx() -> ResolvedExecutionContext {
        ResolvedExecutionContext::for_page(PageId::new())
    }

    fn descriptor(unique_selector: Option<&str>, xpath: Option<soulbrowser_core_types::XPathSpec>) -> ElementDescriptor {
        ElementDescriptor {
            unique_selector: unique_selector.map(str::to_string),
            xpath,
            is_alert: None,
            value: None,
            text_content: None,
        }
    }

    #[tokio::test]
    async fn unique_selector_wins_over_xpath() {
        let adapter = Arc::new(StubAdapter { css_found: true, xpath_found_for: None, visible: true });
        let resolver = ElementResolver::new(adapter);
        let d = descriptor(Some("#q"), Some(soulbrowser_core_types::XPathSpec::Single("//div".to_string())));
        let resolved = resolver.resolve(&ctx(), &d, Some(Duration::from_millis(50))).await.unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::UniqueSelector);
        assert_eq!(resolved.selector, "#q");
    }

    #[tokio::test]
    async fn falls_back_to_second_xpath_candidate() {
        let adapter = Arc::new(StubAdapter { css_found: false, xpath_found_for: Some("//b"), visible: true });
        let resolver = ElementResolver::new(adapter);
        let d = descriptor(
            None,
            Some(soulbrowser_core_types::XPathSpec::List(vec!["//a".to_string(), "//b".to_string()])),
        );
        let resolved = resolver.resolve(&ctx(), &d, Some(Duration::from_millis(50))).await.unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::XPath(1));
        assert_eq!(resolved.selector, "//b");
    }

    #[tokio::test]
    async fn not_found_when_nothing_resolves() {
        let adapter = Arc::new(StubAdapter { css_found: false, xpath_found_for: None, visible: false });
        let resolver = ElementResolver::new(adapter);
        let d = descriptor(Some("#missing"), Some(soulbrowser_core_types::XPathSpec::Single("//missing".to_string())));
        let err = resolver
            .resolve(&ctx(), &d, Some(Duration::from_millis(20)))
            .await
            .unwrap_err();
        assert!(matches!(err, LocatorError::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn ensure_clickable_skips_invisible_candidates() {
        let adapter = Arc::new(StubAdapter { css_found: false, xpath_found_for: Some("//b"), visible: true });
        let resolver = ElementResolver::new(adapter);
        let candidates = vec!["//a".to_string(), "//b".to_string()];
        let selector = resolver.ensure_clickable(&ctx(), &candidates).await.unwrap();
        assert_eq!(selector, "//b");
    }
}
