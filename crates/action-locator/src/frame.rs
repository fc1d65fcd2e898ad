//! Frame Locator (spec §4.2): resolves an action's target frame — the top
//! page, or a child iframe matched by origin + normalized path against the
//! recorded `iframeIdentifier.src`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cdp_adapter::{Cdp, FrameInfo, PageId, ResolvedExecutionContext};
use soulbrowser_core_types::Action;
use tokio::time::sleep;
use url::Url;

use crate::errors::LocatorError;

/// Overall budget for locating a matching frame.
pub const FRAME_LOCATE_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Finds the frame an action targets.
pub struct FrameLocator<C: Cdp> {
    adapter: Arc<C>,
}

impl<C: Cdp> FrameLocator<C> {
    pub fn new(adapter: Arc<C>) -> Self {
        Self { adapter }
    }

    /// If the action targets the top frame (the default) or carries no
    /// `iframeIdentifier.src`, returns the top-page context. Otherwise polls
    /// `Page.getFrameTree` every 500ms up to 30s for a frame whose URL shares
    /// origin and normalized path with the recorded `src`.
    pub async fn locate(
        &self,
        page: PageId,
        action: &Action,
    ) -> Result<ResolvedExecutionContext, LocatorError> {
        if action.is_top_frame() {
            return Ok(ResolvedExecutionContext::for_page(page));
        }

        let Some(target) = action.iframe_identifier.as_ref().map(|id| id.src.as_str()) else {
            return Ok(ResolvedExecutionContext::for_page(page));
        };

        let deadline = Instant::now() + FRAME_LOCATE_TIMEOUT;
        loop {
            let frames = self
                .adapter
                .frames(page)
                .await
                .map_err(|err| LocatorError::CdpError(err.to_string()))?;

            if let Some(frame) = find_matching_frame(&frames, target) {
                return Ok(ResolvedExecutionContext::with_frame(
                    page,
                    Some(frame.frame_id.clone()),
                ));
            }

            if Instant::now() >= deadline {
                return Err(LocatorError::FrameNotFound(format!(
                    "no frame matched iframeIdentifier.src={target:?} within {FRAME_LOCATE_TIMEOUT:?}"
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

fn find_matching_frame<'a>(frames: &'a [FrameInfo], target: &str) -> Option<&'a FrameInfo> {
    let target_url = Url::parse(target).ok()?;
    let target_origin = target_url.origin().ascii_serialization();
    let target_path = normalize_path(target_url.path());

    frames.iter().find(|frame| {
        let Ok(candidate) = Url::parse(&frame.url) else {
            return false;
        };
        candidate.origin().ascii_serialization() == target_origin
            && normalize_path(candidate.path()) == target_path
    })
}

/// Splits a path on `/`, drops empty segments, and drops any segment that
/// looks like a generated id: all-decimal-digit, UUID-shaped (with or
/// without hyphens), or a 24-hex-character Mongo ObjectId. This keeps
/// `/users/42/profile` and `/users/7/profile` matching the same recorded
/// frame while still distinguishing genuinely different routes.
fn normalize_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !is_id_like(segment))
        .map(|segment| segment.to_ascii_lowercase())
        .collect()
}

fn is_id_like(segment: &str) -> bool {
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    let hex_only: String = segment.chars().filter(|c| *c != '-').collect();
    if hex_only.len() == 32 && hex_only.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }

    if segment.len() == 24 && segment.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }

    false
}
