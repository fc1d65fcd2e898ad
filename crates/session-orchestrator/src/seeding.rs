//! Storage seeding for OTP logins (spec §4.7 point 2): before any test case
//! runs, the chosen storage is populated from `otp.object`, a flat
//! string-keyed map (or a JSON-encoded string of one).

use cdp_adapter::adapter::CookieParam;
use cdp_adapter::{Cdp, CdpAdapter, PageId};
use soulbrowser_core_types::{OtpSpec, OtpStorageType};

use crate::errors::OrchestratorError;

pub async fn seed_otp_storage(
    adapter: &CdpAdapter,
    page: PageId,
    otp: &OtpSpec,
) -> Result<(), OrchestratorError> {
    let entries = otp.object_as_map();
    if entries.is_empty() {
        return Ok(());
    }

    match otp.storage_type {
        OtpStorageType::LocalStorage => seed_web_storage(adapter, page, "localStorage", &entries).await,
        OtpStorageType::SessionStorage => {
            seed_web_storage(adapter, page, "sessionStorage", &entries).await
        }
        OtpStorageType::Cookies => seed_cookies(adapter, page, &entries).await,
    }
}

async fn seed_web_storage(
    adapter: &CdpAdapter,
    page: PageId,
    storage: &str,
    entries: &[(String, String)],
) -> Result<(), OrchestratorError> {
    let payload = serde_json::to_string(
        &entries
            .iter()
            .cloned()
            .collect::<std::collections::BTreeMap<_, _>>(),
    )
    .unwrap_or_else(|_| "{}".to_string());
    let expression = format!(
        "(() => {{ const entries = {payload}; for (const k in entries) {{ window.{storage}.setItem(k, entries[k]); }} return true; }})()"
    );
    adapter.evaluate_script(page, &expression).await?;
    Ok(())
}

async fn seed_cookies(
    adapter: &CdpAdapter,
    page: PageId,
    entries: &[(String, String)],
) -> Result<(), OrchestratorError> {
    let hostname = current_hostname(adapter, page).await?;
    let cookies: Vec<CookieParam> = entries
        .iter()
        .map(|(name, value)| CookieParam {
            name: name.clone(),
            value: value.clone(),
            domain: Some(hostname.clone()),
            path: Some("/".to_string()),
            url: None,
            expires: None,
            http_only: None,
            secure: None,
            same_site: None,
        })
        .collect();
    adapter.set_cookies(page, &cookies).await?;
    Ok(())
}

async fn current_hostname(adapter: &CdpAdapter, page: PageId) -> Result<String, OrchestratorError> {
    let value = adapter
        .evaluate_script(page, "window.location.hostname")
        .await?;
    Ok(value.as_str().unwrap_or_default().to_string())
}
