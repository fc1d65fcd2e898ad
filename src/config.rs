//! Process configuration (§3 Configuration): `config` + `dirs` layered over
//! environment variables, the same shape `cdp_adapter::CdpConfig` already
//! uses for its own knobs.

use std::path::PathBuf;

use cdp_adapter::CdpConfig;
use soulbrowser_core_types::BrowserName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub default_browser: BrowserName,
    pub log_format: LogFormat,
    pub cdp: CdpConfig,
}

impl ServiceConfig {
    /// Reads `PORT`, `RUN_AUTOMATION_DEFAULT_BROWSER` and `LOG_FORMAT`
    /// through a `config::Config` environment source, merging an optional
    /// `soulbrowser.toml` under the OS config directory first. The already
    /// established `SOULBROWSER_*`/`SOUL_*` knobs (chrome path, headless,
    /// profile dir) are left to `CdpConfig::default` to read for itself;
    /// only `SOULBROWSER_WS_URL`, which `CdpConfig` does not read on its
    /// own, is layered on top here.
    pub fn load() -> Result<Self, config::ConfigError> {
        let source = config::Config::builder()
            .add_source(config::File::from(Self::config_file_path()).required(false))
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let port = source
            .get_int("port")
            .ok()
            .and_then(|value| u16::try_from(value).ok())
            .unwrap_or(3000);

        let default_browser = source
            .get_string("run_automation_default_browser")
            .ok()
            .and_then(|value| parse_browser_name(&value))
            .unwrap_or(BrowserName::Chromium);

        let log_format = source
            .get_string("log_format")
            .ok()
            .map(|value| LogFormat::from_str(&value))
            .unwrap_or(LogFormat::Pretty);

        let mut cdp = CdpConfig::default();
        if let Ok(ws_url) = std::env::var("SOULBROWSER_WS_URL") {
            let trimmed = ws_url.trim();
            if !trimmed.is_empty() {
                cdp.websocket_url = Some(trimmed.to_string());
            }
        }

        Ok(Self {
            port,
            default_browser,
            log_format,
            cdp,
        })
    }

    fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("soulbrowser")
            .join("soulbrowser.toml")
    }

    /// CLI flags always win over the environment/file-derived configuration.
    pub fn apply_cli(&mut self, port: Option<u16>, chrome_path: Option<PathBuf>, headless: Option<bool>) {
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(path) = chrome_path {
            self.cdp.executable = path;
        }
        if let Some(headless) = headless {
            self.cdp.headless = headless;
        }
    }
}

fn parse_browser_name(value: &str) -> Option<BrowserName> {
    match value.to_ascii_lowercase().as_str() {
        "chromium" | "chrome" => Some(BrowserName::Chromium),
        "firefox" => Some(BrowserName::Firefox),
        "webkit" | "safari" => Some(BrowserName::Webkit),
        _ => None,
    }
}
