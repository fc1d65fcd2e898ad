use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::http::Request;
use clap::Parser;
use soulbrowser::config::{LogFormat, ServiceConfig};
use soulbrowser::healthz::{self, Readiness};
use soulbrowser::wiring;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};
use uuid::Uuid;

/// Process-level flags; each overrides the corresponding environment value
/// when set (§3 Configuration).
#[derive(Parser, Debug)]
#[command(name = "soulbrowser", version, about = "UI test execution service")]
struct Cli {
    /// HTTP listen port, overriding PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Path to the Chrome/Chromium executable, overriding SOULBROWSER_CHROME.
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Force headless (true) or headful (false), overriding SOUL_HEADLESS.
    #[arg(long)]
    headless: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load().context("loading service configuration")?;
    config.apply_cli(cli.port, cli.chrome_path, cli.headless);
    init_tracing(config.log_format);

    let service = wiring::build(&config);
    let readiness = Readiness::default();

    let adapter_for_start = service.adapter.clone();
    let readiness_for_start = readiness.clone();
    tokio::spawn(async move {
        if let Err(err) = adapter_for_start.start().await {
            tracing::error!(%err, "CDP adapter failed to start");
            return;
        }
        readiness_for_start.mark_ready();
        info!("CDP adapter transport started");
    });

    let api_router = http_api::RunAutomationApi::new(service.orchestrator.clone())
        .build()
        .merge(healthz::router(readiness))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;
    info!(%addr, "soulbrowser listening");

    let shutdown_adapter = service.adapter.clone();
    axum::serve(listener, api_router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(shutdown_adapter))
        .await
        .context("serving HTTP API")?;

    Ok(())
}

async fn shutdown_signal(adapter: Arc<cdp_adapter::CdpAdapter>) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received, cancelling in-flight work");
    adapter.cancel_token().cancel();
    adapter.shutdown().await;
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}
