use anyhow::{Context, Result};
use chrono::Utc;
use otsentry_ai::{OllamaProvider, OtClassifier, TextCompletion};
use otsentry_feed::{FetchWindow, NvdClient, SeenCache};
use otsentry_report::ReportStore;
use otsentry_server::app;
use otsentry_server::config::ServerConfig;
use otsentry_server::cycle::CycleRunner;
use otsentry_server::scheduler::CycleScheduler;
use otsentry_server::state::AppState;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  otsentry-server [config.toml]                                  Start the agent daemon");
    eprintln!("  otsentry-server run-once [config.toml] [--fallback] [--model <name>]");
    eprintln!("                                                                 Execute a single cycle and exit");
    eprintln!();
    eprintln!("  --fallback        Fetch CVEs from the last N days instead of the last N minutes (testing)");
    eprintln!("  --model <name>    Override the configured Ollama model for this run");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("otsentry=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("run-once") => {
            let mut config_path: Option<&str> = None;
            let mut use_fallback = false;
            let mut model_override: Option<String> = None;

            let mut rest = args[2..].iter();
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--fallback" => use_fallback = true,
                    "--model" => {
                        let name = rest.next().ok_or_else(|| {
                            print_usage();
                            anyhow::anyhow!("--model requires a value")
                        })?;
                        model_override = Some(name.clone());
                    }
                    other => config_path = Some(other),
                }
            }

            run_once(
                config_path.unwrap_or(DEFAULT_CONFIG_PATH),
                use_fallback,
                model_override,
            )
            .await
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args
                .get(1)
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_CONFIG_PATH);
            run_server(config_path).await
        }
    }
}

/// 配置文件存在则加载，否则使用内置默认值。
fn load_config(config_path: &str) -> Result<ServerConfig> {
    if Path::new(config_path).exists() {
        ServerConfig::load(config_path)
            .with_context(|| format!("Failed to load config '{config_path}'"))
    } else {
        tracing::warn!(path = %config_path, "Config file not found, using built-in defaults");
        Ok(ServerConfig::default())
    }
}

/// 按配置组装完整流水线。
fn build_runner(config: &ServerConfig, window: FetchWindow) -> Result<CycleRunner> {
    let api_key = config.fetch.resolve_api_key();
    if api_key.is_none() {
        tracing::warn!(
            "NVD API key not configured (config or NVD_API_KEY env). Stricter upstream rate limits will apply."
        );
    }

    let nvd = NvdClient::new(api_key).context("Failed to build NVD client")?;

    let provider = OllamaProvider::new(config.ai.base_url.clone(), config.ai.model.clone())
        .context("Failed to build Ollama provider")?;

    tracing::info!(
        provider = provider.provider(),
        model = provider.model_name(),
        "Completion provider ready"
    );

    let classifier = OtClassifier::new(Arc::new(provider)).with_retry_policy(
        config.ai.max_attempts,
        Duration::from_secs(config.ai.attempt_timeout_secs),
    );

    let cache = SeenCache::load(config.cache_path());
    let store = ReportStore::new(config.report_path());

    Ok(CycleRunner::new(nvd, classifier, store, cache, window))
}

/// 单周期模式：执行一轮后退出（报告写失败时以错误退出码结束）。
async fn run_once(
    config_path: &str,
    use_fallback: bool,
    model_override: Option<String>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(model) = model_override {
        config.ai.model = Some(model);
    }

    let window = if use_fallback {
        FetchWindow::Days {
            days: config.fetch.fallback_days,
            max_results: config.fetch.fallback_max_results,
        }
    } else {
        FetchWindow::Minutes(config.fetch.window_minutes)
    };

    let mut runner = build_runner(&config, window)?;
    let outcome = runner.run_cycle().await?;

    tracing::info!(
        fetched = outcome.fetched,
        relevant = outcome.relevant,
        report_written = outcome.report_written,
        "Run-once cycle finished"
    );
    Ok(())
}

/// 常驻模式：固定间隔调度 + 可选只读仪表盘 API。
async fn run_server(config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;

    tracing::info!(
        http_port = config.http_port,
        data_dir = %config.data_dir,
        interval_minutes = config.cycle.interval_minutes,
        window_minutes = config.fetch.window_minutes,
        "otsentry-server starting"
    );

    let window = FetchWindow::Minutes(config.fetch.window_minutes);
    let runner = build_runner(&config, window)?;
    let scheduler = CycleScheduler::new(
        runner,
        Duration::from_secs(config.cycle.interval_minutes * 60),
    );
    let scheduler_handle = tokio::spawn(scheduler.run());

    if config.dashboard_enabled {
        let state = AppState {
            store: Arc::new(ReportStore::new(config.report_path())),
            start_time: Utc::now(),
            config: Arc::new(config.clone()),
        };

        let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
        let app = app::build_http_app(state);
        let listener = tokio::net::TcpListener::bind(http_addr).await?;
        tracing::info!(http = %http_addr, "Dashboard API started");

        tokio::select! {
            result = axum::serve(listener, app).with_graceful_shutdown(async { signal::ctrl_c().await.ok(); }) => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "HTTP server error");
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Shutting down gracefully");
            }
        }
        scheduler_handle.abort();
    } else {
        tracing::info!("Dashboard API disabled");
        let _ = scheduler_handle.await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
