use anyhow::Result;
use clap::Parser;
use counter_api::{AppState, Config, CounterStore, app};
use tokio::{fs, net::TcpListener};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer as _,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    let _guard = init_tracing(&config);

    if let Some(parent) = config
        .counters_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).await?;
    }
    let store = CounterStore::new(config.counters_file.clone(), config.load_policy);
    info!(
        "Counters stored in {} (load policy: {:?})",
        store.path().display(),
        store.policy()
    );

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Counter API running on http://{addr}");
    axum::serve(listener, app(AppState::new(store)).into_make_service()).await?;
    Ok(())
}

// the returned guard flushes the file writer on drop
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let console = fmt::layer().with_filter(config.log_level);

    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "counter_api.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file = fmt::layer()
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(config.log_level);
            (Some(file), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}
