use std::sync::Arc;
use anyhow::Context;
use privates::approval::HttpApprovalService;
use privates::net::WebhookServer;
use privates::storage::JsonZoneStore;
use privates::{PrivatesConfig, ZoneRegistry};
use tokio_util::sync::CancellationToken;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PrivatesConfig::from_env().context("invalid configuration")?;

    // Worker threads double as the webhook request pool.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.webhook_workers)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(serve(config))
}

async fn serve(config: PrivatesConfig) -> anyhow::Result<()> {
    let store = Arc::new(JsonZoneStore::new(config.data_dir.clone()));
    let approval = Arc::new(HttpApprovalService::from_config(&config).context("failed to build approval client")?);
    let registry = Arc::new(ZoneRegistry::open(store, approval));
    log::info!("Loaded {} zones from {}", registry.len(), config.data_dir.display());

    if config.backup_on_start {
        if let Some(path) = registry.backup() {
            log::info!("Backed up zones to {}", path.display());
        }
    }

    let server = WebhookServer::bind(config.webhook_addr, registry, config.webhook_wait)
        .await
        .with_context(|| format!("failed to bind webhook on {}", config.webhook_addr))?;

    let shutdown = CancellationToken::new();
    let server_task = tokio::spawn(server.run(shutdown.clone()));

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    log::info!("Shutting down");
    shutdown.cancel();
    server_task.await.context("webhook server task failed")?;

    Ok(())
}
