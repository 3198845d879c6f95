//! replivault - Clustered MySQL Backup Daemon
//!
//! This is the composition root that wires together all the components.

use anyhow::Context;
use replivault::adapters::outbound::{
    MysqlshRunner, RouterDiscovery, S3ObjectStore, S3StoreConfig, TelegramAlerter,
};
use replivault::domain::ports::Alerter;
use replivault::{
    shutdown_signal, ArchiveStore, BackupPipeline, Config, RemoteSync, RetentionPolicy, Scheduler,
    ShutdownController,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from the path given as the first argument
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());
    let cfg = Config::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;

    // Setup logging: stderr by default, append to a file when configured
    match &cfg.log {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::INFO)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::INFO)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    tracing::info!(
        "starting replivault cluster={} interval={} retention={}",
        cfg.cluster_name,
        humantime::format_duration(cfg.backup.interval),
        cfg.backup.max_backup_files
    );

    // ===== COMPOSITION ROOT =====
    // Wire up all adapters and services

    // 1. Create outbound adapters

    let discovery = Arc::new(RouterDiscovery::new(
        &cfg.router.addr,
        &cfg.cluster_name,
        &cfg.router.basic_auth.user,
        &cfg.router.basic_auth.password,
    ));
    tracing::info!("router discovery endpoint: {}", discovery.url());

    let dump_runner = Arc::new(MysqlshRunner::new(
        &cfg.backup.dump_tool,
        &cfg.backup_user.user,
        &cfg.backup_user.password,
        &cfg.directories.dump,
        &cfg.directories.script,
    ));

    let object_store = Arc::new(
        S3ObjectStore::new(S3StoreConfig {
            endpoint: cfg.s3.endpoint.clone(),
            region: cfg.s3.region.clone(),
            access_key: cfg.s3.access_key.clone(),
            secret_key: cfg.s3.secret_key.clone(),
            bucket: cfg.s3.bucket.clone(),
            use_ssl: cfg.s3.use_ssl,
        })
        .context("configuring object store client")?,
    );

    let alerter: Option<Arc<dyn Alerter>> = if cfg.alerts.telegram.enabled {
        tracing::info!("telegram alerts enabled for chat {}", cfg.alerts.telegram.chat_id);
        Some(Arc::new(TelegramAlerter::new(
            cfg.alerts.telegram.bot_token.clone(),
            cfg.alerts.telegram.chat_id,
        )))
    } else {
        None
    };

    // 2. Create application services

    let archive = ArchiveStore::new(&cfg.directories.dump, &cfg.directories.backups);
    let remote = RemoteSync::new(object_store, cfg.s3.bucket.clone());
    let pipeline = BackupPipeline::new(
        discovery,
        dump_runner,
        archive,
        remote,
        RetentionPolicy::new(cfg.backup.max_backup_files),
    );

    // 3. Run the scheduler until a shutdown signal arrives

    let shutdown = ShutdownController::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let scheduler = Scheduler::new(
        pipeline,
        cfg.backup.interval,
        alerter,
        cfg.alerts.telegram.parse_mode.clone(),
        shutdown,
    );
    scheduler.run().await;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
