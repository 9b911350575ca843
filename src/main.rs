// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, info_span, Instrument, Level, Span};
use tracing_subscriber::EnvFilter;

use pvc_migrate::config::{Cli, Config};
use pvc_migrate::exec::ProcessRunner;
use pvc_migrate::kubernetes::{create_client_for_context, kubeconfig_path, KubeCluster};
use pvc_migrate::sync::MigrationManager;

#[tokio::main]
async fn main() {
    let config = Config::from(Cli::parse());
    init_tracing(&config);

    let span = if config.dry_run {
        info_span!("dry_run")
    } else {
        Span::none()
    };

    if let Err(e) = run(config).instrument(span).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    let level = if config.quiet { Level::WARN } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(config: Config) -> Result<()> {
    info!("start");

    let kubeconfig = kubeconfig_path(config.kubeconfig.as_deref())?;

    let source_client = create_client_for_context(&kubeconfig, &config.source.context)
        .await
        .context("Couldn't connect to the source cluster")?;
    info!("Source context '{}' loaded successfully", config.source.context);

    let target_client = create_client_for_context(&kubeconfig, &config.target.context)
        .await
        .context("Couldn't connect to the target cluster")?;
    info!("Target context '{}' loaded successfully", config.target.context);

    let source = KubeCluster::new(source_client, config.source.context.clone());
    let target = KubeCluster::new(target_client, config.target.context.clone());

    let summary = MigrationManager::new(source, target, ProcessRunner, config)
        .run()
        .await
        .context("Migration failed")?;

    info!(
        "end: {} pvcs created in {} attempts, {} volumes synced",
        summary.created,
        summary.attempts,
        summary.sync.transferred.len()
    );
    Ok(())
}
