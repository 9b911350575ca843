// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Central coordinator for migrating claims and their data between clusters.

use crate::claims::{index_claims, ClaimIndex, ClaimSelector};
use crate::config::{ClusterConfig, Config};
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::kubernetes::{filesystem_id, ClaimStore};
use crate::mount::{MountPoint, Side, VolumeMounter};
use crate::reconcilers::ClaimReconciler;
use crate::sync::volumes::{plan_transfers, SyncReport, VolumeSyncer};
use tracing::{info, instrument};

/// What a migration run did
#[derive(Debug)]
pub struct MigrationSummary {
    pub source_claims: usize,
    pub target_claims: usize,
    pub created: usize,
    pub attempts: u32,
    pub source_mount: MountPoint,
    pub target_mount: MountPoint,
    pub sync: SyncReport,
}

/// Drives one migration from a source cluster to a target cluster.
///
/// Steps run strictly one after another; the first failure ends the run and
/// anything already created, mounted or copied is left in place.
pub struct MigrationManager<S, T, R> {
    source: S,
    target: T,
    runner: R,
    config: Config,
}

impl<S, T, R> MigrationManager<S, T, R>
where
    S: ClaimStore,
    T: ClaimStore,
    R: CommandRunner,
{
    pub fn new(source: S, target: T, runner: R, config: Config) -> Self {
        Self {
            source,
            target,
            runner,
            config,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<MigrationSummary> {
        let config = &self.config;
        let source_selector = self.selector(&config.source)?;
        let target_selector = self.selector(&config.target)?;

        let source_filesystem = self.resolve_filesystem_id(&self.source, &config.source, Side::Source).await?;
        let target_filesystem = self.resolve_filesystem_id(&self.target, &config.target, Side::Target).await?;

        let source_claims = index_claims(&self.source, &source_selector).await?;
        info!(
            "There are {} pvcs in the source cluster that match selection",
            source_claims.len()
        );
        let target_claims = index_claims(&self.target, &target_selector).await?;
        info!(
            "There are {} pvcs in the target cluster that match selection",
            target_claims.len()
        );

        let mounter = VolumeMounter::new(
            &self.runner,
            config.mount_root.clone(),
            config.mount_args.clone(),
            config.dry_run,
        );
        let source_mount = mounter
            .mount(Side::Source, &source_filesystem, &config.source.filesystem_dns)
            .await?;
        let target_mount = mounter
            .mount(Side::Target, &target_filesystem, &config.target.filesystem_dns)
            .await?;

        let reconciler = ClaimReconciler::new(
            &self.target,
            &target_selector,
            config.poll_interval,
            config.dry_run,
        );
        let reconciliation = reconciler.reconcile(&source_claims, target_claims).await?;

        // Claims only created as a dry-run have no target counterpart yet
        let syncable: ClaimIndex = source_claims
            .iter()
            .filter(|(key, _)| !reconciliation.simulated.iter().any(|s| s == *key))
            .map(|(_, claim)| claim.clone())
            .collect();

        let plan = plan_transfers(
            &syncable,
            &reconciliation.target,
            &source_mount.local_path,
            &target_mount.local_path,
        )?;
        let syncer = VolumeSyncer::new(&self.runner, config.rsync_args.clone(), config.dry_run);
        let mut sync = syncer.sync(plan).await?;
        sync.pending.extend(reconciliation.simulated);

        info!(
            "{} volumes synced, {} not yet ready",
            sync.transferred.len(),
            sync.pending.len()
        );

        Ok(MigrationSummary {
            source_claims: source_claims.len(),
            target_claims: reconciliation.target.len(),
            created: reconciliation.created,
            attempts: reconciliation.attempts,
            source_mount,
            target_mount,
            sync,
        })
    }

    fn selector(&self, cluster: &ClusterConfig) -> Result<ClaimSelector> {
        ClaimSelector::new(
            &cluster.storage_class,
            &self.config.namespace_pattern,
            &self.config.name_pattern,
        )
    }

    async fn resolve_filesystem_id(
        &self,
        store: &dyn ClaimStore,
        cluster: &ClusterConfig,
        side: Side,
    ) -> Result<String> {
        let parameters = store.storage_class_parameters(&cluster.storage_class).await?;
        let id = filesystem_id(&cluster.storage_class, &parameters)?;
        info!("StorageClass {} fileSystemId: {}", side, id);
        Ok(id)
    }
}
