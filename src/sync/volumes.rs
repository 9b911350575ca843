// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pairing of source and target volumes and the rsync copies between them

use crate::claims::{bound_volume_name, ClaimIndex};
use crate::constants::programs;
use crate::error::{MigrateError, Result};
use crate::exec::{CommandLine, CommandRunner};
use std::path::{Path, MAIN_SEPARATOR};
use tracing::{info, instrument};

/// Source and target volume directories of one matched claim.
///
/// Both paths end in a separator so rsync copies the directory contents
/// rather than the directory itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPair {
    pub key: String,
    pub source: String,
    pub target: String,
}

/// Every source claim resolved against the target
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TransferPlan {
    /// Pairs with both volumes bound, in key order
    pub pairs: Vec<DirectoryPair>,
    /// Keys skipped because one side is not bound yet
    pub pending: Vec<String>,
}

/// Keys copied and skipped by a sync run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub transferred: Vec<String>,
    pub pending: Vec<String>,
}

fn volume_dir(mount: &Path, volume: &str) -> String {
    format!("{}{}", mount.join(volume).display(), MAIN_SEPARATOR)
}

/// Pair every source claim with its target by key.
///
/// A source claim without a target counterpart fails the whole plan, before
/// any copy has started.
pub fn plan_transfers(
    source: &ClaimIndex,
    target: &ClaimIndex,
    source_mount: &Path,
    target_mount: &Path,
) -> Result<TransferPlan> {
    let mut plan = TransferPlan::default();

    for (key, source_claim) in source.iter() {
        let target_claim = target
            .get(key)
            .ok_or_else(|| MigrateError::ClaimNotFound(key.to_string()))?;

        let source_volume = bound_volume_name(source_claim);
        let target_volume = bound_volume_name(target_claim);
        if source_volume.is_empty() || target_volume.is_empty() {
            info!("skipping pvc, volume not yet ready: {}", key);
            plan.pending.push(key.to_string());
            continue;
        }

        plan.pairs.push(DirectoryPair {
            key: key.to_string(),
            source: volume_dir(source_mount, source_volume),
            target: volume_dir(target_mount, target_volume),
        });
    }

    Ok(plan)
}

/// Copies volume directories with rsync
pub struct VolumeSyncer<'a> {
    runner: &'a dyn CommandRunner,
    rsync_args: Vec<String>,
    dry_run: bool,
}

impl<'a> VolumeSyncer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, rsync_args: Vec<String>, dry_run: bool) -> Self {
        Self {
            runner,
            rsync_args,
            dry_run,
        }
    }

    /// Run one rsync per pair, stopping at the first failure
    #[instrument(skip_all, fields(pairs = plan.pairs.len()))]
    pub async fn sync(&self, plan: TransferPlan) -> Result<SyncReport> {
        info!("rsyncing dirs...");
        let mut report = SyncReport {
            pending: plan.pending,
            ..Default::default()
        };

        for pair in plan.pairs {
            let command = CommandLine::new(programs::RSYNC)
                .args(self.rsync_args.iter().cloned())
                .arg(pair.source.as_str())
                .arg(pair.target.as_str());

            info!("{}", command);
            if !self.dry_run {
                self.runner.run(&command).await?;
            }
            report.transferred.push(pair.key);
        }

        Ok(report)
    }
}
