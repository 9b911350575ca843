// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Local mount points for each cluster's network filesystem

use crate::constants::programs;
use crate::error::{MigrateError, Result};
use crate::exec::{CommandLine, CommandRunner};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Which cluster a mount belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn prefix(&self) -> &'static str {
        match self {
            Side::Source => "source-",
            Side::Target => "target-",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// A filesystem root mounted on a local directory. Never unmounted by this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub side: Side,
    pub local_path: PathBuf,
    pub remote: String,
}

/// Local directory a filesystem is mounted on: `<root>/<prefix><filesystem id>`
pub fn mount_path(root: &Path, side: Side, filesystem_id: &str) -> PathBuf {
    root.join(format!("{}{}", side.prefix(), filesystem_id))
}

/// Mounts filesystem roots through the external `mount` program
pub struct VolumeMounter<'a> {
    runner: &'a dyn CommandRunner,
    root: PathBuf,
    mount_args: Vec<String>,
    dry_run: bool,
}

impl<'a> VolumeMounter<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        root: impl Into<PathBuf>,
        mount_args: Vec<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            runner,
            root: root.into(),
            mount_args,
            dry_run,
        }
    }

    /// Create the mount directory and mount `<dns_name>:/` on it.
    ///
    /// Under dry-run both steps are only logged.
    pub async fn mount(&self, side: Side, filesystem_id: &str, dns_name: &str) -> Result<MountPoint> {
        let local_path = mount_path(&self.root, side, filesystem_id);
        let remote = format!("{}:/", dns_name);

        info!("creating dir {}...", local_path.display());
        if self.dry_run {
            info!("mkdir -p {}", local_path.display());
        } else {
            tokio::fs::create_dir_all(&local_path)
                .await
                .map_err(|source| MigrateError::DirectoryError {
                    path: local_path.clone(),
                    source,
                })?;
        }

        let command = CommandLine::new(programs::MOUNT)
            .args(self.mount_args.iter().cloned())
            .arg(remote.as_str())
            .arg(local_path.to_string_lossy());

        info!("mounting {} filesystem: {}", side, command);
        if !self.dry_run {
            self.runner.run(&command).await?;
        }

        Ok(MountPoint {
            side,
            local_path,
            remote,
        })
    }
}
