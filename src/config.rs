// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Copy persistent volume claims and their NFS-backed data from one cluster to another
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Kubeconfig file holding both contexts (defaults to ~/.kube/config)
    #[arg(long, env = "KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context of the source cluster
    #[arg(long, env = "SOURCE_CONTEXT")]
    pub source_context: String,

    /// Kubeconfig context of the target cluster
    #[arg(long, env = "TARGET_CONTEXT")]
    pub target_context: String,

    /// DNS name of the network filesystem backing the source cluster
    #[arg(long, env = "SOURCE_FILESYSTEM_DNS")]
    pub source_filesystem_dns: String,

    /// DNS name of the network filesystem backing the target cluster
    #[arg(long, env = "TARGET_FILESYSTEM_DNS")]
    pub target_filesystem_dns: String,

    /// Storage class of the claims to migrate on the source cluster
    #[arg(long, env = "SOURCE_STORAGE_CLASS", default_value = defaults::STORAGE_CLASS)]
    pub source_storage_class: String,

    /// Storage class to provision the claims with on the target cluster
    #[arg(long, env = "TARGET_STORAGE_CLASS", default_value = defaults::STORAGE_CLASS)]
    pub target_storage_class: String,

    /// Arguments passed to mount, before the remote endpoint and mount path
    #[arg(long, env = "MOUNT_ARGS", default_value = defaults::MOUNT_ARGS, allow_hyphen_values = true)]
    pub mount_args: String,

    /// Arguments passed to rsync, before the source and target directories
    #[arg(long, env = "RSYNC_ARGS", default_value = defaults::RSYNC_ARGS, allow_hyphen_values = true)]
    pub rsync_args: String,

    /// Regular expression selecting the namespaces of the claims to migrate
    #[arg(long, env = "NAMESPACE_PATTERN", default_value = defaults::NAMESPACE_PATTERN)]
    pub namespace_pattern: String,

    /// Regular expression selecting the names of the claims to migrate
    #[arg(long, env = "NAME_PATTERN", default_value = defaults::NAME_PATTERN)]
    pub name_pattern: String,

    /// Directory the filesystems are mounted under
    #[arg(long, env = "MOUNT_ROOT", default_value = defaults::MOUNT_ROOT)]
    pub mount_root: PathBuf,

    /// Seconds to wait for new claims to bind before re-listing the target
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = defaults::POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Validate every step without creating claims, directories, mounts or copies
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,

    /// Only log warnings and errors
    #[arg(long, env = "QUIET")]
    pub quiet: bool,
}

/// One side of the migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub context: String,
    pub filesystem_dns: String,
    pub storage_class: String,
}

/// Immutable run configuration, built once from the command line
#[derive(Debug, Clone)]
pub struct Config {
    pub kubeconfig: Option<PathBuf>,
    pub source: ClusterConfig,
    pub target: ClusterConfig,
    pub mount_args: Vec<String>,
    pub rsync_args: Vec<String>,
    pub namespace_pattern: String,
    pub name_pattern: String,
    pub mount_root: PathBuf,
    pub poll_interval: Duration,
    pub dry_run: bool,
    pub quiet: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            kubeconfig: cli.kubeconfig,
            source: ClusterConfig {
                context: cli.source_context,
                filesystem_dns: cli.source_filesystem_dns,
                storage_class: cli.source_storage_class,
            },
            target: ClusterConfig {
                context: cli.target_context,
                filesystem_dns: cli.target_filesystem_dns,
                storage_class: cli.target_storage_class,
            },
            mount_args: split_args(&cli.mount_args),
            rsync_args: split_args(&cli.rsync_args),
            namespace_pattern: cli.namespace_pattern,
            name_pattern: cli.name_pattern,
            mount_root: cli.mount_root,
            poll_interval: Duration::from_secs(cli.poll_interval_secs),
            dry_run: cli.dry_run,
            quiet: cli.quiet,
        }
    }
}

fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}
