// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys read or rewritten on claims
pub mod annotations {
    /// Legacy storage class reference, used when spec.storageClassName is unset
    pub const STORAGE_CLASS: &str = "volume.beta.kubernetes.io/storage-class";
    /// Set by the PV controller once binding completes
    pub const BIND_COMPLETED: &str = "pv.kubernetes.io/bind-completed";
    /// Set by the PV controller when it performed the binding
    pub const BOUND_BY_CONTROLLER: &str = "pv.kubernetes.io/bound-by-controller";
}

/// Storage class parameter holding the network filesystem identifier
pub const FILESYSTEM_ID_PARAMETER: &str = "fileSystemId";

/// External programs driven by the migration
pub mod programs {
    pub const MOUNT: &str = "mount";
    pub const RSYNC: &str = "rsync";
}

/// Defaults for the command line flags
pub mod defaults {
    pub const STORAGE_CLASS: &str = "efs";
    pub const MOUNT_ARGS: &str =
        "-t nfs4 -o nfsvers=4.1,rsize=1048576,wsize=1048576,hard,timeo=600,retrans=2,noresvport";
    pub const RSYNC_ARGS: &str = "-rulpEto";
    pub const NAMESPACE_PATTERN: &str = "default";
    pub const NAME_PATTERN: &str = ".*";
    pub const MOUNT_ROOT: &str = "/tmp";
    pub const POLL_INTERVAL_SECS: &str = "60";
}

/// Claim reconciliation loop configuration
pub mod reconcile {
    /// Upper bound on create/re-list rounds against the target cluster
    pub const MAX_ATTEMPTS: u32 = 10;
}
