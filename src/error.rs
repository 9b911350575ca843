// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Couldn't get storage class named {storage_class}: {source}")]
    StorageClassError {
        storage_class: String,
        #[source]
        source: kube::Error,
    },

    #[error("Couldn't list pvcs in context {context}: {source}")]
    ListClaimsError {
        context: String,
        #[source]
        source: kube::Error,
    },

    #[error("Storage class {storage_class} has no '{parameter}' parameter")]
    MissingStorageClassParameter {
        storage_class: String,
        parameter: String,
    },

    #[error("Invalid claim selector pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Couldn't create pvc {key} on target: {source}")]
    ClaimCreateError {
        key: String,
        #[source]
        source: Box<MigrateError>,
    },

    #[error("Couldn't find corresponding pvc on target: {0}")]
    ClaimNotFound(String),

    #[error("Couldn't create dir {}: {source}", path.display())]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MigrateError>;
