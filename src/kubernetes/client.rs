// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation for a named kubeconfig context

use crate::error::{MigrateError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Resolve the kubeconfig file: the explicit path if given, else ~/.kube/config
pub fn kubeconfig_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let home = std::env::var_os("HOME").ok_or_else(|| {
        MigrateError::KubeconfigError("HOME is not set and no kubeconfig was given".to_string())
    })?;

    Ok(PathBuf::from(home).join(".kube").join("config"))
}

/// Create a Kubernetes client for `context` from the kubeconfig file at `path`
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn create_client_for_context(path: &Path, context: &str) -> Result<Client> {
    info!("Loading kubeconfig context '{}'...", context);

    let kubeconfig = tokio::fs::read_to_string(path).await.map_err(|e| {
        MigrateError::KubeconfigError(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })?;

    create_client_from_kubeconfig(&kubeconfig, context).await
}

/// Create a Kubernetes client from a kubeconfig string, bound to `context`
pub async fn create_client_from_kubeconfig(kubeconfig: &str, context: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| MigrateError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..Default::default()
    };

    let client_config = kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &options)
        .await
        .map_err(|e| {
            MigrateError::KubeconfigError(format!(
                "Fail to build the k8s config for context {}: {}",
                context, e
            ))
        })?;

    debug!("Context '{}' points at {}", context, client_config.cluster_url);

    Client::try_from(client_config).map_err(|e| {
        MigrateError::KubeconfigError(format!(
            "Fail to create client for context {}: {}",
            context, e
        ))
    })
}
