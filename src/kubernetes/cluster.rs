// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Claim and storage class access for one cluster

use crate::constants::FILESYSTEM_ID_PARAMETER;
use crate::error::{MigrateError, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use k8s_openapi::api::storage::v1::StorageClass;
use kube::{
    api::{ListParams, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[cfg(test)]
use mockall::automock;

/// Operations the migration needs from a cluster.
///
/// Implemented over the Kubernetes API by [`KubeCluster`]; tests substitute
/// in-memory or mocked implementations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// List every claim in the cluster, across all namespaces
    async fn list_claims(&self) -> Result<Vec<PersistentVolumeClaim>>;

    /// Create `claim` in `namespace`.
    ///
    /// With `dry_run` the request is still sent, so the API server validates
    /// it, but nothing is persisted.
    async fn create_claim(
        &self,
        namespace: &str,
        claim: &PersistentVolumeClaim,
        dry_run: bool,
    ) -> Result<PersistentVolumeClaim>;

    /// Get the parameters of the named storage class
    async fn storage_class_parameters(&self, name: &str) -> Result<BTreeMap<String, String>>;
}

/// A cluster reached through a kubeconfig context
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    context: String,
}

impl KubeCluster {
    pub fn new(client: Client, context: impl Into<String>) -> Self {
        Self {
            client,
            context: context.into(),
        }
    }
}

#[async_trait]
impl ClaimStore for KubeCluster {
    #[instrument(skip(self), fields(context = %self.context))]
    async fn list_claims(&self) -> Result<Vec<PersistentVolumeClaim>> {
        let claims: Api<PersistentVolumeClaim> = Api::all(self.client.clone());
        let claim_list = claims
            .list(&ListParams::default())
            .await
            .map_err(|source| MigrateError::ListClaimsError {
                context: self.context.clone(),
                source,
            })?;

        debug!("Listed {} pvcs", claim_list.items.len());
        Ok(claim_list.items)
    }

    #[instrument(skip(self, claim), fields(context = %self.context))]
    async fn create_claim(
        &self,
        namespace: &str,
        claim: &PersistentVolumeClaim,
        dry_run: bool,
    ) -> Result<PersistentVolumeClaim> {
        let claims: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        let pp = PostParams {
            dry_run,
            ..Default::default()
        };

        Ok(claims.create(&pp, claim).await?)
    }

    #[instrument(skip(self), fields(context = %self.context))]
    async fn storage_class_parameters(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let storage_classes: Api<StorageClass> = Api::all(self.client.clone());
        let storage_class =
            storage_classes
                .get(name)
                .await
                .map_err(|source| MigrateError::StorageClassError {
                    storage_class: name.to_string(),
                    source,
                })?;

        Ok(storage_class.parameters.unwrap_or_default())
    }
}

/// Extract the filesystem identifier from a storage class's parameters
pub fn filesystem_id(storage_class: &str, parameters: &BTreeMap<String, String>) -> Result<String> {
    parameters
        .get(FILESYSTEM_ID_PARAMETER)
        .filter(|id| !id.is_empty())
        .cloned()
        .ok_or_else(|| MigrateError::MissingStorageClassParameter {
            storage_class: storage_class.to_string(),
            parameter: FILESYSTEM_ID_PARAMETER.to_string(),
        })
}
