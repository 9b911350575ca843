// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Claim selection and indexing by `namespace/name`

use crate::constants::annotations;
use crate::error::Result;
use crate::kubernetes::ClaimStore;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use kube::ResourceExt;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Identity key of a claim, shared between clusters: `namespace/name`
pub fn claim_key(claim: &PersistentVolumeClaim) -> String {
    format!("{}/{}", claim.namespace().unwrap_or_default(), claim.name_any())
}

/// The storage class a claim asks for.
///
/// `spec.storageClassName` wins when set and non-empty; only when it is
/// absent does the legacy beta annotation count.
pub fn effective_storage_class(claim: &PersistentVolumeClaim) -> Option<&str> {
    let primary = claim
        .spec
        .as_ref()
        .and_then(|s| s.storage_class_name.as_deref())
        .filter(|s| !s.is_empty());

    primary.or_else(|| {
        claim
            .annotations()
            .get(annotations::STORAGE_CLASS)
            .map(|s| s.as_str())
    })
}

/// Name of the volume the claim is bound to, empty until provisioning completes
pub fn bound_volume_name(claim: &PersistentVolumeClaim) -> &str {
    claim
        .spec
        .as_ref()
        .and_then(|s| s.volume_name.as_deref())
        .unwrap_or_default()
}

/// Which claims of a cluster take part in the migration
#[derive(Debug, Clone)]
pub struct ClaimSelector {
    storage_class: String,
    namespace: Regex,
    name: Regex,
}

impl ClaimSelector {
    /// Patterns match anywhere in the namespace/name unless anchored
    pub fn new(storage_class: &str, namespace_pattern: &str, name_pattern: &str) -> Result<Self> {
        Ok(Self {
            storage_class: storage_class.to_string(),
            namespace: Regex::new(namespace_pattern)?,
            name: Regex::new(name_pattern)?,
        })
    }

    pub fn storage_class(&self) -> &str {
        &self.storage_class
    }

    pub fn matches(&self, claim: &PersistentVolumeClaim) -> bool {
        self.namespace
            .is_match(&claim.namespace().unwrap_or_default())
            && self.name.is_match(&claim.name_any())
            && effective_storage_class(claim) == Some(self.storage_class.as_str())
    }
}

/// Claims of one cluster keyed by [`claim_key`], ordered by key
#[derive(Debug, Clone, Default)]
pub struct ClaimIndex {
    claims: BTreeMap<String, PersistentVolumeClaim>,
}

impl ClaimIndex {
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PersistentVolumeClaim> {
        self.claims.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.claims.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PersistentVolumeClaim)> {
        self.claims.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Claims present here whose key is absent from `other`
    pub fn missing_from<'a>(
        &'a self,
        other: &'a ClaimIndex,
    ) -> impl Iterator<Item = (&'a str, &'a PersistentVolumeClaim)> + 'a {
        self.iter().filter(move |(key, _)| !other.contains_key(key))
    }
}

impl FromIterator<PersistentVolumeClaim> for ClaimIndex {
    fn from_iter<I: IntoIterator<Item = PersistentVolumeClaim>>(iter: I) -> Self {
        Self {
            claims: iter.into_iter().map(|c| (claim_key(&c), c)).collect(),
        }
    }
}

/// List every claim of the cluster and index those matching `selector`
#[instrument(skip(store, selector), fields(storage_class = %selector.storage_class()))]
pub async fn index_claims(store: &dyn ClaimStore, selector: &ClaimSelector) -> Result<ClaimIndex> {
    let claims = store.list_claims().await?;
    let total = claims.len();

    let index: ClaimIndex = claims.into_iter().filter(|c| selector.matches(c)).collect();

    debug!("{} of {} pvcs match selection", index.len(), total);
    Ok(index)
}
