// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Synthesis of a target claim from its source counterpart

use crate::constants::annotations;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;

/// Copy a source claim into an unbound claim ready for the target cluster.
///
/// Fields assigned by the cluster (creation timestamp, uid, resource version,
/// bound volume and the binding annotations) are cleared. The storage class is
/// rewritten to `target_storage_class` only when the source sets
/// `spec.storageClassName`; annotation-only claims stay annotation-only.
pub fn prepare_target_claim(
    source: &PersistentVolumeClaim,
    target_storage_class: &str,
) -> PersistentVolumeClaim {
    let mut claim = source.clone();

    claim.metadata.creation_timestamp = None;
    claim.metadata.uid = None;
    claim.metadata.resource_version = None;
    if let Some(existing) = claim.metadata.annotations.as_mut() {
        existing.remove(annotations::BIND_COMPLETED);
        existing.remove(annotations::BOUND_BY_CONTROLLER);
    }

    let Some(spec) = claim.spec.as_mut() else {
        return claim;
    };
    spec.volume_name = None;

    if target_storage_class.is_empty() {
        return claim;
    }

    let has_primary = spec
        .storage_class_name
        .as_deref()
        .is_some_and(|s| !s.is_empty());
    if has_primary {
        spec.storage_class_name = Some(target_storage_class.to_string());
        if let Some(legacy) = claim
            .metadata
            .annotations
            .as_mut()
            .and_then(|a| a.get_mut(annotations::STORAGE_CLASS))
        {
            *legacy = target_storage_class.to_string();
        }
    }

    claim
}
