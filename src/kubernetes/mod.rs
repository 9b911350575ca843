// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation and claim/storage class access.

pub mod client;
pub mod cluster;

pub use client::{create_client_for_context, kubeconfig_path};
pub use cluster::{filesystem_id, ClaimStore, KubeCluster};

#[cfg(test)]
pub use cluster::MockClaimStore;
