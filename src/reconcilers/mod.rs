// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconcilers that converge the target cluster towards the source.

pub mod claims;

pub use claims::{ClaimReconciler, Reconciliation};
