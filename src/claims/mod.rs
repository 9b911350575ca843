// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Persistent volume claim selection, indexing and target-side synthesis.

pub mod index;
pub mod prepare;

pub use index::{
    bound_volume_name, claim_key, effective_storage_class, index_claims, ClaimIndex,
    ClaimSelector,
};
pub use prepare::prepare_target_claim;
