// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Migration orchestration and volume data synchronization.

pub mod manager;
pub mod volumes;

pub use manager::{MigrationManager, MigrationSummary};
pub use volumes::{plan_transfers, DirectoryPair, SyncReport, TransferPlan, VolumeSyncer};
