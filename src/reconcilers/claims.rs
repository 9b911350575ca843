// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Claim reconciler - creates the source claims missing on the target and
//! polls until the target listing catches up.

use crate::claims::{index_claims, prepare_target_claim, ClaimIndex, ClaimSelector};
use crate::constants::reconcile::MAX_ATTEMPTS;
use crate::error::{MigrateError, Result};
use crate::kubernetes::ClaimStore;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

/// Outcome of a reconciliation run
#[derive(Debug)]
pub struct Reconciliation {
    /// Target claims as last listed
    pub target: ClaimIndex,
    /// Claims actually created, summed over all attempts (zero under dry-run)
    pub created: usize,
    /// Create rounds performed
    pub attempts: u32,
    /// Keys submitted as dry-run creates, which the target will not list
    pub simulated: Vec<String>,
}

pub struct ClaimReconciler<'a> {
    target: &'a dyn ClaimStore,
    selector: &'a ClaimSelector,
    poll_interval: Duration,
    dry_run: bool,
}

impl<'a> ClaimReconciler<'a> {
    /// `selector` is the target-side selector; its storage class is the one
    /// created claims are rewritten to.
    pub fn new(
        target: &'a dyn ClaimStore,
        selector: &'a ClaimSelector,
        poll_interval: Duration,
        dry_run: bool,
    ) -> Self {
        Self {
            target,
            selector,
            poll_interval,
            dry_run,
        }
    }

    /// Create every claim of `source` missing from `target`, re-listing the
    /// target after each round that created something, for at most
    /// [`MAX_ATTEMPTS`] rounds. Running out of attempts is not an error.
    #[instrument(skip_all)]
    pub async fn reconcile(&self, source: &ClaimIndex, target: ClaimIndex) -> Result<Reconciliation> {
        let mut target = target;
        let mut created_total = 0;
        let mut attempts = 0;
        let mut simulated = Vec::new();

        for attempt in 1..=MAX_ATTEMPTS {
            attempts = attempt;
            info!("creating missing PVCs on target, attempt {}...", attempt);

            let submitted = self.create_missing(source, &target).await?;
            // A dry-run create persists nothing, so there is nothing to wait for
            let created = if self.dry_run {
                simulated = submitted;
                0
            } else {
                submitted.len()
            };
            info!("{} pvcs created", created);
            if created == 0 {
                break;
            }
            created_total += created;

            info!("Waiting pvs to be created...");
            sleep(self.poll_interval).await;
            target = index_claims(self.target, self.selector).await?;
        }

        Ok(Reconciliation {
            target,
            created: created_total,
            attempts,
            simulated,
        })
    }

    /// One round: submit every missing claim, returning the submitted keys
    async fn create_missing(&self, source: &ClaimIndex, target: &ClaimIndex) -> Result<Vec<String>> {
        let mut submitted = Vec::new();

        for (key, source_claim) in source.missing_from(target) {
            info!("creating pvc {}", key);

            let claim = prepare_target_claim(source_claim, self.selector.storage_class());
            let namespace = claim.metadata.namespace.clone().unwrap_or_default();
            self.target
                .create_claim(&namespace, &claim, self.dry_run)
                .await
                .map_err(|e| MigrateError::ClaimCreateError {
                    key: key.to_string(),
                    source: Box::new(e),
                })?;

            info!("created pvc {}", key);
            submitted.push(key.to_string());
        }

        Ok(submitted)
    }
}
