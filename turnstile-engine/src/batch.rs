//! Batch classification with bounded fan-out.
//!
//! Each item needs at most one source-control round-trip (the activity
//! lookup) plus a pure classification, so the analyzer fans items out over
//! a semaphore-bounded task set instead of issuing one unbounded task per
//! item against a rate-limited API. A failed or cancelled item becomes an
//! explicit `Failed` entry in the output; the rest of the batch is
//! unaffected.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use turnstile_core::{
    classify, Identity, PullRequestSnapshot, ResolvedReviewGroup, ReviewOutcome, ReviewPolicy,
};

use crate::capability::{ItemFilter, SourceControl};
use crate::session::SessionContext;

/// Fan-out controls for a batch run.
#[derive(Clone)]
pub struct AnalyzerOptions {
    /// Upper bound on concurrent per-item lookups.
    pub max_in_flight: usize,
    /// Cancels in-flight items; each one is then reported as `Failed`
    /// rather than silently dropped.
    pub cancel: CancellationToken,
}

impl AnalyzerOptions {
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 12;
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_in_flight: Self::DEFAULT_MAX_IN_FLIGHT,
            cancel: CancellationToken::new(),
        }
    }
}

/// Outcome of one item in a batch.
#[derive(Debug, Clone, Serialize)]
pub enum ItemOutcome {
    Classified(ReviewOutcome),
    /// The item's queries failed or were cancelled. Partial results for the
    /// item are discarded entirely.
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub item_id: i64,
    pub outcome: ItemOutcome,
}

pub struct ReviewAnalyzer {
    session: Arc<SessionContext>,
    source: Arc<dyn SourceControl>,
    policy: ReviewPolicy,
    options: AnalyzerOptions,
}

impl ReviewAnalyzer {
    pub fn new(
        session: Arc<SessionContext>,
        source: Arc<dyn SourceControl>,
        policy: ReviewPolicy,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            session,
            source,
            policy,
            options,
        }
    }

    /// List matching items and classify them.
    ///
    /// The listing call is the only batch-level failure; every per-item
    /// failure is reported inline as a `Failed` entry.
    pub async fn analyze(
        &self,
        filter: &ItemFilter,
        viewer: Option<&Identity>,
    ) -> Result<Vec<ItemReport>> {
        let snapshots = self
            .source
            .list_items(filter)
            .await
            .context("listing review items")?;
        Ok(self.classify_snapshots(snapshots, viewer).await)
    }

    /// Classify a set of snapshots, one report per input, input order
    /// preserved.
    pub async fn classify_snapshots(
        &self,
        snapshots: Vec<PullRequestSnapshot>,
        viewer: Option<&Identity>,
    ) -> Vec<ItemReport> {
        // Membership must be settled before any item task reads it.
        let resolved = self.session.membership().await.clone();

        let item_ids: Vec<i64> = snapshots.iter().map(|s| s.id).collect();
        let limit = self.options.max_in_flight.max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks: JoinSet<(usize, ItemOutcome)> = JoinSet::new();

        info!(
            "classifying {} items ({} in flight)",
            snapshots.len(),
            limit
        );

        for (index, snapshot) in snapshots.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let cancel = self.options.cancel.clone();
            let source = self.source.clone();
            let resolved = resolved.clone();
            let viewer = viewer.cloned();
            let policy = self.policy;

            tasks.spawn(async move {
                let outcome = tokio::select! {
                    // Checked first so an already-cancelled batch never
                    // starts new work.
                    biased;
                    _ = cancel.cancelled() => ItemOutcome::Failed {
                        reason: "cancelled".to_string(),
                    },
                    outcome = classify_one(source, snapshot, resolved, viewer, policy, semaphore) => {
                        outcome
                    }
                };
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<ItemOutcome>> = vec![None; item_ids.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => warn!("item task did not complete: {e}"),
            }
        }

        item_ids
            .into_iter()
            .zip(outcomes)
            .map(|(item_id, outcome)| ItemReport {
                item_id,
                outcome: outcome.unwrap_or_else(|| ItemOutcome::Failed {
                    reason: "item task did not complete".to_string(),
                }),
            })
            .collect()
    }
}

async fn classify_one(
    source: Arc<dyn SourceControl>,
    mut snapshot: PullRequestSnapshot,
    resolved: ResolvedReviewGroup,
    viewer: Option<Identity>,
    policy: ReviewPolicy,
    semaphore: Arc<Semaphore>,
) -> ItemOutcome {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            return ItemOutcome::Failed {
                reason: "worker pool closed".to_string(),
            }
        }
    };

    if snapshot.recent_activity.is_none() {
        match source.get_activity(snapshot.id).await {
            Ok(activity) => snapshot.recent_activity = activity,
            Err(e) => {
                warn!("activity lookup for item {} failed: {e:#}", snapshot.id);
                return ItemOutcome::Failed {
                    reason: format!("activity lookup failed: {e:#}"),
                };
            }
        }
    }

    ItemOutcome::Classified(classify(&snapshot, &resolved, viewer.as_ref(), policy))
}
