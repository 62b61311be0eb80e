//! Last-resort membership inference from review history.
//!
//! Lexical matching over reviewer names is environment-specific, so the
//! whole tier sits behind a strategy trait: deployments can swap the scan
//! or disable it without touching the resolver or the classifier.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use turnstile_core::{is_approving_vote, Identity, NameFilter};

use crate::capability::ReviewHistory;

#[async_trait]
pub trait HeuristicStrategy: Send + Sync {
    /// Infer likely members of the designated review group.
    async fn infer(&self) -> Result<BTreeSet<String>>;
}

/// Strategy that never infers anything.
pub struct DisabledHeuristic;

#[async_trait]
impl HeuristicStrategy for DisabledHeuristic {
    async fn infer(&self) -> Result<BTreeSet<String>> {
        Ok(BTreeSet::new())
    }
}

/// Tally reviewers over a bounded window of recently closed items and keep
/// the frequent ones whose names look like human reviewers.
///
/// An identity counts towards the tally when it was marked required on an
/// item or cast an approving vote there; identities below `min_occurrences`
/// or failing the name filter are discarded.
pub struct VoteScanHeuristic {
    history: Arc<dyn ReviewHistory>,
    window: usize,
    min_occurrences: usize,
    filter: NameFilter,
}

impl VoteScanHeuristic {
    pub const DEFAULT_WINDOW: usize = 500;
    pub const DEFAULT_MIN_OCCURRENCES: usize = 3;

    pub fn new(
        history: Arc<dyn ReviewHistory>,
        window: usize,
        min_occurrences: usize,
        filter: NameFilter,
    ) -> Self {
        Self {
            history,
            window,
            min_occurrences,
            filter,
        }
    }

    pub fn with_defaults(history: Arc<dyn ReviewHistory>, filter: NameFilter) -> Self {
        Self::new(
            history,
            Self::DEFAULT_WINDOW,
            Self::DEFAULT_MIN_OCCURRENCES,
            filter,
        )
    }
}

#[async_trait]
impl HeuristicStrategy for VoteScanHeuristic {
    async fn infer(&self) -> Result<BTreeSet<String>> {
        let items = self.history.list_recent_closed_items(self.window).await?;

        let mut tallies: HashMap<String, (usize, &Identity)> = HashMap::new();
        for item in &items {
            for reviewer in &item.reviewers {
                if !reviewer.is_required && !is_approving_vote(reviewer.vote) {
                    continue;
                }
                tallies
                    .entry(reviewer.identity.id.to_lowercase())
                    .and_modify(|(count, _)| *count += 1)
                    .or_insert((1, &reviewer.identity));
            }
        }

        let mut members = BTreeSet::new();
        for (key, (count, identity)) in tallies {
            if count < self.min_occurrences {
                continue;
            }
            if !self
                .filter
                .accepts(&identity.display_name, identity.unique_name.as_deref())
            {
                debug!(
                    "discarding frequent reviewer {:?}: name filter rejected it",
                    identity.display_name
                );
                continue;
            }
            members.insert(key);
            if let Some(unique_name) = &identity.unique_name {
                members.insert(unique_name.to_lowercase());
            }
        }

        debug!(
            "heuristic scan over {} items produced {} member keys",
            items.len(),
            members.len()
        );
        Ok(members)
    }
}
