//! Tiered resolution of the designated review group's membership.
//!
//! The live directory is authoritative; when it fails or comes back empty
//! the resolver degrades through a static fallback list and a heuristic
//! scan of review history before giving up with `Unresolved`. Resolution
//! never fails: every capability error is caught here, logged, and treated
//! as "this tier produced nothing".

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use turnstile_core::{IdentityKind, ResolutionTier, ResolvedReviewGroup};

use crate::capability::Directory;
use crate::heuristic::HeuristicStrategy;

pub struct GroupResolver {
    directory: Arc<dyn Directory>,
    static_fallback: Vec<String>,
    heuristic: Arc<dyn HeuristicStrategy>,
}

impl GroupResolver {
    pub fn new(
        directory: Arc<dyn Directory>,
        static_fallback: Vec<String>,
        heuristic: Arc<dyn HeuristicStrategy>,
    ) -> Self {
        Self {
            directory,
            static_fallback,
            heuristic,
        }
    }

    /// Resolve the group's flattened membership.
    ///
    /// Tries the live directory, then the static fallback list, then the
    /// heuristic strategy; returns `ResolvedReviewGroup::unresolved()` when
    /// all three come up empty.
    pub async fn resolve(&self, group_display_name: &str) -> ResolvedReviewGroup {
        match self.resolve_live(group_display_name).await {
            Ok(members) if !members.is_empty() => {
                info!(
                    "resolved {} members of {:?} from the directory",
                    members.len(),
                    group_display_name
                );
                return ResolvedReviewGroup::new(members, ResolutionTier::Live);
            }
            Ok(_) => info!("directory returned no members for {:?}", group_display_name),
            Err(e) => warn!("directory lookup for {:?} failed: {e:#}", group_display_name),
        }

        if !self.static_fallback.is_empty() {
            info!(
                "falling back to the static reviewer list ({} entries)",
                self.static_fallback.len()
            );
            return ResolvedReviewGroup::from_identifiers(
                self.static_fallback.iter().cloned(),
                ResolutionTier::StaticFallback,
            );
        }

        match self.heuristic.infer().await {
            Ok(members) if !members.is_empty() => {
                info!(
                    "inferred {} reviewers from recent review history",
                    members.len()
                );
                return ResolvedReviewGroup::new(members, ResolutionTier::Heuristic);
            }
            Ok(_) => info!("heuristic scan produced no reviewers"),
            Err(e) => warn!("heuristic scan failed: {e:#}"),
        }

        ResolvedReviewGroup::unresolved()
    }

    /// Flatten the group's membership graph.
    ///
    /// Iterative traversal over an explicit work stack, with a visited set
    /// keyed by group id: a group seen before is skipped, never re-expanded,
    /// so shared subgroups and membership cycles both terminate.
    async fn resolve_live(&self, group_display_name: &str) -> Result<BTreeSet<String>> {
        let Some(root) = self.directory.search_by_exact_name(group_display_name).await? else {
            debug!("no directory identity named {:?}", group_display_name);
            return Ok(BTreeSet::new());
        };

        let mut leaves = BTreeSet::new();
        let mut visited: HashSet<String> = HashSet::from([root.id.clone()]);
        let mut pending = vec![root.id];

        while let Some(group_id) = pending.pop() {
            for member in self.directory.get_members(&group_id).await? {
                let kind = match member.kind_hint {
                    Some(kind) => kind,
                    None => match self.directory.resolve_kind(&member.identifier).await {
                        Ok(kind) => kind,
                        Err(e) => {
                            // A member we cannot classify is still a usable
                            // leaf; only group expansion needs the kind.
                            debug!(
                                "kind lookup for {:?} failed, treating as individual: {e:#}",
                                member.identifier
                            );
                            IdentityKind::Individual
                        }
                    },
                };

                if kind == IdentityKind::Group {
                    if visited.insert(member.identifier.clone()) {
                        pending.push(member.identifier);
                    }
                    continue;
                }

                leaves.insert(member.identifier.to_lowercase());
                if let Some(unique_name) = &member.unique_name {
                    leaves.insert(unique_name.to_lowercase());
                }
            }
        }

        Ok(leaves)
    }
}
