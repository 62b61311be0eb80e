//! Per-batch session state.
//!
//! Membership is resolved at most once per session and shared read-only by
//! every classification in the batch. The context is constructed once and
//! passed by reference, so independent sessions (and parallel tests) never
//! share resolution state.

use serde::Serialize;
use tokio::sync::OnceCell;

use turnstile_core::{ResolutionTier, ResolvedReviewGroup};

use crate::resolver::GroupResolver;

pub struct SessionContext {
    resolver: GroupResolver,
    group_name: String,
    membership: OnceCell<ResolvedReviewGroup>,
}

/// Resolver outcome summary for rendering collaborators.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResolverDiagnostics {
    pub member_count: usize,
    pub tier: ResolutionTier,
}

impl SessionContext {
    pub fn new(resolver: GroupResolver, group_name: impl Into<String>) -> Self {
        Self {
            resolver,
            group_name: group_name.into(),
            membership: OnceCell::new(),
        }
    }

    /// The resolved membership set.
    ///
    /// Resolution runs on the first call; concurrent callers block on that
    /// one run rather than triggering duplicates, and every later call is a
    /// cheap read. Once computed, the set never changes for the lifetime of
    /// the session.
    pub async fn membership(&self) -> &ResolvedReviewGroup {
        self.membership
            .get_or_init(|| self.resolver.resolve(&self.group_name))
            .await
    }

    /// Summary of the resolution, or `None` if it has not run yet.
    pub fn diagnostics(&self) -> Option<ResolverDiagnostics> {
        self.membership.get().map(|m| ResolverDiagnostics {
            member_count: m.member_count(),
            tier: m.tier(),
        })
    }
}
