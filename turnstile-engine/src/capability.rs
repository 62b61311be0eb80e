//! Abstract query capabilities consumed by the resolver and the analyzer.
//!
//! Collaborators supply the concrete implementations (a directory service,
//! a source-control API client). Everything here is read-only. Transport
//! and permission failures surface as errors and are handled locally by the
//! consumers; they never escape a resolution or a batch run.

use anyhow::Result;
use async_trait::async_trait;

use turnstile_core::{ActivityDescriptor, Identity, IdentityKind, PullRequestSnapshot};

/// A membership edge as reported by the directory.
#[derive(Debug, Clone)]
pub struct MemberRef {
    pub identifier: String,
    /// Kind when the directory already knows it; saves a `resolve_kind`
    /// round-trip during traversal.
    pub kind_hint: Option<IdentityKind>,
    /// Alternate unique identifier, added to the member set alongside
    /// `identifier` so either form matches later.
    pub unique_name: Option<String>,
}

impl MemberRef {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            kind_hint: None,
            unique_name: None,
        }
    }

    pub fn with_kind(mut self, kind: IdentityKind) -> Self {
        self.kind_hint = Some(kind);
        self
    }

    pub fn with_unique_name(mut self, unique_name: impl Into<String>) -> Self {
        self.unique_name = Some(unique_name.into());
        self
    }
}

/// Organizational directory lookups.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Find the identity whose display name matches `name`. The match is
    /// case-insensitive; `None` means no such identity exists.
    async fn search_by_exact_name(&self, name: &str) -> Result<Option<Identity>>;

    /// Direct members of a group.
    async fn get_members(&self, group_id: &str) -> Result<Vec<MemberRef>>;

    /// Kind of an identifier, for members listed without a kind hint.
    async fn resolve_kind(&self, identifier: &str) -> Result<IdentityKind>;
}

/// Filter forwarded verbatim to the source-control listing call.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub author_id: Option<String>,
    pub reviewer_id: Option<String>,
    pub include_drafts: bool,
}

/// Source-control queries for open review items.
#[async_trait]
pub trait SourceControl: Send + Sync {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<PullRequestSnapshot>>;

    /// Most recent actor + action on an item, comment threads and push
    /// iterations merged into one descriptor by the implementation.
    async fn get_activity(&self, item_id: i64) -> Result<Option<ActivityDescriptor>>;
}

/// Closed-item history, consumed only by the heuristic membership tier.
#[async_trait]
pub trait ReviewHistory: Send + Sync {
    /// Most recently closed items, newest first, at most `limit`.
    async fn list_recent_closed_items(&self, limit: usize) -> Result<Vec<PullRequestSnapshot>>;
}
