//! In-memory capability fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use turnstile_core::{
    ActivityDescriptor, Identity, IdentityKind, PullRequestSnapshot, ReviewerVote,
};
use turnstile_engine::{Directory, ItemFilter, MemberRef, ReviewHistory, SourceControl};

/// Directory backed by hash maps.
#[derive(Default)]
pub struct MapDirectory {
    by_name: HashMap<String, Identity>,
    members: HashMap<String, Vec<MemberRef>>,
    kinds: HashMap<String, IdentityKind>,
    pub search_calls: AtomicUsize,
    /// Group ids passed to `get_members`, in call order.
    pub member_calls: Mutex<Vec<String>>,
}

impl MapDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.kinds.insert(identity.id.clone(), identity.kind);
        self.by_name
            .insert(identity.display_name.to_lowercase(), identity);
        self
    }

    pub fn with_members(mut self, group_id: &str, members: Vec<MemberRef>) -> Self {
        self.members.insert(group_id.to_string(), members);
        self
    }

    pub fn with_kind(mut self, identifier: &str, kind: IdentityKind) -> Self {
        self.kinds.insert(identifier.to_string(), kind);
        self
    }
}

#[async_trait]
impl Directory for MapDirectory {
    async fn search_by_exact_name(&self, name: &str) -> Result<Option<Identity>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_name.get(&name.to_lowercase()).cloned())
    }

    async fn get_members(&self, group_id: &str) -> Result<Vec<MemberRef>> {
        self.member_calls
            .lock()
            .unwrap()
            .push(group_id.to_string());
        Ok(self.members.get(group_id).cloned().unwrap_or_default())
    }

    async fn resolve_kind(&self, identifier: &str) -> Result<IdentityKind> {
        self.kinds
            .get(identifier)
            .copied()
            .ok_or_else(|| anyhow!("unknown identifier {identifier}"))
    }
}

/// Directory whose every call fails, as if the service were unreachable.
pub struct OutageDirectory;

#[async_trait]
impl Directory for OutageDirectory {
    async fn search_by_exact_name(&self, _name: &str) -> Result<Option<Identity>> {
        Err(anyhow!("directory unavailable"))
    }

    async fn get_members(&self, _group_id: &str) -> Result<Vec<MemberRef>> {
        Err(anyhow!("directory unavailable"))
    }

    async fn resolve_kind(&self, _identifier: &str) -> Result<IdentityKind> {
        Err(anyhow!("directory unavailable"))
    }
}

/// History serving a fixed list of closed items.
pub struct FixedHistory {
    pub items: Vec<PullRequestSnapshot>,
}

#[async_trait]
impl ReviewHistory for FixedHistory {
    async fn list_recent_closed_items(&self, limit: usize) -> Result<Vec<PullRequestSnapshot>> {
        Ok(self.items.iter().take(limit).cloned().collect())
    }
}

/// History whose every call fails.
pub struct OutageHistory;

#[async_trait]
impl ReviewHistory for OutageHistory {
    async fn list_recent_closed_items(&self, _limit: usize) -> Result<Vec<PullRequestSnapshot>> {
        Err(anyhow!("history unavailable"))
    }
}

/// Source control over fixed items, with per-item failure injection and an
/// optional artificial delay on activity lookups.
#[derive(Default)]
pub struct MapSource {
    pub items: Vec<PullRequestSnapshot>,
    pub activity: HashMap<i64, ActivityDescriptor>,
    pub failing_activity: HashSet<i64>,
    pub fail_listing: bool,
    pub activity_delay: Option<Duration>,
    pub in_flight: AtomicUsize,
    pub max_in_flight_seen: AtomicUsize,
}

impl MapSource {
    pub fn new(items: Vec<PullRequestSnapshot>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SourceControl for MapSource {
    async fn list_items(&self, _filter: &ItemFilter) -> Result<Vec<PullRequestSnapshot>> {
        if self.fail_listing {
            return Err(anyhow!("source control unavailable"));
        }
        Ok(self.items.clone())
    }

    async fn get_activity(&self, item_id: i64) -> Result<Option<ActivityDescriptor>> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight_seen
            .fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.activity_delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_activity.contains(&item_id) {
            return Err(anyhow!("activity fetch for item {item_id} failed"));
        }
        Ok(self.activity.get(&item_id).cloned())
    }
}

pub fn individual(id: &str, display_name: &str) -> Identity {
    Identity::individual(id, display_name)
}

pub fn required_vote(id: &str, vote: i32) -> ReviewerVote {
    ReviewerVote {
        identity: Identity::individual(id, format!("Reviewer {id}")),
        vote,
        is_required: true,
    }
}

pub fn optional_vote(id: &str, vote: i32) -> ReviewerVote {
    ReviewerVote {
        identity: Identity::individual(id, format!("Reviewer {id}")),
        vote,
        is_required: false,
    }
}

pub fn snapshot(id: i64, reviewers: Vec<ReviewerVote>) -> PullRequestSnapshot {
    PullRequestSnapshot {
        id,
        author_id: "author-1".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 7, 15, 8, 0, 0).unwrap(),
        reviewers,
        recent_activity: None,
    }
}

pub fn activity(actor: &str, action: &str) -> ActivityDescriptor {
    ActivityDescriptor {
        actor: actor.to_string(),
        action: action.to_string(),
        at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
    }
}
