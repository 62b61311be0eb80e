//! Read-only pull-request snapshots as reported by source control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Meaning of a raw reviewer vote.
///
/// The source-control system reports votes on a fixed scale; anything off
/// the scale maps to `Unknown` rather than failing the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteValue {
    Approved,
    ApprovedWithSuggestions,
    NoVote,
    WaitingForAuthor,
    Rejected,
    Unknown,
}

impl VoteValue {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            10 => VoteValue::Approved,
            5 => VoteValue::ApprovedWithSuggestions,
            0 => VoteValue::NoVote,
            -5 => VoteValue::WaitingForAuthor,
            -10 => VoteValue::Rejected,
            _ => VoteValue::Unknown,
        }
    }
}

/// Whether a raw vote counts as an approval (with or without suggestions).
pub fn is_approving_vote(raw: i32) -> bool {
    raw >= 5
}

/// One reviewer's entry on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerVote {
    pub identity: Identity,
    pub vote: i32,
    pub is_required: bool,
}

/// The most recent change on an item: one actor, one action, merged from
/// comment threads and push iterations by the source-control collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDescriptor {
    pub actor: String,
    pub action: String,
    pub at: DateTime<Utc>,
}

impl ActivityDescriptor {
    /// One-line "who did what, when" summary for rendering.
    pub fn describe(&self) -> String {
        format!(
            "{} {} at {}",
            self.actor,
            self.action,
            self.at.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

/// A pull request as observed at one point in time. Never mutated by
/// classification; a fresh snapshot means a fresh classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSnapshot {
    pub id: i64,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub reviewers: Vec<ReviewerVote>,
    pub recent_activity: Option<ActivityDescriptor>,
}
