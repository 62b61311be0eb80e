//! Pure review-state classification.
//!
//! `classify` maps one pull-request snapshot plus the resolved review-group
//! membership to a vote status, an approval ratio and a priority-ordered
//! pending reason. It performs no I/O, holds no state, and never fails:
//! every input combination has a defined outcome.

use serde::Serialize;

use crate::group::ResolvedReviewGroup;
use crate::identity::{is_system_account, Identity, IdentityKind};
use crate::snapshot::{is_approving_vote, PullRequestSnapshot, ReviewerVote, VoteValue};

/// Approval policy for the designated review group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPolicy {
    /// Approvals required from resolved group members before an item counts
    /// as sufficiently reviewed.
    pub required_approvals: usize,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            required_approvals: 2,
        }
    }
}

/// The viewer's own standing on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoteStatus {
    Approved,
    ApprovedWithSuggestions,
    NoVote,
    WaitingForAuthor,
    Rejected,
    Unknown,
    /// The viewer is absent from the item or not a required reviewer on it.
    NotAReviewer,
}

impl From<VoteValue> for VoteStatus {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Approved => VoteStatus::Approved,
            VoteValue::ApprovedWithSuggestions => VoteStatus::ApprovedWithSuggestions,
            VoteValue::NoVote => VoteStatus::NoVote,
            VoteValue::WaitingForAuthor => VoteStatus::WaitingForAuthor,
            VoteValue::Rejected => VoteStatus::Rejected,
            VoteValue::Unknown => VoteStatus::Unknown,
        }
    }
}

/// Approvals from resolved group members assigned to the item.
///
/// `Known { 0, 0 }` is a real observation (the group resolved, none of its
/// members are on this item); `Unknown` means the membership itself could
/// not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApprovalRatio {
    Known { approved: usize, total: usize },
    Unknown,
}

/// Why an item has not reached a mergeable state. First match in the
/// priority chain wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PendingReason {
    Rejected,
    WaitingForAuthor,
    PendingRequiredReviewerApproval,
    PendingOtherApproval,
    /// Approvals look satisfied but the item is still open; some external
    /// gate (merge policy, build) is assumed to be holding it.
    PolicyOrBuildBlocked,
}

/// Classification result for one item. Created fresh per call, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub item_id: i64,
    pub vote_status: VoteStatus,
    pub approval_ratio: ApprovalRatio,
    pub pending_reason: PendingReason,
    pub last_change: String,
}

/// Classify one snapshot against the resolved review group.
pub fn classify(
    snapshot: &PullRequestSnapshot,
    resolved: &ResolvedReviewGroup,
    viewer: Option<&Identity>,
    policy: ReviewPolicy,
) -> ReviewOutcome {
    let matched: Vec<&ReviewerVote> = if resolved.is_resolved() {
        snapshot
            .reviewers
            .iter()
            .filter(|r| r.is_required && resolved.contains(&r.identity))
            .collect()
    } else {
        Vec::new()
    };
    let matched_approvals = matched.iter().filter(|r| is_approving_vote(r.vote)).count();

    let approval_ratio = if resolved.is_resolved() {
        ApprovalRatio::Known {
            approved: matched_approvals,
            total: matched.len(),
        }
    } else {
        ApprovalRatio::Unknown
    };

    ReviewOutcome {
        item_id: snapshot.id,
        vote_status: viewer_status(snapshot, viewer),
        approval_ratio,
        pending_reason: pending_reason(snapshot, resolved, matched_approvals, policy),
        last_change: snapshot
            .recent_activity
            .as_ref()
            .map(|a| a.describe())
            .unwrap_or_else(|| "no recent activity".to_string()),
    }
}

/// Find the viewer among the reviewers and map their vote.
///
/// Matches by id first, then by case-insensitive display name. A missing
/// entry, or one not flagged required, is `NotAReviewer`.
fn viewer_status(snapshot: &PullRequestSnapshot, viewer: Option<&Identity>) -> VoteStatus {
    let Some(viewer) = viewer else {
        return VoteStatus::NotAReviewer;
    };

    let entry = snapshot
        .reviewers
        .iter()
        .find(|r| r.identity.id == viewer.id)
        .or_else(|| {
            snapshot.reviewers.iter().find(|r| {
                r.identity
                    .display_name
                    .eq_ignore_ascii_case(&viewer.display_name)
            })
        });

    match entry {
        Some(entry) if entry.is_required => VoteValue::from_raw(entry.vote).into(),
        _ => VoteStatus::NotAReviewer,
    }
}

fn is_system_reviewer(reviewer: &ReviewerVote) -> bool {
    reviewer.identity.kind == IdentityKind::ServiceAccount
        || is_system_account(
            &reviewer.identity.display_name,
            reviewer.identity.unique_name.as_deref(),
        )
}

/// The priority chain. Evaluated in this fixed order; first match wins.
fn pending_reason(
    snapshot: &PullRequestSnapshot,
    resolved: &ResolvedReviewGroup,
    matched_approvals: usize,
    policy: ReviewPolicy,
) -> PendingReason {
    let reviewers = &snapshot.reviewers;

    // 1. A rejection from anyone outranks everything else.
    if reviewers.iter().any(|r| r.vote == -10) {
        return PendingReason::Rejected;
    }

    // 2. Someone is waiting for the author.
    if reviewers.iter().any(|r| r.vote == -5) {
        return PendingReason::WaitingForAuthor;
    }

    // 3. Not enough approvals from the designated group. With the group
    //    unresolved, membership cannot be checked; substitute "has every
    //    non-system reviewer on the item approved". Zero non-system
    //    reviewers also lands here: unknown policy counts as unmet.
    let threshold_unmet = if resolved.is_resolved() {
        matched_approvals < policy.required_approvals
    } else {
        let human: Vec<&ReviewerVote> =
            reviewers.iter().filter(|r| !is_system_reviewer(r)).collect();
        let approvals = human.iter().filter(|r| is_approving_vote(r.vote)).count();
        human.is_empty() || approvals < human.len()
    };
    if threshold_unmet {
        return PendingReason::PendingRequiredReviewerApproval;
    }

    // 4. The group is satisfied but an optional human reviewer is still
    //    outstanding.
    if reviewers
        .iter()
        .any(|r| !r.is_required && !is_system_reviewer(r) && !is_approving_vote(r.vote))
    {
        return PendingReason::PendingOtherApproval;
    }

    // 5. Everyone who can approve has; an external gate holds the item.
    PendingReason::PolicyOrBuildBlocked
}
