pub mod classify;
pub mod codec;
pub mod group;
pub mod identity;
pub mod snapshot;

pub use classify::{
    classify, ApprovalRatio, PendingReason, ReviewOutcome, ReviewPolicy, VoteStatus,
};
pub use codec::{decode, encode, parse_item_ref, CodecError};
pub use group::{ResolutionTier, ResolvedReviewGroup};
pub use identity::{is_system_account, Identity, IdentityKind, NameFilter};
pub use snapshot::{
    is_approving_vote, ActivityDescriptor, PullRequestSnapshot, ReviewerVote, VoteValue,
};
