//! Flattened membership of the designated review group.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Which strategy produced the membership set.
///
/// A discriminated union instead of an `Option`-of-set so that "we could
/// not determine the membership" (`Unresolved`) stays distinct from "the
/// group legitimately has zero members" (an empty set at any other tier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionTier {
    Live,
    StaticFallback,
    Heuristic,
    Unresolved,
}

/// The once-per-session result of resolving the designated review group.
///
/// Members are stored as lower-cased individual identifiers; an identity
/// matches when either its id or its alternate unique name is present.
/// Treated as immutable for the remainder of the session once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReviewGroup {
    members: BTreeSet<String>,
    tier: ResolutionTier,
}

impl ResolvedReviewGroup {
    /// Wrap an already lower-cased member set.
    pub fn new(members: BTreeSet<String>, tier: ResolutionTier) -> Self {
        Self { members, tier }
    }

    /// Build from arbitrary identifiers, normalizing case.
    pub fn from_identifiers(
        identifiers: impl IntoIterator<Item = String>,
        tier: ResolutionTier,
    ) -> Self {
        Self {
            members: identifiers.into_iter().map(|i| i.to_lowercase()).collect(),
            tier,
        }
    }

    /// No tier could determine the membership. Callers must treat this as
    /// "unknown", never as "no members".
    pub fn unresolved() -> Self {
        Self {
            members: BTreeSet::new(),
            tier: ResolutionTier::Unresolved,
        }
    }

    pub fn tier(&self) -> ResolutionTier {
        self.tier
    }

    pub fn is_resolved(&self) -> bool {
        self.tier != ResolutionTier::Unresolved
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether the identity is a member, matching by id or by alternate
    /// unique name.
    pub fn contains(&self, identity: &Identity) -> bool {
        if self.members.contains(&identity.id.to_lowercase()) {
            return true;
        }
        identity
            .unique_name
            .as_deref()
            .is_some_and(|u| self.members.contains(&u.to_lowercase()))
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }
}
