//! Reviewer identities as read from the directory.

use serde::{Deserialize, Serialize};

/// Kind of a directory identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityKind {
    Individual,
    Group,
    ServiceAccount,
}

/// A directory identity. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    /// Alternate unique identifier (account name, UPN), when the directory
    /// reports one. Membership matching accepts either this or `id`.
    pub unique_name: Option<String>,
    pub kind: IdentityKind,
}

impl Identity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, kind: IdentityKind) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            unique_name: None,
            kind,
        }
    }

    pub fn individual(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, IdentityKind::Individual)
    }

    pub fn with_unique_name(mut self, unique_name: impl Into<String>) -> Self {
        self.unique_name = Some(unique_name.into());
        self
    }
}

/// Name fragments that mark infrastructure accounts rather than reviewers.
const SYSTEM_NAME_MARKERS: &[&str] = &["bot", "svc", "service", "automation", "system", "build"];

/// Whether a display/unique name pair denotes a system account.
///
/// Bracketed accounts (`[Project]\Team Collection`) and names carrying
/// bot/service/automation markers are vote-casting infrastructure, not
/// reviewers; the classifier and the heuristic membership tier both
/// exclude them.
pub fn is_system_account(display_name: &str, unique_name: Option<&str>) -> bool {
    fn looks_system(name: &str) -> bool {
        let lowered = name.to_lowercase();
        lowered.starts_with('[') || SYSTEM_NAME_MARKERS.iter().any(|m| lowered.contains(m))
    }

    looks_system(display_name) || unique_name.is_some_and(looks_system)
}

/// Allow-list applied by the heuristic membership tier.
///
/// A name passes when it contains any configured keyword,
/// case-insensitively; an empty keyword list disables the allow-list
/// entirely. The system-account deny-list always applies on top.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    keywords: Vec<String>,
}

impl NameFilter {
    pub fn new(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn accepts(&self, display_name: &str, unique_name: Option<&str>) -> bool {
        if is_system_account(display_name, unique_name) {
            return false;
        }
        if self.keywords.is_empty() {
            return true;
        }

        let haystack = format!("{} {}", display_name, unique_name.unwrap_or("")).to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k))
    }
}
