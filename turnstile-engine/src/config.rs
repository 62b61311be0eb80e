//! Engine configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

use turnstile_core::ReviewPolicy;

use crate::batch::AnalyzerOptions;
use crate::heuristic::VoteScanHeuristic;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Display name of the designated review group.
    pub review_group: String,
    /// Fixed fallback identifiers used when the directory yields nothing.
    pub static_reviewers: Vec<String>,
    pub required_approvals: usize,
    pub heuristic_window: usize,
    pub heuristic_min_votes: usize,
    /// Allow-list keywords for the heuristic tier; empty disables the
    /// allow-list.
    pub heuristic_keywords: Vec<String>,
    pub max_in_flight: usize,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let review_group = env::var("TURNSTILE_REVIEW_GROUP")
            .context("TURNSTILE_REVIEW_GROUP environment variable is required")?;

        let static_reviewers = parse_list(env::var("TURNSTILE_STATIC_REVIEWERS").ok());
        let heuristic_keywords = parse_list(env::var("TURNSTILE_HEURISTIC_KEYWORDS").ok());

        let required_approvals = parse_or_default("TURNSTILE_REQUIRED_APPROVALS", 2)?;
        let heuristic_window =
            parse_or_default("TURNSTILE_HEURISTIC_WINDOW", VoteScanHeuristic::DEFAULT_WINDOW)?;
        let heuristic_min_votes = parse_or_default(
            "TURNSTILE_HEURISTIC_MIN_VOTES",
            VoteScanHeuristic::DEFAULT_MIN_OCCURRENCES,
        )?;
        let max_in_flight = parse_or_default(
            "TURNSTILE_MAX_IN_FLIGHT",
            AnalyzerOptions::DEFAULT_MAX_IN_FLIGHT,
        )?;

        Ok(EngineConfig {
            review_group,
            static_reviewers,
            required_approvals,
            heuristic_window,
            heuristic_min_votes,
            heuristic_keywords,
            max_in_flight,
        })
    }

    pub fn policy(&self) -> ReviewPolicy {
        ReviewPolicy {
            required_approvals: self.required_approvals,
        }
    }
}

/// Split a comma-separated value, dropping empty entries.
fn parse_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_or_default(var: &str, default: usize) -> Result<usize> {
    match env::var(var) {
        Ok(value) => value
            .parse::<usize>()
            .with_context(|| format!("{var} must be a valid number")),
        Err(_) => Ok(default),
    }
}
