use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Stored,
    ManualOverride,
    RuntimeConfig,
    BuildTime,
    HostnameHeuristic,
    LocalDefault,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Stored => "stored setting",
            SourceKind::ManualOverride => "manual override",
            SourceKind::RuntimeConfig => "runtime config",
            SourceKind::BuildTime => "build-time constant",
            SourceKind::HostnameHeuristic => "hostname guess",
            SourceKind::LocalDefault => "local default",
        }
    }

    /// Guesses may be wrong and are worth flagging to the user.
    pub fn is_guess(&self) -> bool {
        matches!(self, SourceKind::HostnameHeuristic)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved URL together with the source that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub url: String,
    pub source: SourceKind,
}

impl Resolution {
    pub fn new(url: impl Into<String>, source: SourceKind) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }
}

/// Lifecycle of the resolver for one page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    Resolving,
    Resolved(Resolution),
    /// Nothing resolved on a hosted page; the session URL is empty
    Failed,
}

impl Default for ResolutionState {
    fn default() -> Self {
        ResolutionState::Unresolved
    }
}

impl ResolutionState {
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            ResolutionState::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionState::Resolved(_))
    }
}
